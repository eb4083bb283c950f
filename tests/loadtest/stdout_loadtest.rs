//! Stdout populate integration tests.
//!
//! Only argument handling is exercised here; a real run would interleave
//! generated records with the test harness output.

use crate::{parse_target, DATASET};
use loadtest_generator::EncodingMode;
use tokio_util::sync::CancellationToken;
use tsdb_loadgen::loadtest::populate::{build_populator, run_populate};
use tsdb_loadgen::PopulateTarget;

#[test]
fn test_stdout_overrides() {
    let target = parse_target(&[
        "stdout",
        "-d",
        DATASET,
        "--encoding",
        "binary-unframed",
        "--metric",
        "water",
        "--user-type",
        "2",
    ]);
    let PopulateTarget::Stdout { args } = target else {
        panic!("expected stdout target");
    };

    let populator = build_populator(&args.common, CancellationToken::new()).unwrap();
    assert_eq!(populator.encoding(), EncodingMode::BinaryUnframed);
    assert_eq!(populator.metric(), "water");
    assert_eq!(populator.seed(), 42);
}

#[test]
fn test_stdout_rejects_zero_queue() {
    let target = parse_target(&["stdout", "-d", DATASET, "--queue-capacity", "0"]);
    let PopulateTarget::Stdout { args } = target else {
        panic!("expected stdout target");
    };

    let err = build_populator(&args.common, CancellationToken::new()).unwrap_err();
    assert!(format!("{err:#}").contains("queue_capacity"));
}

#[tokio::test]
async fn test_stdout_dry_run() {
    let target = parse_target(&["stdout", "-d", DATASET, "--dry-run"]);
    let metrics = run_populate(target, CancellationToken::new()).await.unwrap();
    assert!(metrics.is_none());
}
