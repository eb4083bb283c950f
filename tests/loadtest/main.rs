//! Load testing integration tests.
//!
//! These tests drive the populate command end to end against the fixture
//! dataset. Each test:
//! 1. Parses populate arguments the way the CLI does
//! 2. Runs the populate handler into a temporary directory
//! 3. Checks the output shape, the record count and reproducibility

mod file_loadtest;
mod stdout_loadtest;

use clap::Parser;
use tsdb_loadgen::PopulateTarget;

pub const DATASET: &str = "tests/fixtures/dataset.yaml";

/// Users 0..=19 with 12 samples each.
pub const TOTAL_RECORDS: usize = 20 * 12;

/// Number of fields in the fixture catalog.
pub const FIELDS: usize = 4;

#[derive(Parser)]
struct TestCli {
    #[command(subcommand)]
    target: PopulateTarget,
}

/// Parse a populate target from command-line style arguments.
pub fn parse_target(args: &[&str]) -> PopulateTarget {
    let argv = std::iter::once("populate").chain(args.iter().copied());
    TestCli::parse_from(argv).target
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("tsdb_loadgen=info,loadtest_pipeline=debug")
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
