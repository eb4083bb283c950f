//! File populate integration tests.

use crate::{init_tracing, parse_target, DATASET, FIELDS, TOTAL_RECORDS};
use loadtest_dataset::DatasetSchema;
use loadtest_generator::encoding::point::FRAME_HEADER_LEN;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tsdb_loadgen::loadtest::populate::{load_summary, run_populate};

#[tokio::test]
async fn test_file_loadtest_text() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("points.txt");
    let output_arg = output.to_string_lossy().to_string();

    let target = parse_target(&[
        "file",
        "--dataset",
        DATASET,
        "--output",
        &output_arg,
        "--batch-size",
        "7",
        "--queue-capacity",
        "2",
    ]);
    let metrics = run_populate(target, CancellationToken::new())
        .await?
        .ok_or("expected metrics")?;

    assert_eq!(metrics.records_written as usize, TOTAL_RECORDS);
    assert_eq!(metrics.values_written as usize, TOTAL_RECORDS * FIELDS);
    assert!(metrics.max_queue_depth <= 2);

    let content = std::fs::read_to_string(&output)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), TOTAL_RECORDS);

    // User 0 sample 0 at the dataset start, province from the fixture's table
    assert!(lines[0].starts_with("1577836800000,0,gd,zhuhai,TMR,00000,1,line_0,area_0,"));
    // Five minute cadence
    assert!(lines[1].starts_with("1577837100000,0,"));
    // User 1 starts over at the dataset start
    assert!(lines[12].starts_with("1577836800000,1,bj,"));

    for line in &lines {
        let columns: Vec<&str> = line.split(',').collect();
        assert_eq!(columns.len(), 9 + FIELDS);
        for value in &columns[9..] {
            let (_, decimals) = value.split_once('.').ok_or("missing decimals")?;
            assert_eq!(decimals.len(), 2, "value {value} is not two-decimal");
        }
    }

    let summary = load_summary(&metrics);
    assert!(summary.starts_with("loaded 240 items and 960 values in "));

    Ok(())
}

#[tokio::test]
async fn test_file_loadtest_reproducible() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let temp_dir = TempDir::new()?;
    let mut outputs = Vec::new();

    for (name, batch_size) in [("a.bin", "1"), ("b.bin", "1000")] {
        let output = temp_dir.path().join(name);
        let output_arg = output.to_string_lossy().to_string();
        let target = parse_target(&[
            "file",
            "-d",
            DATASET,
            "-o",
            &output_arg,
            "--encoding",
            "binary-framed",
            "--batch-size",
            batch_size,
        ]);
        run_populate(target, CancellationToken::new()).await?;
        outputs.push(std::fs::read(&output)?);
    }

    assert_eq!(outputs[0], outputs[1]);

    let mut offset = 0;
    let mut frames = 0;
    let bytes = &outputs[0];
    while offset < bytes.len() {
        let mut header = [0u8; FRAME_HEADER_LEN];
        header.copy_from_slice(&bytes[offset..offset + FRAME_HEADER_LEN]);
        offset += FRAME_HEADER_LEN + u64::from_le_bytes(header) as usize;
        frames += 1;
    }
    assert_eq!(offset, bytes.len());
    assert_eq!(frames, TOTAL_RECORDS);

    Ok(())
}

#[tokio::test]
async fn test_file_loadtest_seed_override() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let temp_dir = TempDir::new()?;
    let dataset_seed = temp_dir.path().join("dataset_seed.txt");
    let explicit_seed = temp_dir.path().join("explicit_seed.txt");
    let other_seed = temp_dir.path().join("other_seed.txt");

    let runs = [
        (&dataset_seed, None),
        (&explicit_seed, Some("42")),
        (&other_seed, Some("43")),
    ];
    for (output, seed) in runs {
        let output_arg = output.to_string_lossy().to_string();
        let mut args = vec!["file", "-d", DATASET, "-o", output_arg.as_str()];
        if let Some(seed) = seed {
            args.extend(["--seed", seed]);
        }
        run_populate(parse_target(&args), CancellationToken::new()).await?;
    }

    let dataset_seed = std::fs::read(&dataset_seed)?;
    assert_eq!(dataset_seed, std::fs::read(&explicit_seed)?);
    assert_ne!(dataset_seed, std::fs::read(&other_seed)?);

    Ok(())
}

#[tokio::test]
async fn test_file_loadtest_dry_run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("never.txt");
    let output_arg = output.to_string_lossy().to_string();

    let target = parse_target(&["file", "-d", DATASET, "-o", &output_arg, "--dry-run"]);
    let metrics = run_populate(target, CancellationToken::new()).await?;

    assert!(metrics.is_none());
    assert!(!output.exists());

    Ok(())
}

#[tokio::test]
async fn test_file_loadtest_invalid_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let dataset = temp_dir.path().join("broken.yaml");
    std::fs::write(
        &dataset,
        "version: 1\nusers: {start: 5, end: 1}\nsamples_per_user: 1\n\
         start_time: 0\ninterval: 1s\nfields: [a]\n",
    )?;
    assert!(DatasetSchema::from_file(&dataset).is_err());

    let dataset_arg = dataset.to_string_lossy().to_string();
    let output = temp_dir.path().join("out.txt");
    let output_arg = output.to_string_lossy().to_string();
    let target = parse_target(&["file", "-d", &dataset_arg, "-o", &output_arg]);

    let err = run_populate(target, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load dataset"));
    assert!(!output.exists());

    Ok(())
}

#[tokio::test]
async fn test_file_loadtest_cancelled() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("cancelled.txt");
    let output_arg = output.to_string_lossy().to_string();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let target = parse_target(&["file", "-d", DATASET, "-o", &output_arg]);
    let err = run_populate(target, cancel).await.unwrap_err();
    assert!(format!("{err:#}").contains("interrupted"));

    Ok(())
}
