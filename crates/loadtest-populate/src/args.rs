//! Common CLI argument definitions shared by all populators.

use clap::{Args, ValueEnum};
use loadtest_generator::{validate_separator, EncodingMode};
use loadtest_pipeline::{PipelineConfig, PipelineError};
use std::path::PathBuf;

/// Seed used when neither the command line nor the dataset names one.
pub const DEFAULT_SEED: i64 = 42;

/// Output encoding selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EncodingArg {
    /// Separator-delimited text lines
    #[default]
    Text,
    /// Length-prefixed protobuf frames
    BinaryFramed,
    /// Bare protobuf messages, one per line
    BinaryUnframed,
}

impl From<EncodingArg> for EncodingMode {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Text => EncodingMode::Text,
            EncodingArg::BinaryFramed => EncodingMode::BinaryFramed,
            EncodingArg::BinaryUnframed => EncodingMode::BinaryUnframed,
        }
    }
}

/// Common arguments shared by all populators.
///
/// Used by both `populate file` and `populate stdout` so the generated
/// stream is identical whatever the destination.
#[derive(Args, Clone, Debug)]
pub struct CommonPopulateArgs {
    /// Path to dataset YAML file
    #[arg(long, short = 'd')]
    pub dataset: PathBuf,

    /// Random seed for deterministic generation (overrides the dataset seed)
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// User-type flag used when deriving the alarm type
    #[arg(long, default_value = "0")]
    pub user_type: u32,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = EncodingArg::Text)]
    pub encoding: EncodingArg,

    /// Metric name for binary output (overrides the dataset metric)
    #[arg(long)]
    pub metric: Option<String>,

    /// Column separator for text output
    #[arg(long, default_value = ",", value_parser = parse_separator)]
    pub separator: char,

    /// Number of records per queued batch
    #[arg(long, default_value = "1000")]
    pub batch_size: usize,

    /// Number of batches the queue holds before the generator blocks
    #[arg(long, default_value = "16")]
    pub queue_capacity: usize,

    /// Dry-run mode: validate the dataset and configuration without writing output
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonPopulateArgs {
    /// Seed to use given the dataset's own seed.
    pub fn effective_seed(&self, dataset_seed: Option<u64>) -> i64 {
        self.seed
            .or_else(|| dataset_seed.map(|seed| seed as i64))
            .unwrap_or(DEFAULT_SEED)
    }

    pub fn encoding_mode(&self) -> EncodingMode {
        self.encoding.into()
    }

    pub fn pipeline_config(&self) -> Result<PipelineConfig, PipelineError> {
        PipelineConfig::new(self.batch_size, self.queue_capacity)
    }
}

/// Parse a single-character separator that text columns cannot contain.
fn parse_separator(value: &str) -> Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(separator), None) => validate_separator(separator)
            .map(|()| separator)
            .map_err(|e| e.to_string()),
        _ => Err(format!("expected a single character, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonPopulateArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test", "--dataset", "dataset.yaml"]);
        let args = cli.common;

        assert_eq!(args.dataset, PathBuf::from("dataset.yaml"));
        assert_eq!(args.seed, None);
        assert_eq!(args.user_type, 0);
        assert_eq!(args.encoding_mode(), EncodingMode::Text);
        assert_eq!(args.separator, ',');
        assert_eq!(args.batch_size, 1000);
        assert_eq!(args.queue_capacity, 16);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_encoding_values() {
        let cli = TestCli::parse_from(["test", "-d", "d.yaml", "--encoding", "binary-framed"]);
        assert_eq!(cli.common.encoding_mode(), EncodingMode::BinaryFramed);

        let cli = TestCli::parse_from(["test", "-d", "d.yaml", "--encoding", "binary-unframed"]);
        assert_eq!(cli.common.encoding_mode(), EncodingMode::BinaryUnframed);

        assert!(TestCli::try_parse_from(["test", "-d", "d.yaml", "--encoding", "xml"]).is_err());
    }

    #[test]
    fn test_effective_seed() {
        let cli = TestCli::parse_from(["test", "-d", "d.yaml"]);
        assert_eq!(cli.common.effective_seed(None), DEFAULT_SEED);
        assert_eq!(cli.common.effective_seed(Some(7)), 7);

        let cli = TestCli::parse_from(["test", "-d", "d.yaml", "--seed", "-3"]);
        assert_eq!(cli.common.effective_seed(Some(7)), -3);
    }

    #[test]
    fn test_pipeline_config_rejects_zero_batch() {
        let cli = TestCli::parse_from(["test", "-d", "d.yaml", "--batch-size", "0"]);
        assert!(cli.common.pipeline_config().is_err());
    }

    #[test]
    fn test_separator_values() {
        let cli = TestCli::parse_from(["test", "-d", "d.yaml", "--separator", ";"]);
        assert_eq!(cli.common.separator, ';');

        for bad in [".", "-", "5", ",,", ""] {
            assert!(
                TestCli::try_parse_from(["test", "-d", "d.yaml", "--separator", bad]).is_err(),
                "separator {bad:?} should be refused"
            );
        }
    }
}
