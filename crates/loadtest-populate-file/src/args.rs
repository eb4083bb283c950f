//! CLI argument definitions for the file and stdout populators.

use clap::Args;
use std::path::PathBuf;

// Re-export CommonPopulateArgs for convenience
pub use loadtest_populate::CommonPopulateArgs;

/// File-specific populate arguments.
#[derive(Args, Clone, Debug)]
pub struct FilePopulateArgs {
    /// Output file (created or truncated)
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    #[command(flatten)]
    pub common: CommonPopulateArgs,
}

/// Stdout populate arguments.
#[derive(Args, Clone, Debug)]
pub struct StdoutPopulateArgs {
    #[command(flatten)]
    pub common: CommonPopulateArgs,
}
