//! tsdb-loadgen library
//!
//! Generates deterministic, reproducible time-series datasets for load-testing
//! a time-series store and streams them to a file or stdout with bounded
//! memory.
//!
//! # Crates
//!
//! - `loadtest_dataset` - dataset description, lookup tables, field catalog
//! - `loadtest_generator` - seeded record generator and encoders
//! - `loadtest_pipeline` - bounded producer/consumer pipeline and sinks
//! - `loadtest_populate_file` - file and stdout populator
//!
//! # CLI Usage
//!
//! ```bash
//! # Text lines into a file
//! tsdb-loadgen populate file --dataset dataset.yaml --output points.txt
//!
//! # Length-prefixed point-protocol frames to stdout
//! tsdb-loadgen populate stdout --dataset dataset.yaml --encoding binary-framed > points.bin
//! ```

use clap::Subcommand;

pub mod loadtest;

pub use loadtest_populate_file::{FilePopulateArgs, StdoutPopulateArgs};

/// Destination to populate with generated records
#[derive(Subcommand, Clone, Debug)]
pub enum PopulateTarget {
    /// Write generated records to a file
    #[command(name = "file")]
    File {
        #[command(flatten)]
        args: FilePopulateArgs,
    },
    /// Write generated records to standard output
    #[command(name = "stdout")]
    Stdout {
        #[command(flatten)]
        args: StdoutPopulateArgs,
    },
}
