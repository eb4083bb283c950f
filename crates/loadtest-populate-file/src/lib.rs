//! File populator for load testing.
//!
//! This crate streams a generated dataset into a file or stdout, wiring the
//! loadtest-generator crate to the bounded loadtest-pipeline.
//!
//! # Example
//!
//! ```ignore
//! use loadtest_dataset::DatasetSchema;
//! use loadtest_populate_file::FilePopulator;
//!
//! let schema = DatasetSchema::from_file("path/to/dataset.yaml")?;
//! let populator = FilePopulator::new(schema, 42);
//!
//! let metrics = populator.populate("/path/to/points.txt").await?;
//! ```

pub mod args;
mod error;
mod populator;

pub use args::{CommonPopulateArgs, FilePopulateArgs, StdoutPopulateArgs};
pub use error::FilePopulatorError;
pub use populator::{FilePopulator, PopulateMetrics};
