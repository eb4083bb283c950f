//! Error types for the file populator.

use loadtest_dataset::ConfigError;
use loadtest_generator::EncodingError;
use loadtest_pipeline::PipelineError;
use thiserror::Error;

/// Errors that can occur during file population.
#[derive(Error, Debug)]
pub enum FilePopulatorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset description error.
    #[error("Dataset error: {0}")]
    Config(#[from] ConfigError),

    /// Encoder settings that no record could be written with.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}
