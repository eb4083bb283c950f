//! Error types for the streaming pipeline.

use loadtest_dataset::ConfigError;
use loadtest_generator::EncodingError;
use thiserror::Error;

/// Errors that stop a pipeline run.
///
/// All of them are fatal; the pipeline never retries a write or a batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The producer could not encode a record.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The sink rejected a write.
    #[error("Sink write failed after {records_written} records ({bytes_written} bytes): {source}")]
    SinkWrite {
        records_written: u64,
        bytes_written: u64,
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled, interrupting any blocked queue operation.
    #[error("Pipeline interrupted while waiting on the queue")]
    Interrupted,

    /// The producer task panicked or was aborted.
    #[error("Producer task failed: {0}")]
    ProducerPanicked(String),

    /// `run` was called on a pipeline that already ran.
    #[error("Pipeline already started (state: {0})")]
    AlreadyStarted(&'static str),
}
