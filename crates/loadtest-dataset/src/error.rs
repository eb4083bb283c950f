//! Error types for dataset descriptions.

use thiserror::Error;

/// Errors raised while loading or validating a dataset description.
///
/// Every variant is fatal at startup; nothing here is retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading the dataset file
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Unsupported dataset file version
    #[error("Unsupported dataset version: {0} (expected 1)")]
    UnsupportedVersion(u32),

    /// Invalid user id range
    #[error("Invalid user id range: start={start}, end={end}")]
    InvalidUserRange { start: i32, end: i32 },

    /// Zero samples per user
    #[error("samples_per_user must be greater than zero")]
    NoSamples,

    /// Field catalog is empty
    #[error("Field catalog is empty")]
    EmptyFieldCatalog,

    /// Field catalog contains the same name twice
    #[error("Duplicate field name in catalog: {0}")]
    DuplicateField(String),

    /// Lookup table without entries
    #[error("Dimension table '{0}' is empty")]
    EmptyDimensionTable(&'static str),

    /// Measurement point id width outside the supported range
    #[error("mpid_width {0} is out of range (expected 1..=9)")]
    InvalidMpidWidth(u32),

    /// Unparseable or non-positive cadence
    #[error("Invalid interval '{value}': {reason}")]
    InvalidInterval { value: String, reason: String },

    /// Unparseable start time
    #[error("Invalid start_time '{0}'")]
    InvalidStartTime(String),

    /// The last timestamp of the dataset does not fit in an i64
    #[error("Timestamp overflow at sample index {0}")]
    TimestampOverflow(u32),

    /// Non-positive batch size or queue capacity
    #[error("{name} must be greater than zero")]
    NonPositive { name: &'static str },
}
