//! Error types for record encoding.

use thiserror::Error;

/// Errors raised while turning a record into bytes.
///
/// These point at a configuration or programming mismatch, so a run that
/// hits one is aborted rather than retried.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// No field names to encode against.
    #[error("Field catalog is empty")]
    EmptyFieldCatalog,

    /// A tag value would break the series-key grammar.
    #[error("Tag '{tag}' value '{value}' contains reserved character '{character}'")]
    ReservedCharacter {
        tag: String,
        value: String,
        character: char,
    },

    /// A text separator that generated columns can contain.
    #[error("Separator {0:?} cannot delimit text columns")]
    InvalidSeparator(char),

    /// Drawn values do not line up with declared field names.
    #[error("Field count mismatch: {names} names declared, {values} values drawn")]
    FieldCountMismatch { names: usize, values: usize },

    /// A metric value that has no decimal representation.
    #[error("Metric value {0} cannot be formatted as a decimal")]
    NonFiniteValue(f64),

    /// Protobuf serialization failure.
    #[error("Proto encoding error: {0}")]
    Protobuf(#[from] protobuf::Error),
}
