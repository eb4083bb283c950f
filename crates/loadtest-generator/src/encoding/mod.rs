//! Record encoders.
//!
//! A run picks exactly one [`EncodingMode`] up front; the matching [`Encoder`]
//! is built once and used for every record.
//!
//! | Mode | Bytes per record | Sink terminator |
//! |---|---|---|
//! | `text` | delimited line, no newline | `\n` |
//! | `binary-framed` | `u64` LE length + `MputRequest` | none |
//! | `binary-unframed` | `MputRequest` reinterpreted as text | `\n` |
//!
//! `binary-unframed` messages contain `\n` bytes themselves, so that stream is
//! not line-splittable.

pub mod point;
pub mod text;

use crate::error::EncodingError;
use crate::record::Record;
use loadtest_dataset::FieldCatalog;
use std::fmt;
use std::str::FromStr;

pub use point::{Framing, PointEncoder};
pub use text::{validate_separator, TextEncoder, DEFAULT_SEPARATOR};

/// Output encoding of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EncodingMode {
    #[default]
    Text,
    BinaryFramed,
    BinaryUnframed,
}

impl EncodingMode {
    pub fn name(&self) -> &'static str {
        match self {
            EncodingMode::Text => "text",
            EncodingMode::BinaryFramed => "binary-framed",
            EncodingMode::BinaryUnframed => "binary-unframed",
        }
    }

    /// Bytes a line-oriented sink appends after every record, if any.
    ///
    /// Framed binary records delimit themselves, so nothing is appended.
    pub fn record_terminator(&self) -> Option<&'static [u8]> {
        match self {
            EncodingMode::Text | EncodingMode::BinaryUnframed => Some(b"\n"),
            EncodingMode::BinaryFramed => None,
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(EncodingMode::Text),
            "binary-framed" => Ok(EncodingMode::BinaryFramed),
            "binary-unframed" => Ok(EncodingMode::BinaryUnframed),
            other => Err(format!(
                "unknown encoding '{other}' (expected text, binary-framed or binary-unframed)"
            )),
        }
    }
}

/// Encoding strategy chosen once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoder {
    Text(TextEncoder),
    Point(PointEncoder),
}

impl Encoder {
    /// Build the encoder for `mode`.
    ///
    /// `separator` only matters for text, `metric` only for the point protocol.
    /// A text separator that numeric columns can contain is refused here,
    /// before any record is generated.
    pub fn for_mode(
        mode: EncodingMode,
        metric: impl Into<String>,
        separator: char,
    ) -> Result<Self, EncodingError> {
        Ok(match mode {
            EncodingMode::Text => Encoder::Text(TextEncoder::try_new(separator)?),
            EncodingMode::BinaryFramed => {
                Encoder::Point(PointEncoder::new(metric, Framing::LengthPrefixed))
            }
            EncodingMode::BinaryUnframed => {
                Encoder::Point(PointEncoder::new(metric, Framing::Unframed))
            }
        })
    }

    pub fn mode(&self) -> EncodingMode {
        match self {
            Encoder::Text(_) => EncodingMode::Text,
            Encoder::Point(encoder) => match encoder.framing() {
                Framing::LengthPrefixed => EncodingMode::BinaryFramed,
                Framing::Unframed => EncodingMode::BinaryUnframed,
            },
        }
    }

    pub fn encode(&self, record: &Record, catalog: &FieldCatalog) -> Result<Vec<u8>, EncodingError> {
        match self {
            Encoder::Text(encoder) => encoder.encode(record, catalog),
            Encoder::Point(encoder) => encoder.encode(record, catalog),
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::Text(TextEncoder::default())
    }
}

/// Reject catalogs that cannot carry the record's values.
pub(crate) fn check_field_counts(
    record: &Record,
    catalog: &FieldCatalog,
) -> Result<(), EncodingError> {
    if catalog.is_empty() {
        return Err(EncodingError::EmptyFieldCatalog);
    }
    if record.values.len() != catalog.len() {
        return Err(EncodingError::FieldCountMismatch {
            names: catalog.len(),
            values: record.values.len(),
        });
    }
    Ok(())
}
