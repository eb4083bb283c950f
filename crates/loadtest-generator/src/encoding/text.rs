//! Delimited text lines.
//!
//! Column order: `timestamp, user_id, province, district, system, mpid,
//! alarm_type, line, area` followed by one column per catalog field.
//!
//! A line splits back into exactly `9 + fields` columns. Separators that
//! generated numbers can contain are refused up front, and any other column
//! holding the separator fails the record with
//! [`EncodingError::ReservedCharacter`].

use super::check_field_counts;
use crate::error::EncodingError;
use crate::record::Record;
use loadtest_dataset::FieldCatalog;
use std::fmt::Write;

/// Default column separator.
pub const DEFAULT_SEPARATOR: char = ',';

/// Initial line capacity; a typical record fits without reallocating.
const LINE_CAPACITY: usize = 512;

/// Names of the dimension columns, in line order.
const TAG_COLUMNS: [&str; 7] = [
    "province",
    "district",
    "system",
    "mpid",
    "alarm_type",
    "line",
    "area",
];

/// Encoder producing one unterminated text line per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoder {
    separator: char,
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl TextEncoder {
    /// Build an encoder without vetting the separator.
    ///
    /// Columns are still checked at encode time.
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Build an encoder, refusing separators that numeric columns or line
    /// framing can contain.
    pub fn try_new(separator: char) -> Result<Self, EncodingError> {
        validate_separator(separator)?;
        Ok(Self::new(separator))
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn encode(&self, record: &Record, catalog: &FieldCatalog) -> Result<Vec<u8>, EncodingError> {
        check_field_counts(record, catalog)?;

        let mut line = LineBuilder::new(self.separator);
        line.push("timestamp", record.timestamp)?;
        line.push("user_id", record.user_id)?;
        for (name, column) in TAG_COLUMNS.into_iter().zip(record.tags.columns()) {
            line.push(name, column)?;
        }
        for (name, value) in catalog.iter().zip(&record.values) {
            line.push(name, value)?;
        }
        Ok(line.build().into_bytes())
    }
}

/// Reject separators that timestamps, ids, decimals or line framing use.
pub fn validate_separator(separator: char) -> Result<(), EncodingError> {
    if separator.is_ascii_digit() || matches!(separator, '.' | '-' | '+' | '\n' | '\r') {
        return Err(EncodingError::InvalidSeparator(separator));
    }
    Ok(())
}

/// Joins columns with a separator, never leaving a dangling one.
struct LineBuilder {
    buffer: String,
    separator: char,
    columns: usize,
}

impl LineBuilder {
    fn new(separator: char) -> Self {
        Self {
            buffer: String::with_capacity(LINE_CAPACITY),
            separator,
            columns: 0,
        }
    }

    fn push(&mut self, name: &str, column: impl std::fmt::Display) -> Result<(), EncodingError> {
        if self.columns > 0 {
            self.buffer.push(self.separator);
        }
        self.columns += 1;
        let start = self.buffer.len();
        // Writing to a String cannot fail.
        let _ = write!(self.buffer, "{column}");

        let written = &self.buffer[start..];
        if written.contains(self.separator) {
            return Err(EncodingError::ReservedCharacter {
                tag: name.to_string(),
                value: written.to_string(),
                character: self.separator,
            });
        }
        Ok(())
    }

    fn build(self) -> String {
        self.buffer
    }
}
