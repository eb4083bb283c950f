//! Two-decimal metric values.
//!
//! Values are rounded from their shortest decimal rendering rather than from
//! the binary float, so `123.455` rounds to `123.46` the same way a
//! fixed-point formatter would, on every platform.

use crate::error::EncodingError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places kept for every metric value.
pub const SCALE: u32 = 2;

/// A metric value rounded half-up to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDecimal {
    decimal: Decimal,
    value: f64,
}

impl FixedDecimal {
    /// Round a raw value to two places.
    pub fn from_f64(raw: f64) -> Result<Self, EncodingError> {
        if !raw.is_finite() {
            return Err(EncodingError::NonFiniteValue(raw));
        }
        // `Display` for f64 gives the shortest string that round-trips.
        let exact =
            Decimal::from_str(&raw.to_string()).map_err(|_| EncodingError::NonFiniteValue(raw))?;
        let mut decimal = exact.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        decimal.rescale(SCALE);

        let value = decimal
            .to_string()
            .parse::<f64>()
            .map_err(|_| EncodingError::NonFiniteValue(raw))?;
        Ok(Self { decimal, value })
    }

    /// The double closest to the rounded decimal.
    pub fn as_f64(&self) -> f64 {
        self.value
    }

    pub fn as_decimal(&self) -> Decimal {
        self.decimal
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decimal)
    }
}
