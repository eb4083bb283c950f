//! Cadence parsing utilities.

use crate::error::ConfigError;

/// Parse a cadence string like "500ms", "15s", "5m", "1h" or "300" into milliseconds.
/// Supports:
/// - Plain numbers (interpreted as seconds): "300"
/// - Milliseconds suffix: "500ms"
/// - Seconds suffix: "300s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
pub fn parse_interval_to_millis(s: &str) -> Result<i64, ConfigError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(invalid(s, "empty interval string"));
    }

    // "ms" must be checked before "m" and "s"
    let (num_str, factor) = if let Some(num_str) = s.strip_suffix("ms") {
        (num_str, 1)
    } else if let Some(num_str) = s.strip_suffix('h') {
        (num_str, 3_600_000)
    } else if let Some(num_str) = s.strip_suffix('m') {
        (num_str, 60_000)
    } else if let Some(num_str) = s.strip_suffix('s') {
        (num_str, 1_000)
    } else {
        (s, 1_000)
    };

    let value: i64 = num_str
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(s, &e.to_string()))?;
    if value <= 0 {
        return Err(invalid(s, "interval must be positive"));
    }
    value
        .checked_mul(factor)
        .ok_or_else(|| invalid(s, "interval overflows i64 milliseconds"))
}

fn invalid(value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidInterval {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
