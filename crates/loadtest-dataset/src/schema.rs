//! YAML dataset description.
//!
//! A dataset file names the user-id range, the samples per user, the cadence
//! of their timestamps and the field catalog:
//!
//! ```yaml
//! version: 1
//! seed: 42
//! metric: electric
//! users:
//!   start: 0
//!   end: 999
//! samples_per_user: 96
//! start_time: "2020-01-01T00:00:00Z"
//! interval: 15m
//! fields: [voltage, current, power]
//! dimensions:
//!   provinces: [gd, bj]
//! ```

use crate::catalog::FieldCatalog;
use crate::descriptor::FixedCadence;
use crate::dimensions::LookupTables;
use crate::duration::parse_interval_to_millis;
use crate::error::ConfigError;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default metric name for the point encoder.
pub const DEFAULT_METRIC: &str = "electric";

/// Inclusive user-id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRange {
    pub start: i32,
    pub end: i32,
}

/// Start of the time axis: epoch milliseconds or a date/time string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartTime {
    Millis(i64),
    Text(String),
}

impl StartTime {
    /// Resolve to epoch milliseconds.
    pub fn to_millis(&self) -> Result<i64, ConfigError> {
        match self {
            StartTime::Millis(ms) => Ok(*ms),
            StartTime::Text(s) => parse_start_time(s),
        }
    }
}

/// Parsed dataset description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub version: u32,

    /// Default seed when the caller does not supply one
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_metric")]
    pub metric: String,

    pub users: UserRange,

    pub samples_per_user: u32,

    pub start_time: StartTime,

    /// Cadence between consecutive samples of a user
    pub interval: String,

    /// Field catalog, in emission order
    pub fields: Vec<String>,

    #[serde(default)]
    pub dimensions: LookupTables,
}

fn default_metric() -> String {
    DEFAULT_METRIC.to_string()
}

impl DatasetSchema {
    /// Load a dataset description from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a dataset description from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let schema: DatasetSchema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check every constraint the generator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        self.descriptor()?;
        self.field_catalog()?;
        self.dimensions.validate()?;
        Ok(())
    }

    /// Build the fixed-cadence descriptor for this dataset.
    pub fn descriptor(&self) -> Result<FixedCadence, ConfigError> {
        FixedCadence::new(
            self.users.start,
            self.users.end,
            self.samples_per_user,
            self.start_time.to_millis()?,
            parse_interval_to_millis(&self.interval)?,
        )
    }

    pub fn field_catalog(&self) -> Result<FieldCatalog, ConfigError> {
        FieldCatalog::new(self.fields.iter().cloned())
    }

    pub fn lookup_tables(&self) -> &LookupTables {
        &self.dimensions
    }

    /// Number of records the dataset expands to.
    pub fn total_records(&self) -> u64 {
        let users = i64::from(self.users.end) - i64::from(self.users.start) + 1;
        if users <= 0 {
            return 0;
        }
        users as u64 * u64::from(self.samples_per_user)
    }
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date into epoch milliseconds.
fn parse_start_time(s: &str) -> Result<i64, ConfigError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    Err(ConfigError::InvalidStartTime(s.to_string()))
}
