//! Dataset descriptors: which users exist and when their samples fall.

use crate::error::ConfigError;

/// Shape of a generated dataset.
///
/// User ids are inclusive on both ends and every user gets
/// `samples_per_user` samples, timestamped by [`DatasetDescriptor::timestamp_at`].
pub trait DatasetDescriptor: Send + Sync {
    fn start_user_id(&self) -> i32;
    fn end_user_id(&self) -> i32;
    fn samples_per_user(&self) -> u32;

    /// Epoch-millisecond timestamp of the sample at `sample_index`.
    fn timestamp_at(&self, sample_index: u32) -> i64;

    /// Number of records the dataset expands to.
    fn total_records(&self) -> u64 {
        let users = i64::from(self.end_user_id()) - i64::from(self.start_user_id()) + 1;
        if users <= 0 {
            return 0;
        }
        users as u64 * u64::from(self.samples_per_user())
    }
}

/// Descriptor with a fixed cadence: `start + index * interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCadence {
    start_user_id: i32,
    end_user_id: i32,
    samples_per_user: u32,
    start_millis: i64,
    interval_millis: i64,
}

impl FixedCadence {
    /// Create a validated descriptor.
    ///
    /// The last timestamp is computed up front so `timestamp_at` can never
    /// overflow for an in-range index.
    pub fn new(
        start_user_id: i32,
        end_user_id: i32,
        samples_per_user: u32,
        start_millis: i64,
        interval_millis: i64,
    ) -> Result<Self, ConfigError> {
        if start_user_id < 0 || start_user_id > end_user_id {
            return Err(ConfigError::InvalidUserRange {
                start: start_user_id,
                end: end_user_id,
            });
        }
        if samples_per_user == 0 {
            return Err(ConfigError::NoSamples);
        }
        if interval_millis <= 0 {
            return Err(ConfigError::InvalidInterval {
                value: format!("{interval_millis}ms"),
                reason: "interval must be positive".to_string(),
            });
        }
        let last = samples_per_user - 1;
        i64::from(last)
            .checked_mul(interval_millis)
            .and_then(|offset| start_millis.checked_add(offset))
            .ok_or(ConfigError::TimestampOverflow(last))?;

        Ok(Self {
            start_user_id,
            end_user_id,
            samples_per_user,
            start_millis,
            interval_millis,
        })
    }

    pub fn start_millis(&self) -> i64 {
        self.start_millis
    }

    pub fn interval_millis(&self) -> i64 {
        self.interval_millis
    }
}

impl DatasetDescriptor for FixedCadence {
    fn start_user_id(&self) -> i32 {
        self.start_user_id
    }

    fn end_user_id(&self) -> i32 {
        self.end_user_id
    }

    fn samples_per_user(&self) -> u32 {
        self.samples_per_user
    }

    fn timestamp_at(&self, sample_index: u32) -> i64 {
        self.start_millis + i64::from(sample_index) * self.interval_millis
    }
}
