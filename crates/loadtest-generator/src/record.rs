//! Generated records and the cursor that walks the (user, sample) grid.

use crate::decimal::FixedDecimal;
use loadtest_dataset::DimensionTags;
use std::collections::BTreeMap;

/// One synthetic data point.
///
/// Built fresh for every generation step and handed straight to an encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: i64,
    pub user_id: i32,
    /// Position of this sample within its user's series
    pub sample_index: u32,
    pub tags: DimensionTags,
    /// Metric values, aligned with the field catalog
    pub values: Vec<FixedDecimal>,
}

impl Record {
    /// Series-key tags sorted by key.
    pub fn series_tags(&self) -> BTreeMap<&'static str, String> {
        self.tags.series_tags(self.user_id)
    }
}

/// Position of a generator within its dataset.
///
/// `current_sample_index` always stays below `samples_per_user`; stepping past
/// the last sample rolls over to the next user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationState {
    pub current_user_offset: u64,
    pub current_sample_index: u32,
}

impl GenerationState {
    /// User id under the cursor, or `None` once past `end_user_id`.
    pub fn user_id(&self, start_user_id: i32, end_user_id: i32) -> Option<i32> {
        let user_id = i64::from(start_user_id) + self.current_user_offset as i64;
        if user_id > i64::from(end_user_id) {
            None
        } else {
            Some(user_id as i32)
        }
    }

    /// Step to the next sample, rolling over to the next user at the end of a series.
    pub fn advance(&mut self, samples_per_user: u32) {
        self.current_sample_index += 1;
        if self.current_sample_index >= samples_per_user {
            self.current_sample_index = 0;
            self.current_user_offset += 1;
        }
    }
}
