//! Categorical dimension lookup for synthetic users.
//!
//! A [`DimensionResolver`] maps a user id to the fixed set of tag values that
//! identify its series. Resolution must be pure: the same user id (and user
//! type) always yields the same tags.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Series-key tag names, in the order they appear once sorted.
pub const TAG_AREA: &str = "AREA";
pub const TAG_ALARM_TYPE: &str = "BJLX";
pub const TAG_DISTRICT: &str = "DISTRICT";
pub const TAG_LINE: &str = "LINE";
pub const TAG_MPID: &str = "MPID";
pub const TAG_PROVINCE: &str = "PROVINCE";
pub const TAG_SYSTEM: &str = "SYSTEM";
pub const TAG_USER_ID: &str = "ZCUSID";

/// Widest zero-padded measurement point id a dataset may ask for.
pub const MAX_MPID_WIDTH: u32 = 9;

/// Pure mapping from a user id to its categorical tag values.
pub trait DimensionResolver: Send + Sync {
    fn province(&self, user_id: i32) -> String;
    fn district(&self, user_id: i32) -> String;
    fn system(&self, user_id: i32) -> String;
    fn mpid(&self, user_id: i32) -> String;
    fn alarm_type(&self, user_id: i32, user_type: u32) -> String;
    fn line(&self, user_id: i32) -> String;
    fn area(&self, user_id: i32) -> String;

    /// Resolve every dimension of a user at once.
    fn resolve(&self, user_id: i32, user_type: u32) -> DimensionTags {
        DimensionTags {
            province: self.province(user_id),
            district: self.district(user_id),
            system: self.system(user_id),
            mpid: self.mpid(user_id),
            alarm_type: self.alarm_type(user_id, user_type),
            line: self.line(user_id),
            area: self.area(user_id),
        }
    }
}

/// Resolved tag tuple of a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionTags {
    pub province: String,
    pub district: String,
    pub system: String,
    pub mpid: String,
    pub alarm_type: String,
    pub line: String,
    pub area: String,
}

impl DimensionTags {
    /// Tag values in text-column order (after timestamp and user id).
    pub fn columns(&self) -> [&str; 7] {
        [
            self.province.as_str(),
            self.district.as_str(),
            self.system.as_str(),
            self.mpid.as_str(),
            self.alarm_type.as_str(),
            self.line.as_str(),
            self.area.as_str(),
        ]
    }

    /// Key/value tags of a series, sorted by key.
    pub fn series_tags(&self, user_id: i32) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            (TAG_AREA, self.area.clone()),
            (TAG_ALARM_TYPE, self.alarm_type.clone()),
            (TAG_DISTRICT, self.district.clone()),
            (TAG_LINE, self.line.clone()),
            (TAG_MPID, self.mpid.clone()),
            (TAG_PROVINCE, self.province.clone()),
            (TAG_SYSTEM, self.system.clone()),
            (TAG_USER_ID, user_id.to_string()),
        ])
    }
}

/// Table-driven [`DimensionResolver`].
///
/// Each table may be overridden from the dataset YAML; omitted tables fall
/// back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupTables {
    pub provinces: Vec<String>,
    pub districts: Vec<String>,
    pub systems: Vec<String>,
    pub alarm_types: Vec<String>,
    pub mpid_width: u32,
    pub line_count: u32,
    pub area_count: u32,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self {
            provinces: strings(&["gd", "bj", "sh", "zj", "js"]),
            districts: strings(&["zhuhai", "shenzhen", "guangzhou", "foshan"]),
            systems: strings(&["TMR", "EMS", "SCADA"]),
            alarm_types: strings(&["1", "2", "3", "4"]),
            mpid_width: 5,
            line_count: 100,
            area_count: 10,
        }
    }
}

impl LookupTables {
    /// Check that every table can serve a lookup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tables: [(&'static str, usize); 6] = [
            ("provinces", self.provinces.len()),
            ("districts", self.districts.len()),
            ("systems", self.systems.len()),
            ("alarm_types", self.alarm_types.len()),
            ("line_count", self.line_count as usize),
            ("area_count", self.area_count as usize),
        ];
        for (name, len) in tables {
            if len == 0 {
                return Err(ConfigError::EmptyDimensionTable(name));
            }
        }
        if !(1..=MAX_MPID_WIDTH).contains(&self.mpid_width) {
            return Err(ConfigError::InvalidMpidWidth(self.mpid_width));
        }
        Ok(())
    }
}

impl DimensionResolver for LookupTables {
    fn province(&self, user_id: i32) -> String {
        pick(&self.provinces, user_id as u64)
    }

    fn district(&self, user_id: i32) -> String {
        pick(&self.districts, user_id as u64)
    }

    fn system(&self, user_id: i32) -> String {
        pick(&self.systems, user_id as u64)
    }

    fn mpid(&self, user_id: i32) -> String {
        let width = self.mpid_width as usize;
        // Widths past u64 range keep every digit of the id.
        match 10u64.checked_pow(self.mpid_width) {
            Some(modulus) => format!("{:0width$}", user_id as u64 % modulus),
            None => format!("{:0width$}", user_id as u64),
        }
    }

    fn alarm_type(&self, user_id: i32, user_type: u32) -> String {
        pick(&self.alarm_types, user_id as u64 + u64::from(user_type))
    }

    fn line(&self, user_id: i32) -> String {
        format!("line_{}", user_id as u64 % u64::from(self.line_count.max(1)))
    }

    fn area(&self, user_id: i32) -> String {
        format!("area_{}", user_id as u64 % u64::from(self.area_count.max(1)))
    }
}

fn pick(table: &[String], key: u64) -> String {
    if table.is_empty() {
        return String::new();
    }
    table[(key % table.len() as u64) as usize].clone()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
