//! Dataset description for the tsdb-loadgen record generator.
//!
//! This crate holds the inputs the generator treats as given:
//!
//! - [`DatasetDescriptor`] - user-id range, samples per user and the
//!   timestamp of each sample
//! - [`DimensionResolver`] - pure lookup of a user's categorical tags
//! - [`FieldCatalog`] - the ordered numeric fields of every record
//!
//! The [`DatasetSchema`] YAML file builds all three.
//!
//! ```rust
//! use loadtest_dataset::{DatasetDescriptor, DatasetSchema};
//!
//! let schema = DatasetSchema::from_yaml(r#"
//! version: 1
//! users: { start: 0, end: 1 }
//! samples_per_user: 2
//! start_time: "2020-01-01T00:00:00Z"
//! interval: 1s
//! fields: [f1, f2]
//! "#).unwrap();
//!
//! assert_eq!(schema.descriptor().unwrap().total_records(), 4);
//! ```

pub mod catalog;
pub mod descriptor;
pub mod dimensions;
pub mod duration;
pub mod error;
pub mod schema;

pub use catalog::FieldCatalog;
pub use descriptor::{DatasetDescriptor, FixedCadence};
pub use dimensions::{DimensionResolver, DimensionTags, LookupTables, MAX_MPID_WIDTH};
pub use duration::parse_interval_to_millis;
pub use error::ConfigError;
pub use schema::{DatasetSchema, StartTime, UserRange, DEFAULT_METRIC};
