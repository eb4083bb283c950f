//! Deterministic record generator for tsdb-loadgen.
//!
//! This crate provides the `RecordGenerator` which expands a dataset
//! description into a lazy, finite sequence of encoded records. The generator
//! uses a seeded RNG to ensure reproducibility across runs with the same seed.
//!
//! # Architecture
//!
//! ```text
//! DatasetDescriptor + DimensionResolver + FieldCatalog
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ RecordGenerator  │
//! │                  │
//! │  - seed          │
//! │  - rng (StdRng)  │
//! │  - state         │
//! └────────┬─────────┘
//!          │  Record { timestamp, user_id, tags, values }
//!          ▼
//! ┌──────────────────┐
//! │     Encoder      │  text | binary-framed | binary-unframed
//! └────────┬─────────┘
//!          ▼
//!       Vec<u8>
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadtest_dataset::{FieldCatalog, FixedCadence, LookupTables};
//! use loadtest_generator::RecordGenerator;
//! use std::sync::Arc;
//!
//! let descriptor = FixedCadence::new(0, 1, 2, 1_577_836_800_000, 1_000).unwrap();
//! let catalog = FieldCatalog::new(["f1", "f2"]).unwrap();
//! let mut generator = RecordGenerator::new(
//!     Arc::new(descriptor),
//!     Arc::new(LookupTables::default()),
//!     catalog,
//!     42,
//! );
//!
//! let line = generator.try_advance().unwrap().unwrap();
//! assert!(line.starts_with(b"1577836800000,0,gd,"));
//! ```

pub mod decimal;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod record;

// Re-exports for convenience
pub use decimal::FixedDecimal;
pub use encoding::{
    validate_separator, Encoder, EncodingMode, Framing, PointEncoder, TextEncoder,
    DEFAULT_SEPARATOR,
};
pub use error::EncodingError;
pub use generator::{RecordGenerator, VALUE_RANGE};
pub use record::{GenerationState, Record};
