//! Common types and utilities for tsdb-loadgen populators.
//!
//! This crate provides the argument types shared by every populate target
//! (file and stdout), so both expose the same generation and pipeline knobs.

pub mod args;

pub use args::{CommonPopulateArgs, EncodingArg, DEFAULT_SEED};
