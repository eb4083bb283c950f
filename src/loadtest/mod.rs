//! Loadtest command handlers.
//!
//! This module contains the handlers for the populate commands.

pub mod populate;
