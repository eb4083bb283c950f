//! Populate command handlers.

mod logging;
mod run;

pub use logging::{load_summary, WORKERS};
pub use run::{build_populator, run_populate};
