//! Configuration module.
//!
//! Re-exports the CLI configuration types and operational constants.

pub mod constants;
mod types;

pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
