//! Error handling module.
//!
//! Checkers in this crate never return `Err` to the pipeline. Failures are
//! categorized into [`CheckErrorKind`] and carried as strings inside the
//! result records, so a verdict can always be formed from whatever checkers
//! succeeded. Only process initialization gets typed errors.

mod types;

pub use types::{check_error, CheckErrorKind, InitializationError};
