//! Utility modules for the manifest explorer.

pub mod errors;
pub mod logger;

pub use errors::{ExplorerError, Result};
