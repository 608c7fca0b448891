//! Joomla Explorer Library
//!
//! Fetches a Joomla extension manifest, writes a Markdown report and a probe
//! wordlist, and checks which declared paths are reachable on the target.

pub mod config;
pub mod explorer;
pub mod fetch;
pub mod manifest;
pub mod probe;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use manifest::ManifestRecord;
pub use utils::errors::ExplorerError;
pub type Result<T> = std::result::Result<T, ExplorerError>;
