//! Custom error types for the manifest explorer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Transport failure or a status other than 200 on the manifest URL.
    #[error("❌ Error accessing {url}")]
    Fetch { url: String, reason: String },

    #[error("Error reading XML")]
    BodyRead(#[source] reqwest::Error),

    #[error("Error parsing XML: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExplorerError {
    /// Whether the run ended before any output file was created.
    pub fn is_pre_output(&self) -> bool {
        matches!(
            self,
            ExplorerError::Fetch { .. } | ExplorerError::BodyRead(_) | ExplorerError::Parse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_visible_messages() {
        let fetch = ExplorerError::Fetch {
            url: "https://example.com/joomla.xml".to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        };
        assert_eq!(fetch.to_string(), "❌ Error accessing https://example.com/joomla.xml");

        let parse = ExplorerError::Parse("unexpected end of document".to_string());
        assert_eq!(parse.to_string(), "Error parsing XML: unexpected end of document");
    }

    #[test]
    fn test_pre_output_errors() {
        assert!(ExplorerError::Parse("bad".to_string()).is_pre_output());
        assert!(!ExplorerError::Config("bad".to_string()).is_pre_output());
        assert!(!ExplorerError::Io(std::io::Error::other("disk full")).is_pre_output());
    }
}
