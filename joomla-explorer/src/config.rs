//! Configuration management for the manifest explorer.
//!
//! Loads configuration from an optional TOML file; every key has a default so
//! the tool runs with no file at all.

use crate::utils::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Markdown report location
    #[serde(default = "default_report_path")]
    pub report: PathBuf,

    /// Probe wordlist location
    #[serde(default = "default_wordlist_path")]
    pub wordlist: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Probe the derived paths after writing the report
    #[serde(default = "default_probe_enabled")]
    pub enabled: bool,

    /// User-Agent header sent with every probe
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of probes in flight (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds (unset = client default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_report_path() -> PathBuf {
    PathBuf::from("report.md")
}

fn default_wordlist_path() -> PathBuf {
    PathBuf::from("wordlist.txt")
}

fn default_probe_enabled() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: default_report_path(),
            wordlist: default_wordlist_path(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: default_probe_enabled(),
            user_agent: default_user_agent(),
            concurrency: default_concurrency(),
            timeout_secs: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExplorerError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ExplorerError::Config(e.to_string()))
    }

    /// Place both output files in `dir`, keeping their file names.
    pub fn relocate_outputs(&mut self, dir: &Path) {
        self.output.report = relocate(&self.output.report, dir);
        self.output.wordlist = relocate(&self.output.wordlist, dir);
    }
}

impl ProbeConfig {
    /// Concurrency bound, never below one request in flight.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn relocate(path: &Path, dir: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir.join(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.report, PathBuf::from("report.md"));
        assert_eq!(config.output.wordlist, PathBuf::from("wordlist.txt"));
        assert!(config.probe.enabled);
        assert_eq!(config.probe.user_agent, "Mozilla/5.0");
        assert_eq!(config.probe.concurrency, 1);
        assert!(config.probe.timeout().is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [probe]
            concurrency = 4
            timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.probe.concurrency, 4);
        assert_eq!(config.probe.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.probe.user_agent, "Mozilla/5.0");
        assert_eq!(config.output.report, PathBuf::from("report.md"));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_toml(include_str!("../../demos/explorer.toml")).unwrap();
        assert!(config.probe.enabled);
        assert_eq!(config.probe.effective_concurrency(), 1);
        assert_eq!(config.output.wordlist, PathBuf::from("wordlist.txt"));
    }

    #[test]
    fn test_zero_concurrency_is_sequential() {
        let probe = ProbeConfig {
            concurrency: 0,
            ..ProbeConfig::default()
        };
        assert_eq!(probe.effective_concurrency(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[probe\nconcurrency = ").unwrap_err();
        assert!(matches!(err, ExplorerError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ExplorerError::Config(_)));
    }

    #[test]
    fn test_relocate_outputs() {
        let mut config = Config::default();
        config.output.wordlist = PathBuf::from("lists/paths.txt");
        config.relocate_outputs(Path::new("/tmp/run"));

        assert_eq!(config.output.report, PathBuf::from("/tmp/run/report.md"));
        assert_eq!(config.output.wordlist, PathBuf::from("/tmp/run/paths.txt"));
    }
}
