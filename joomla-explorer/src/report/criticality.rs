//! Two-level risk classification of a parsed manifest.

use crate::manifest::ManifestRecord;
use std::fmt;

/// Folders whose exposure alone raises the verdict.
pub const SENSITIVE_FOLDERS: &[&str] = &["tmp", "logs", "cache"];

/// Marker for server-executable install scripts.
pub const SERVER_SCRIPT_MARKER: &str = ".php";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Install script path contains [`SERVER_SCRIPT_MARKER`]
    ServerScript(String),
    /// Folder name in [`SENSITIVE_FOLDERS`]
    SensitiveFolder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub findings: Vec<Finding>,
    pub level: Criticality,
}

/// Apply the static rules to `record`.
pub fn assess(record: &ManifestRecord) -> Assessment {
    let mut findings = Vec::new();

    if record.script_file.contains(SERVER_SCRIPT_MARKER) {
        findings.push(Finding::ServerScript(record.script_file.clone()));
    }

    findings.extend(
        record
            .folders
            .iter()
            .filter(|folder| SENSITIVE_FOLDERS.contains(&folder.as_str()))
            .map(|folder| Finding::SensitiveFolder(folder.clone())),
    );

    let level = if findings.is_empty() {
        Criticality::Moderate
    } else {
        Criticality::High
    };

    Assessment { findings, level }
}

impl Criticality {
    /// Verdict line for the report.
    pub fn verdict(self) -> &'static str {
        match self {
            Criticality::High => {
                "**🔴 High criticality: internal structure and sensitive files exposed.**"
            }
            Criticality::Moderate => {
                "🟡 Moderate criticality: structure revealed, but no dangerous files directly reachable."
            }
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criticality::High => write!(f, "High"),
            Criticality::Moderate => write!(f, "Moderate"),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::ServerScript(script) => write!(
                f,
                "⚠️ {} detected: may be used for internal execution.",
                script
            ),
            Finding::SensitiveFolder(folder) => {
                write!(f, "🔥 Sensitive directory exposed: /{}/", folder)
            }
        }
    }
}
