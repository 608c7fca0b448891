//! Manifest record types for Joomla extension descriptors.
//!
//! A record is built once per run from the fetched XML and is read-only
//! afterwards. All scalar fields default to empty strings; list fields keep
//! manifest order and duplicates.

pub mod mapping;

pub use mapping::{parse_manifest, Field, FIELD_MAP};

/// Parsed `<extension>` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestRecord {
    pub name: String,
    pub version: String,
    pub author: Author,
    pub license: String,
    pub creation_date: String,
    pub description: String,

    /// Install script path (`<scriptfile>`), empty when absent
    pub script_file: String,

    /// `update/schemas/schemapath` entries
    pub schemas: Vec<SchemaEntry>,

    /// `fileset/files/folder` entries
    pub folders: Vec<String>,

    /// `fileset/files/file` entries
    pub files: Vec<String>,

    /// `updateservers/server` entries
    pub update_servers: Vec<UpdateServer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub url: String,
}

/// Database schema script declared for updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaEntry {
    /// Database driver tag (`type` attribute), e.g. `mysql`
    pub kind: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateServer {
    pub name: String,
    pub url: String,
}

impl ManifestRecord {
    pub fn has_script_file(&self) -> bool {
        !self.script_file.is_empty()
    }

    /// Every path the manifest exposes, rooted at `/`, in manifest order:
    /// folders (with trailing slash), files, install script, schema files.
    pub fn discovered_paths(&self) -> Vec<String> {
        let mut paths = Vec::with_capacity(
            self.folders.len() + self.files.len() + self.schemas.len() + 1,
        );

        paths.extend(self.folders.iter().map(|folder| format!("/{}/", folder)));
        paths.extend(self.files.iter().map(|file| format!("/{}", file)));
        if self.has_script_file() {
            paths.push(format!("/{}", self.script_file));
        }
        paths.extend(self.schemas.iter().map(|schema| format!("/{}", schema.path)));

        paths
    }
}
