//! Generation manifest
//!
//! Written as `.scaffold-manifest.json` in the entity folder after a run.
//! Records which files the generator owns and their checksums, so a later
//! drift check can tell hand edits from stale output.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codegen::{ArtifactKind, GeneratedFiles};
use crate::error::Result;
use crate::input::{InputConfig, TemplateSet};

pub const MANIFEST_FILE: &str = ".scaffold-manifest.json";

/// Generator version recorded in manifests
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub uid: String,
    pub template: TemplateSet,
    pub generator_version: String,
    pub generated_at: DateTime<Utc>,
    /// Plural slug of the entity
    pub entity: String,
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the entity folder, `/`-separated
    pub path: String,
    pub kind: ArtifactKind,
    pub size: u64,
    pub sha256: Checksum,
}

impl Manifest {
    /// Describe a set of generated files
    pub fn from_files(input: &InputConfig, files: &GeneratedFiles) -> Self {
        Self {
            uid: input.uid.clone(),
            template: input.template,
            generator_version: GENERATOR_VERSION.to_string(),
            generated_at: Utc::now(),
            entity: input.naming.plural_slug.clone(),
            files: files
                .files
                .iter()
                .map(|file| ManifestEntry {
                    path: portable_path(&file.path),
                    kind: file.kind,
                    size: file.content.len() as u64,
                    sha256: Checksum::of_text(&file.content),
                })
                .collect(),
        }
    }

    pub fn path_in(entity_dir: &Path) -> PathBuf {
        entity_dir.join(MANIFEST_FILE)
    }

    /// Load the manifest of an entity folder, if there is one
    pub fn load(entity_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(entity_dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write the manifest into an entity folder
    pub fn save(&self, entity_dir: &Path) -> Result<PathBuf> {
        let path = Self::path_in(entity_dir);
        std::fs::create_dir_all(entity_dir)?;
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn entry(&self, path: &str) -> Option<&ManifestEntry> {
        self.files.iter().find(|e| e.path == path)
    }
}

/// Lower-case hex SHA-256 of generated content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    pub fn of_text(content: &str) -> Self {
        Self::of_bytes(content.as_bytes())
    }

    pub fn of_bytes(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `content` hashes to this checksum
    pub fn verify(&self, content: &[u8]) -> bool {
        Self::of_bytes(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `/`-separated form of a relative path
pub fn portable_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
