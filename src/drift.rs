//! Drift Detection
//!
//! Re-renders an input in memory and compares the result with what is on
//! disk in the entity folder.
//!
//! - missing: generated but not on disk
//! - modified: on disk with different content (unified diff attached). With a
//!   manifest, the recorded checksum tells hand edits from stale output.
//! - orphaned: listed in the manifest, still on disk, no longer generated
//! - untracked: on disk, neither generated nor in the manifest

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use similar::TextDiff;
use tracing::debug;
use walkdir::WalkDir;

use crate::codegen::{render_all, ArtifactKind, GenerationOptions, TemplateLibrary};
use crate::error::Result;
use crate::input::InputConfig;
use crate::manifest::{portable_path, Manifest, MANIFEST_FILE};
use crate::orchestrator::Orchestrator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DriftStatus {
    Clean,
    Missing,
    Modified {
        diff: String,
        /// Disk content differs from what was last generated; `None` without
        /// a manifest record
        edited: Option<bool>,
    },
    Orphaned,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriftEntry {
    /// Path relative to the entity folder
    pub path: String,
    pub kind: ArtifactKind,
    #[serde(flatten)]
    pub status: DriftStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub entity_dir: PathBuf,
    pub manifest_found: bool,
    pub entries: Vec<DriftEntry>,
    pub untracked: Vec<String>,
}

impl DriftReport {
    /// True when every generated file matches the disk and nothing is orphaned
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| e.status == DriftStatus::Clean)
    }

    pub fn count(&self, pred: impl Fn(&DriftStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.status)).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} clean, {} missing, {} modified, {} orphaned, {} untracked",
            self.count(|s| *s == DriftStatus::Clean),
            self.count(|s| *s == DriftStatus::Missing),
            self.count(|s| matches!(s, DriftStatus::Modified { .. })),
            self.count(|s| *s == DriftStatus::Orphaned),
            self.untracked.len()
        )
    }
}

/// Compare a fresh in-memory render of `input` with the files under `root`
pub fn check_drift(
    input: &InputConfig,
    options: &GenerationOptions,
    templates: &TemplateLibrary,
    root: &Path,
) -> Result<DriftReport> {
    let entity_dir = Orchestrator::entity_dir(root, input)?;
    let generated = render_all(input, options, templates)?;
    let manifest = Manifest::load(&entity_dir)?;

    let mut entries = Vec::new();
    let mut known: HashSet<String> = HashSet::new();

    for file in &generated.files {
        let rel = portable_path(&file.path);
        let path = entity_dir.join(&file.path);
        known.insert(rel.clone());

        let status = match std::fs::read(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DriftStatus::Missing,
            Err(e) => return Err(e.into()),
            Ok(on_disk) if on_disk == file.content.as_bytes() => DriftStatus::Clean,
            Ok(on_disk) => DriftStatus::Modified {
                diff: unified_diff(&String::from_utf8_lossy(&on_disk), &file.content, &rel),
                edited: manifest
                    .as_ref()
                    .and_then(|m| m.entry(&rel))
                    .map(|entry| !entry.sha256.verify(&on_disk)),
            },
        };
        debug!(path = %rel, ?status, "compared artifact");
        entries.push(DriftEntry {
            path: rel,
            kind: file.kind,
            status,
        });
    }

    if let Some(manifest) = &manifest {
        for entry in &manifest.files {
            known.insert(entry.path.clone());
            let stale = !generated.files.iter().any(|f| portable_path(&f.path) == entry.path);
            if stale && entity_dir.join(&entry.path).exists() {
                entries.push(DriftEntry {
                    path: entry.path.clone(),
                    kind: entry.kind,
                    status: DriftStatus::Orphaned,
                });
            }
        }
    }

    let untracked = if entity_dir.is_dir() {
        untracked_files(&entity_dir, &known)
    } else {
        Vec::new()
    };

    Ok(DriftReport {
        entity_dir,
        manifest_found: manifest.is_some(),
        entries,
        untracked,
    })
}

/// Unified diff from the disk version to the generated version
fn unified_diff(on_disk: &str, generated: &str, path: &str) -> String {
    TextDiff::from_lines(on_disk, generated)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string()
}

fn untracked_files(entity_dir: &Path, known: &HashSet<String>) -> Vec<String> {
    let mut untracked: Vec<String> = WalkDir::new(entity_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(entity_dir).ok().map(portable_path))
        .filter(|rel| rel != MANIFEST_FILE && !known.contains(rel))
        .collect();
    untracked.sort();
    untracked
}
