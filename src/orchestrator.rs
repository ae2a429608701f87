//! Generation Orchestrator
//!
//! Parses the input once, renders every artifact of the selected template
//! set and writes each one to `<root>/<plural-slug>/<subpath>`.
//!
//! Writing is best effort: a failed write is recorded in the report and the
//! remaining artifacts are still written.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codegen::{render_all, validate_relative_path, ArtifactKind, GenerationOptions, TemplateLibrary};
use crate::error::Result;
use crate::input::InputConfig;
use crate::manifest::Manifest;

// =============================================================================
// Options
// =============================================================================

/// How generated files reach the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Replace existing files whose content differs
    pub overwrite: bool,
    /// Render and report without touching the disk
    pub dry_run: bool,
    /// Write `.scaffold-manifest.json` after the files
    pub manifest: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            dry_run: false,
            manifest: true,
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// Outcome of one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    /// Written (or, in a dry run, would be written)
    Written,
    /// Already on disk with identical content
    Unchanged,
    /// Exists with different content and overwrite is off
    Skipped,
    Failed { error: String },
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Written => write!(f, "written"),
            FileStatus::Unchanged => write!(f, "unchanged"),
            FileStatus::Skipped => write!(f, "skipped"),
            FileStatus::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub kind: ArtifactKind,
    /// Full output path
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Per-file results of one run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub entity_dir: PathBuf,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    /// Manifest path, when one was written
    pub manifest: Option<PathBuf>,
    pub manifest_error: Option<String>,
    /// Dotted paths of fields with unsupported type tags
    pub unsupported: Vec<String>,
}

impl GenerationReport {
    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }

    pub fn written(&self) -> usize {
        self.count(|s| *s == FileStatus::Written)
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| *s == FileStatus::Unchanged)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| *s == FileStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// True when nothing failed, including the manifest
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.manifest_error.is_none()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} written, {} unchanged, {} skipped, {} failed",
            self.written(),
            self.unchanged(),
            self.skipped(),
            self.failed()
        )
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct Orchestrator<'a> {
    options: &'a GenerationOptions,
    templates: &'a TemplateLibrary,
    write: WriteOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(options: &'a GenerationOptions, templates: &'a TemplateLibrary, write: WriteOptions) -> Self {
        Self {
            options,
            templates,
            write,
        }
    }

    /// Folder that receives an entity's files
    pub fn entity_dir(root: &Path, input: &InputConfig) -> Result<PathBuf> {
        let slug = Path::new(&input.naming.plural_slug);
        validate_relative_path(slug)?;
        Ok(root.join(slug))
    }

    /// Parse JSON input and generate
    pub fn run_json(&self, json: &str, root: &Path) -> Result<GenerationReport> {
        let input = InputConfig::from_json(json)?;
        self.run(&input, root)
    }

    /// Render every artifact of the input's template set and write it under `root`.
    ///
    /// Fails before touching the disk when the input cannot be rendered;
    /// afterwards every write error lands in the report.
    pub fn run(&self, input: &InputConfig, root: &Path) -> Result<GenerationReport> {
        let entity_dir = Self::entity_dir(root, input)?;
        info!(
            uid = %input.uid,
            template = %input.template,
            entity = %input.naming.plural_slug,
            "generating artifacts"
        );

        let unsupported: Vec<String> = input
            .schema
            .leaves()
            .iter()
            .filter(|leaf| !leaf.field.field_type.is_supported())
            .map(|leaf| {
                warn!(field = %leaf.dotted(), tag = %leaf.field.raw_tag, "unsupported field type, emitting disabled text field");
                leaf.dotted()
            })
            .collect();

        let generated = render_all(input, self.options, self.templates)?;

        let mut files = Vec::with_capacity(generated.len());
        for file in &generated.files {
            let path = entity_dir.join(&file.path);
            let status = self.write_file(&path, &file.content);
            match &status {
                FileStatus::Failed { error } => warn!(path = %path.display(), %error, "failed to write artifact"),
                status => debug!(artifact = %file.kind, path = %path.display(), %status, "artifact processed"),
            }
            files.push(FileReport {
                kind: file.kind,
                path,
                status,
            });
        }

        let mut report = GenerationReport {
            entity_dir,
            dry_run: self.write.dry_run,
            files,
            manifest: None,
            manifest_error: None,
            unsupported,
        };

        if self.write.manifest && !self.write.dry_run {
            match Manifest::from_files(input, &generated).save(&report.entity_dir) {
                Ok(path) => report.manifest = Some(path),
                Err(e) => {
                    warn!(error = %e, "failed to write manifest");
                    report.manifest_error = Some(e.to_string());
                }
            }
        }

        info!(summary = %report.summary(), "generation finished");
        Ok(report)
    }

    fn write_file(&self, path: &Path, content: &str) -> FileStatus {
        if path.exists() {
            match std::fs::read(path) {
                Ok(existing) if existing == content.as_bytes() => return FileStatus::Unchanged,
                Ok(_) if !self.write.overwrite => return FileStatus::Skipped,
                Ok(_) => {}
                Err(e) => return FileStatus::Failed { error: e.to_string() },
            }
        }

        if self.write.dry_run {
            return FileStatus::Written;
        }

        let result = path
            .parent()
            .map(std::fs::create_dir_all)
            .unwrap_or(Ok(()))
            .and_then(|_| std::fs::write(path, content));

        match result {
            Ok(()) => FileStatus::Written,
            Err(e) => FileStatus::Failed { error: e.to_string() },
        }
    }
}
