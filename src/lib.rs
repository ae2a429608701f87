//! Dashboard Scaffold
//!
//! Generates the boilerplate of a CRUD admin dashboard from a JSON field
//! schema: Mongoose models, TypeScript types, Next.js route handlers, form,
//! list and detail components, pages, a Zustand store and React Query hooks.
//!
//! ## Features
//!
//! - **Closed type table**: every field-type tag maps to a persistence
//!   declaration, widget, TypeScript type and default value
//! - **Delimited templates**: `{{name}}` placeholders parsed once, unbound
//!   placeholders are errors
//! - **Best-effort writes**: one failed file never stops the others
//! - **Manifest and drift check**: SHA256 checksums of what was generated
//!
//! ## Architecture
//!
//! ```text
//! input JSON ──▶ InputConfig ──▶ codegen::Generator × N ──▶ GeneratedFiles
//!                     │                                        │
//!                   lint                                 orchestrator
//!                                                              │
//!                        <root>/<plural-slug>/
//!                        ├── models/<Singular>.ts
//!                        ├── types/<Singular>.ts
//!                        ├── app/api/<plural-slug>/route.ts
//!                        ├── app/api/<plural-slug>/[id]/route.ts
//!                        ├── app/<plural-slug>/...
//!                        ├── components/ hooks/ store/
//!                        └── .scaffold-manifest.json
//! ```

pub mod codegen;
pub mod config;
pub mod drift;
pub mod error;
pub mod input;
pub mod lint;
pub mod manifest;
pub mod names;
pub mod orchestrator;

pub use codegen::{generate_from_json, render_all, render_artifact, ArtifactKind, GenerationOptions, TemplateLibrary};
pub use config::ScaffoldConfig;
pub use drift::{check_drift, DriftReport, DriftStatus};
pub use error::{Result, ScaffoldError};
pub use input::{FieldSpec, FieldType, InputConfig, NamingConvention, Schema, TemplateSet};
pub use lint::{lint_input, LintResult};
pub use manifest::{Checksum, Manifest};
pub use orchestrator::{FileStatus, GenerationReport, Orchestrator, WriteOptions};
