//! Code Generation
//!
//! One stateless generator per artifact. Every generator renders a single
//! embedded template against the shared run context.
//!
//! Architecture:
//! - GenerationContext: the parsed input, derived names and options for one run
//! - Generator: binds artifact-specific slots and names the output subpath
//! - ArtifactKind: the closed set of artifacts and the template sets using them
//!
//! Generators never perform I/O; writing is the orchestrator's job.

pub mod api;
pub mod form;
pub mod hooks;
pub mod model;
pub mod pages;
pub mod store;
pub mod template;
pub mod types;
pub mod typescript;
pub mod views;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaffoldError};
use crate::input::{FieldSpec, InputConfig, Leaf, Schema, SchemaNode, TemplateSet};
use crate::names::{humanize, js_property, NameForms};

pub use template::{Bindings, Template, TemplateLibrary};
pub use types::{map_field, FieldMapping};

// =============================================================================
// Options
// =============================================================================

/// Settings that shape generated code but are not part of the input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// URL prefix of the generated REST handlers
    pub api_base: String,
    /// Module exporting the form widgets and display components
    pub widgets_import: String,
    /// Module exporting `connectToDatabase`
    pub db_import: String,
    /// Module exporting `formatDate` / `formatDateTime`
    pub format_import: String,
    /// Options for enumerated fields declared without any
    pub default_options: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            widgets_import: "@/components/fields".to_string(),
            db_import: "@/lib/db".to_string(),
            format_import: "@/lib/format".to_string(),
            default_options: default_enum_options(),
        }
    }
}

/// The documented fallback option set for enumerated fields
pub fn default_enum_options() -> Vec<String> {
    vec!["option-1".to_string(), "option-2".to_string(), "option-3".to_string()]
}

// =============================================================================
// Artifacts
// =============================================================================

/// Every artifact the generator can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Model,
    Types,
    CollectionRoute,
    ItemRoute,
    Form,
    ListView,
    DetailView,
    IndexPage,
    NewPage,
    ShowPage,
    EditPage,
    Store,
    Hooks,
}

impl ArtifactKind {
    pub const ALL: &'static [ArtifactKind] = &[
        ArtifactKind::Model,
        ArtifactKind::Types,
        ArtifactKind::CollectionRoute,
        ArtifactKind::ItemRoute,
        ArtifactKind::Form,
        ArtifactKind::ListView,
        ArtifactKind::DetailView,
        ArtifactKind::IndexPage,
        ArtifactKind::NewPage,
        ArtifactKind::ShowPage,
        ArtifactKind::EditPage,
        ArtifactKind::Store,
        ArtifactKind::Hooks,
    ];

    /// Artifacts produced by a template set, in generation order
    pub fn for_set(set: TemplateSet) -> Vec<ArtifactKind> {
        match set {
            TemplateSet::Crud => Self::ALL.to_vec(),
            TemplateSet::Api => vec![
                ArtifactKind::Model,
                ArtifactKind::Types,
                ArtifactKind::CollectionRoute,
                ArtifactKind::ItemRoute,
            ],
            TemplateSet::Ui => vec![
                ArtifactKind::Types,
                ArtifactKind::Form,
                ArtifactKind::ListView,
                ArtifactKind::DetailView,
                ArtifactKind::IndexPage,
                ArtifactKind::NewPage,
                ArtifactKind::ShowPage,
                ArtifactKind::EditPage,
                ArtifactKind::Store,
                ArtifactKind::Hooks,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Types => "types",
            ArtifactKind::CollectionRoute => "collection-route",
            ArtifactKind::ItemRoute => "item-route",
            ArtifactKind::Form => "form",
            ArtifactKind::ListView => "list-view",
            ArtifactKind::DetailView => "detail-view",
            ArtifactKind::IndexPage => "index-page",
            ArtifactKind::NewPage => "new-page",
            ArtifactKind::ShowPage => "show-page",
            ArtifactKind::EditPage => "edit-page",
            ArtifactKind::Store => "store",
            ArtifactKind::Hooks => "hooks",
        }
    }

    /// The generator for this artifact
    pub fn generator(&self) -> &'static dyn Generator {
        match self {
            ArtifactKind::Model => &model::ModelGenerator,
            ArtifactKind::Types => &typescript::TypesGenerator,
            ArtifactKind::CollectionRoute => &api::CollectionRouteGenerator,
            ArtifactKind::ItemRoute => &api::ItemRouteGenerator,
            ArtifactKind::Form => &form::FormGenerator,
            ArtifactKind::ListView => &views::ListViewGenerator,
            ArtifactKind::DetailView => &views::DetailViewGenerator,
            ArtifactKind::IndexPage => &pages::IndexPageGenerator,
            ArtifactKind::NewPage => &pages::NewPageGenerator,
            ArtifactKind::ShowPage => &pages::ShowPageGenerator,
            ArtifactKind::EditPage => &pages::EditPageGenerator,
            ArtifactKind::Store => &store::StoreGenerator,
            ArtifactKind::Hooks => &hooks::HooksGenerator,
        }
    }
}

impl FromStr for ArtifactKind {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| ScaffoldError::UnknownArtifact(s.to_string()))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Generation Context
// =============================================================================

/// Everything a generator may read during one run
pub struct GenerationContext<'a> {
    pub input: &'a InputConfig,
    pub names: NameForms,
    pub options: &'a GenerationOptions,
    templates: &'a TemplateLibrary,
}

impl<'a> GenerationContext<'a> {
    pub fn new(input: &'a InputConfig, options: &'a GenerationOptions, templates: &'a TemplateLibrary) -> Self {
        Self {
            input,
            names: input.names(),
            options,
            templates,
        }
    }

    pub fn schema(&self) -> &'a Schema {
        &self.input.schema
    }

    pub fn leaves(&self) -> Vec<Leaf<'a>> {
        self.input.schema.leaves()
    }

    /// Artifact fragments for a field
    pub fn mapping(&self, field: &FieldSpec) -> FieldMapping {
        map_field(field, &humanize(&field.key), &self.options.default_options)
    }

    /// Bindings shared by every template
    pub fn base_bindings(&self) -> Bindings {
        let mut bindings = Bindings::new();
        bindings.extend(self.names.bindings());
        bindings
            .set("header", self.header())
            .set("uid", self.input.uid.clone())
            .set("template", self.input.template.as_str())
            .set("api_url", self.api_url())
            .set("widgets_import", self.options.widgets_import.clone())
            .set("db_import", self.options.db_import.clone())
            .set("format_import", self.options.format_import.clone());
        bindings
    }

    /// Collection URL of the generated REST handlers
    pub fn api_url(&self) -> String {
        format!("{}/{}", self.options.api_base.trim_end_matches('/'), self.names.plural_slug)
    }

    fn header(&self) -> String {
        if self.input.uid.is_empty() {
            format!(
                "// Generated by dashboard-scaffold ({} template). Do not edit by hand.",
                self.input.template
            )
        } else {
            format!(
                "// Generated by dashboard-scaffold ({} template, uid {}). Do not edit by hand.",
                self.input.template, self.input.uid
            )
        }
    }

    /// Render a template with the base bindings plus `extra`
    pub fn render(&self, template: &str, extra: Bindings) -> Result<String> {
        let template = self.templates.get(template)?;
        let mut bindings = self.base_bindings();
        bindings.merge(extra);
        template.render(&bindings)
    }
}

// =============================================================================
// Generator
// =============================================================================

/// A per-artifact generator
pub trait Generator: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    /// Template file name
    fn template(&self) -> &'static str;

    /// Output path relative to the entity folder
    fn subpath(&self, names: &NameForms) -> PathBuf;

    /// Artifact-specific bindings
    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings;

    /// Render the artifact text
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<String> {
        ctx.render(self.template(), self.bindings(ctx))
    }
}

// =============================================================================
// Generated Output
// =============================================================================

/// A generated file with its path and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub kind: ArtifactKind,
    /// Path relative to the entity folder
    pub path: PathBuf,
    pub content: String,
}

/// All files of one run, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedFiles {
    pub fn get(&self, kind: ArtifactKind) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Reject absolute paths and any `..` / `.` components
pub fn validate_relative_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(ScaffoldError::UnsafePath(path.to_path_buf()));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            Component::ParentDir | Component::CurDir | Component::Prefix(_) | Component::RootDir => {
                return Err(ScaffoldError::UnsafePath(path.to_path_buf()));
            }
        }
    }
    Ok(())
}

// =============================================================================
// Public API
// =============================================================================

/// Render one artifact in memory
pub fn render_artifact(
    kind: ArtifactKind,
    input: &InputConfig,
    options: &GenerationOptions,
    templates: &TemplateLibrary,
) -> Result<GeneratedFile> {
    let ctx = GenerationContext::new(input, options, templates);
    let generator = kind.generator();
    let path = generator.subpath(&ctx.names);
    validate_relative_path(&path)?;
    Ok(GeneratedFile {
        kind,
        path,
        content: generator.generate(&ctx)?,
    })
}

/// Render every artifact of the input's template set in memory
pub fn render_all(input: &InputConfig, options: &GenerationOptions, templates: &TemplateLibrary) -> Result<GeneratedFiles> {
    let files = ArtifactKind::for_set(input.template)
        .into_iter()
        .map(|kind| render_artifact(kind, input, options, templates))
        .collect::<Result<Vec<_>>>()?;
    Ok(GeneratedFiles { files })
}

/// Pure `(json) -> text` entry point with default options and built-in templates
pub fn generate_from_json(kind: ArtifactKind, json: &str) -> Result<String> {
    let input = InputConfig::from_json(json)?;
    let file = render_artifact(kind, &input, &GenerationOptions::default(), &TemplateLibrary::builtin())?;
    Ok(file.content)
}

// =============================================================================
// Shared Rendering Helpers
// =============================================================================

/// Member separator style for object-shaped output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberStyle {
    /// `key: value,` (object literals)
    Object,
    /// `key: type;` (interfaces)
    Interface,
}

/// Render schema members one per line, recursing into groups.
///
/// `value` receives each field and its full path. The result has no outer
/// braces and no indentation at its first level.
pub(crate) fn render_members(
    schema: &Schema,
    style: MemberStyle,
    value: &dyn Fn(&FieldSpec, &[String]) -> String,
) -> String {
    let mut lines = Vec::new();
    collect_members(schema, style, value, &mut Vec::new(), &mut lines);
    lines.join("\n")
}

fn collect_members(
    schema: &Schema,
    style: MemberStyle,
    value: &dyn Fn(&FieldSpec, &[String]) -> String,
    path: &mut Vec<String>,
    lines: &mut Vec<String>,
) {
    let terminator = match style {
        MemberStyle::Object => ",",
        MemberStyle::Interface => ";",
    };
    let indent = "  ".repeat(path.len());

    for entry in schema.entries() {
        path.push(entry.key.clone());
        let key = js_property(&entry.key);
        match &entry.node {
            SchemaNode::Field(field) => {
                lines.push(format!("{}{}: {}{}", indent, key, value(field, path), terminator));
            }
            SchemaNode::Group(group) => {
                lines.push(format!("{}{}: {{", indent, key));
                collect_members(group, style, value, path, lines);
                lines.push(format!("{}}}{}", indent, terminator));
            }
        }
        path.pop();
    }
}

/// Render schema members as a complete object literal
pub(crate) fn render_object(schema: &Schema, value: &dyn Fn(&FieldSpec, &[String]) -> String) -> String {
    if schema.is_empty() {
        return "{}".to_string();
    }
    let members = render_members(schema, MemberStyle::Object, value);
    let indented: Vec<String> = members.lines().map(|l| format!("  {}", l)).collect();
    format!("{{\n{}\n}}", indented.join("\n"))
}

/// `import { A, B } from "module";`, or nothing when `names` is empty
pub(crate) fn import_line(names: &BTreeSet<&str>, module: &str) -> String {
    if names.is_empty() {
        return String::new();
    }
    let list: Vec<&str> = names.iter().copied().collect();
    format!("import {{ {} }} from \"{}\";", list.join(", "), module)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{
        "uid": "42",
        "templateName": "api",
        "schema": { "title": "STRING", "period": { "start": "DATE" } },
        "namingConvention": {
            "pluralDisplay": "Events",
            "pluralSlug": "events",
            "singularDisplay": "Event",
            "singularSlug": "event"
        }
    }"#;

    #[test]
    fn test_artifact_kind_roundtrip_names() {
        for kind in ArtifactKind::ALL {
            assert_eq!(kind.as_str().parse::<ArtifactKind>().unwrap(), *kind);
            assert_eq!(kind.generator().kind(), *kind);
        }
        assert!("widget".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_template_sets() {
        assert_eq!(ArtifactKind::for_set(TemplateSet::Crud).len(), ArtifactKind::ALL.len());
        assert!(!ArtifactKind::for_set(TemplateSet::Api).contains(&ArtifactKind::Form));
        assert!(!ArtifactKind::for_set(TemplateSet::Ui).contains(&ArtifactKind::Model));
    }

    #[test]
    fn test_render_all_follows_template_set() {
        let input = InputConfig::from_json(INPUT).unwrap();
        let files = render_all(&input, &GenerationOptions::default(), &TemplateLibrary::builtin()).unwrap();
        let kinds: Vec<ArtifactKind> = files.files.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, ArtifactKind::for_set(TemplateSet::Api));
    }

    #[test]
    fn test_render_object() {
        let input = InputConfig::from_json(INPUT).unwrap();
        let rendered = render_object(&input.schema, &|_, path| format!("\"{}\"", path.join(".")));
        assert_eq!(rendered, "{\n  title: \"title\",\n  period: {\n    start: \"period.start\",\n  },\n}");
    }

    #[test]
    fn test_render_members_interface() {
        let input = InputConfig::from_json(INPUT).unwrap();
        let rendered = render_members(&input.schema, MemberStyle::Interface, &|_, _| "string".to_string());
        assert_eq!(rendered, "title: string;\nperiod: {\n  start: string;\n};");
    }

    #[test]
    fn test_validate_relative_path() {
        assert!(validate_relative_path(Path::new("models/Event.ts")).is_ok());
        assert!(validate_relative_path(Path::new("../escape.ts")).is_err());
        assert!(validate_relative_path(Path::new("/abs.ts")).is_err());
        assert!(validate_relative_path(Path::new("")).is_err());
    }

    #[test]
    fn test_import_line() {
        let mut names = BTreeSet::new();
        assert_eq!(import_line(&names, "x"), "");
        names.insert("B");
        names.insert("A");
        assert_eq!(import_line(&names, "@/x"), "import { A, B } from \"@/x\";");
    }

    #[test]
    fn test_api_url_trims_slash() {
        let input = InputConfig::from_json(INPUT).unwrap();
        let options = GenerationOptions {
            api_base: "/api/".to_string(),
            ..GenerationOptions::default()
        };
        let templates = TemplateLibrary::builtin();
        let ctx = GenerationContext::new(&input, &options, &templates);
        assert_eq!(ctx.api_url(), "/api/events");
    }
}
