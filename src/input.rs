//! Input model
//!
//! The single unit of input to every generator: a JSON document carrying a
//! field schema, a naming convention and run metadata.
//!
//! ```json
//! {
//!   "uid": "b7f1",
//!   "templateName": "crud",
//!   "schema": {
//!     "title": "STRING",
//!     "status": "SELECT#draft,published",
//!     "period": { "start": "DATE", "end": "DATE" },
//!     "photos": "IMAGES"
//!   },
//!   "namingConvention": {
//!     "pluralDisplay": "Blog Posts",
//!     "pluralSlug": "blog-posts",
//!     "singularDisplay": "Blog Post",
//!     "singularSlug": "blog-post"
//!   }
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ScaffoldError};
use crate::names::NameForms;

// =============================================================================
// Field Types
// =============================================================================

/// The closed set of field-type tags
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Textarea,
    Email,
    Password,
    Url,
    Phone,
    Color,
    Number,
    Boolean,
    Select,
    Radio,
    MultiSelect,
    MultiCheckbox,
    Tags,
    Date,
    Time,
    DateTime,
    Image,
    Images,
    File,
    Files,
    /// Any tag outside the set; generated as a disabled string field
    Unsupported(String),
}

impl FieldType {
    /// Every supported type, in table order
    pub const ALL: &'static [FieldType] = &[
        FieldType::String,
        FieldType::Textarea,
        FieldType::Email,
        FieldType::Password,
        FieldType::Url,
        FieldType::Phone,
        FieldType::Color,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::Radio,
        FieldType::MultiSelect,
        FieldType::MultiCheckbox,
        FieldType::Tags,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Image,
        FieldType::Images,
        FieldType::File,
        FieldType::Files,
    ];

    /// Parse a tag case-insensitively; unknown tags become `Unsupported`
    pub fn from_tag(tag: &str) -> Self {
        let upper = tag.trim().to_ascii_uppercase();
        match upper.as_str() {
            "STRING" | "TEXT" | "INPUT" => FieldType::String,
            "TEXTAREA" | "LONGTEXT" => FieldType::Textarea,
            "EMAIL" => FieldType::Email,
            "PASSWORD" => FieldType::Password,
            "URL" | "LINK" => FieldType::Url,
            "PHONE" | "TEL" => FieldType::Phone,
            "COLOR" => FieldType::Color,
            "NUMBER" | "INT" | "INTEGER" | "FLOAT" => FieldType::Number,
            "BOOLEAN" | "BOOL" | "CHECKBOX" | "SWITCH" => FieldType::Boolean,
            "SELECT" | "DROPDOWN" => FieldType::Select,
            "RADIO" => FieldType::Radio,
            "MULTISELECT" => FieldType::MultiSelect,
            "MULTICHECKBOX" => FieldType::MultiCheckbox,
            "TAGS" => FieldType::Tags,
            "DATE" => FieldType::Date,
            "TIME" => FieldType::Time,
            "DATETIME" => FieldType::DateTime,
            "IMAGE" => FieldType::Image,
            "IMAGES" => FieldType::Images,
            "FILE" => FieldType::File,
            "FILES" => FieldType::Files,
            _ => FieldType::Unsupported(upper),
        }
    }

    /// Canonical upper-case tag
    pub fn tag(&self) -> &str {
        match self {
            FieldType::String => "STRING",
            FieldType::Textarea => "TEXTAREA",
            FieldType::Email => "EMAIL",
            FieldType::Password => "PASSWORD",
            FieldType::Url => "URL",
            FieldType::Phone => "PHONE",
            FieldType::Color => "COLOR",
            FieldType::Number => "NUMBER",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Select => "SELECT",
            FieldType::Radio => "RADIO",
            FieldType::MultiSelect => "MULTISELECT",
            FieldType::MultiCheckbox => "MULTICHECKBOX",
            FieldType::Tags => "TAGS",
            FieldType::Date => "DATE",
            FieldType::Time => "TIME",
            FieldType::DateTime => "DATETIME",
            FieldType::Image => "IMAGE",
            FieldType::Images => "IMAGES",
            FieldType::File => "FILE",
            FieldType::Files => "FILES",
            FieldType::Unsupported(tag) => tag,
        }
    }

    /// Types whose values come from an option list
    pub fn is_enumerated(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::MultiSelect | FieldType::MultiCheckbox
        )
    }

    /// Types stored as sequences
    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            FieldType::MultiSelect
                | FieldType::MultiCheckbox
                | FieldType::Tags
                | FieldType::Images
                | FieldType::Files
        )
    }

    /// Free-text types that the generated list endpoint searches over
    pub fn is_searchable(&self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Textarea | FieldType::Email | FieldType::Url | FieldType::Phone
        )
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldType::Unsupported(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One typed field of the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key within its parent schema
    pub key: String,
    /// Parsed type
    pub field_type: FieldType,
    /// The tag exactly as written (without options)
    pub raw_tag: String,
    /// Options after `#`, trimmed, empties dropped
    pub options: Vec<String>,
}

impl FieldSpec {
    /// Parse `TAG` or `TAG#option1,option2`
    pub fn parse(key: impl Into<String>, raw: &str) -> Self {
        let (tag, options) = match raw.split_once('#') {
            Some((tag, options)) => (tag, Some(options)),
            None => (raw, None),
        };

        let options = options
            .map(|o| {
                o.split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            key: key.into(),
            field_type: FieldType::from_tag(tag),
            raw_tag: tag.trim().to_string(),
            options,
        }
    }

    /// Options to generate with; enumerated types without options use `defaults`
    pub fn effective_options(&self, defaults: &[String]) -> Vec<String> {
        if self.field_type.is_enumerated() && self.options.is_empty() {
            defaults.to_vec()
        } else {
            self.options.clone()
        }
    }

    /// True when an enumerated field falls back to the default option set
    pub fn uses_default_options(&self) -> bool {
        self.field_type.is_enumerated() && self.options.is_empty()
    }
}

// =============================================================================
// Schema
// =============================================================================

/// A schema node: either a typed field or a nested schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Field(FieldSpec),
    Group(Schema),
}

/// A key in a schema together with its node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub key: String,
    pub node: SchemaNode,
}

/// Ordered mapping from field key to type tag or nested schema
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

/// A typed field reached through zero or more groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<'a> {
    /// Keys from the root to this field
    pub path: Vec<String>,
    pub field: &'a FieldSpec,
}

impl Leaf<'_> {
    /// Dotted path (`period.start`)
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }

    /// Nesting depth; top-level fields are 0
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl Schema {
    /// Build from a JSON object; values must be tag strings or nested objects
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self> {
        Self::from_map_at(map, "")
    }

    fn from_map_at(map: &Map<String, Value>, prefix: &str) -> Result<Self> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            let node = match value {
                Value::String(tag) => SchemaNode::Field(FieldSpec::parse(key.clone(), tag)),
                Value::Object(nested) => SchemaNode::Group(Self::from_map_at(nested, &path)?),
                other => {
                    return Err(ScaffoldError::InvalidInput(format!(
                        "schema key '{}' must map to a type tag or nested schema, got {}",
                        path,
                        json_kind(other)
                    )))
                }
            };
            entries.push(SchemaEntry { key: key.clone(), node });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a top-level entry
    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.node)
    }

    /// All typed fields, depth-first in input order
    pub fn leaves(&self) -> Vec<Leaf<'_>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<String>, out: &mut Vec<Leaf<'a>>) {
        for entry in &self.entries {
            prefix.push(entry.key.clone());
            match &entry.node {
                SchemaNode::Field(field) => out.push(Leaf {
                    path: prefix.clone(),
                    field,
                }),
                SchemaNode::Group(group) => group.collect_leaves(prefix, out),
            }
            prefix.pop();
        }
    }

    /// Maximum group nesting; a flat schema has depth 0
    pub fn depth(&self) -> usize {
        self.entries
            .iter()
            .map(|e| match &e.node {
                SchemaNode::Field(_) => 0,
                SchemaNode::Group(group) => 1 + group.depth(),
            })
            .max()
            .unwrap_or(0)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Naming Convention
// =============================================================================

/// The four name forms of one entity.
///
/// Accepts both descriptive keys and the legacy token keys
/// (`Users_1_000___`, `users_1_000___`, `User_1_000___`, `user_1_000___`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingConvention {
    #[serde(alias = "Users_1_000___")]
    pub plural_display: String,
    #[serde(alias = "users_1_000___")]
    pub plural_slug: String,
    #[serde(alias = "User_1_000___")]
    pub singular_display: String,
    #[serde(alias = "user_1_000___")]
    pub singular_slug: String,
}

impl NamingConvention {
    fn validate(&self) -> Result<()> {
        let forms = [
            ("pluralDisplay", &self.plural_display),
            ("pluralSlug", &self.plural_slug),
            ("singularDisplay", &self.singular_display),
            ("singularSlug", &self.singular_slug),
        ];
        for (name, value) in forms {
            if value.trim().is_empty() {
                return Err(ScaffoldError::InvalidInput(format!(
                    "namingConvention.{} must not be empty",
                    name
                )));
            }
        }
        NameForms::derive(self).check()
    }
}

// =============================================================================
// Template Sets
// =============================================================================

/// Named group of artifacts produced by one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSet {
    /// Every artifact
    #[default]
    Crud,
    /// Persistence model, types and REST handlers
    Api,
    /// Types, components, pages, store and hooks
    Ui,
}

impl TemplateSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateSet::Crud => "crud",
            TemplateSet::Api => "api",
            TemplateSet::Ui => "ui",
        }
    }
}

impl FromStr for TemplateSet {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crud" | "default" | "full" | "" => Ok(TemplateSet::Crud),
            "api" => Ok(TemplateSet::Api),
            "ui" => Ok(TemplateSet::Ui),
            _ => Err(ScaffoldError::UnknownTemplate(s.to_string())),
        }
    }
}

impl fmt::Display for TemplateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Input Config
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInput {
    #[serde(default)]
    uid: Option<Value>,
    #[serde(default)]
    template_name: Option<String>,
    schema: Map<String, Value>,
    naming_convention: NamingConvention,
}

/// Parsed, immutable input of one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub uid: String,
    pub template: TemplateSet,
    pub schema: Schema,
    pub naming: NamingConvention,
}

impl InputConfig {
    /// Parse from a JSON string, failing fast on malformed input
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawInput = serde_json::from_str(json)?;
        Self::from_raw(raw, None)
    }

    /// Parse from a JSON string, using `fallback` when `templateName` is absent
    pub fn from_json_with_default(json: &str, fallback: TemplateSet) -> Result<Self> {
        let raw: RawInput = serde_json::from_str(json)?;
        Self::from_raw(raw, Some(fallback))
    }

    /// Read and parse a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn from_raw(raw: RawInput, fallback: Option<TemplateSet>) -> Result<Self> {
        raw.naming_convention.validate()?;

        let uid = match raw.uid {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(ScaffoldError::InvalidInput(format!(
                    "uid must be a string or number, got {}",
                    json_kind(&other)
                )))
            }
        };

        let template = match raw.template_name {
            Some(name) => name.parse()?,
            None => fallback.unwrap_or_default(),
        };

        Ok(Self {
            uid,
            template,
            schema: Schema::from_json_map(&raw.schema)?,
            naming: raw.naming_convention,
        })
    }

    /// Derived name forms for templates
    pub fn names(&self) -> NameForms {
        NameForms::derive(&self.naming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "uid": "u-1",
        "templateName": "CRUD",
        "schema": {
            "title": "string",
            "status": "SELECT#draft, published,",
            "period": { "start": "DATE", "end": "DATE" },
            "photos": "IMAGES"
        },
        "namingConvention": {
            "pluralDisplay": "Posts",
            "pluralSlug": "posts",
            "singularDisplay": "Post",
            "singularSlug": "post"
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let input = InputConfig::from_json(SAMPLE).unwrap();
        assert_eq!(input.uid, "u-1");
        assert_eq!(input.template, TemplateSet::Crud);
        assert_eq!(input.schema.len(), 4);
        assert_eq!(input.schema.depth(), 1);

        let keys: Vec<String> = input.schema.leaves().iter().map(|l| l.dotted()).collect();
        assert_eq!(keys, vec!["title", "status", "period.start", "period.end", "photos"]);
    }

    #[test]
    fn test_field_spec_options() {
        let field = FieldSpec::parse("status", "select#draft, published,");
        assert_eq!(field.field_type, FieldType::Select);
        assert_eq!(field.options, vec!["draft", "published"]);
        assert!(!field.uses_default_options());
    }

    #[test]
    fn test_enumerated_without_options_uses_defaults() {
        let field = FieldSpec::parse("kind", "RADIO");
        let defaults = vec!["option-1".to_string(), "option-2".to_string()];
        assert!(field.uses_default_options());
        assert_eq!(field.effective_options(&defaults), defaults);

        let plain = FieldSpec::parse("name", "STRING");
        assert!(plain.effective_options(&defaults).is_empty());
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let field = FieldSpec::parse("geo", "location");
        assert_eq!(field.field_type, FieldType::Unsupported("LOCATION".to_string()));
        assert!(!field.field_type.is_supported());
    }

    #[test]
    fn test_legacy_naming_tokens() {
        let json = r#"{
            "schema": { "name": "STRING" },
            "namingConvention": {
                "Users_1_000___": "Users",
                "users_1_000___": "users",
                "User_1_000___": "User",
                "user_1_000___": "user"
            }
        }"#;
        let input = InputConfig::from_json(json).unwrap();
        assert_eq!(input.naming.plural_display, "Users");
        assert_eq!(input.naming.singular_slug, "user");
        assert_eq!(input.uid, "");
        assert_eq!(input.template, TemplateSet::Crud);
    }

    #[test]
    fn test_malformed_json_fails_fast() {
        assert!(matches!(InputConfig::from_json("{not json"), Err(ScaffoldError::Json(_))));
    }

    #[test]
    fn test_invalid_schema_value() {
        let json = r#"{
            "schema": { "count": 3 },
            "namingConvention": { "pluralDisplay": "A", "pluralSlug": "a", "singularDisplay": "A", "singularSlug": "a" }
        }"#;
        let err = InputConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidInput(msg) if msg.contains("count")));
    }

    #[test]
    fn test_empty_naming_form_rejected() {
        let json = r#"{
            "schema": {},
            "namingConvention": { "pluralDisplay": " ", "pluralSlug": "a", "singularDisplay": "A", "singularSlug": "a" }
        }"#;
        assert!(matches!(InputConfig::from_json(json), Err(ScaffoldError::InvalidInput(_))));
    }

    #[test]
    fn test_names_without_identifier_rejected() {
        let json = r#"{
            "schema": { "name": "STRING" },
            "namingConvention": { "pluralDisplay": "Things", "pluralSlug": "things", "singularDisplay": "!!!", "singularSlug": "thing" }
        }"#;
        assert!(matches!(InputConfig::from_json(json), Err(ScaffoldError::InvalidInput(_))));

        let json = json.replace("!!!", "Badge");
        assert!(matches!(InputConfig::from_json(&json), Err(ScaffoldError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_template_set() {
        let json = r#"{
            "templateName": "mobile",
            "schema": {},
            "namingConvention": { "pluralDisplay": "A", "pluralSlug": "a", "singularDisplay": "A", "singularSlug": "a" }
        }"#;
        assert!(matches!(InputConfig::from_json(json), Err(ScaffoldError::UnknownTemplate(_))));
    }

    #[test]
    fn test_template_fallback() {
        let json = r#"{
            "schema": {},
            "namingConvention": { "pluralDisplay": "A", "pluralSlug": "a", "singularDisplay": "A", "singularSlug": "a" }
        }"#;
        let input = InputConfig::from_json_with_default(json, TemplateSet::Api).unwrap();
        assert_eq!(input.template, TemplateSet::Api);
    }
}
