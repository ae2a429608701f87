//! Input Linting
//!
//! Checks a parsed input document before generation. Errors describe input
//! that would produce broken code; warnings describe input that generates
//! but probably not as intended.
//!
//! ## Errors
//! 1. **EMPTY_SCHEMA**: no fields to generate
//! 2. **RESERVED_KEY**: top-level key collides with a generated field
//! 3. **EMPTY_KEY**: blank schema key
//! 4. **INVALID_SLUG**: slug is not lower-case kebab-case
//! 5. **DOTTED_KEY**: key contains `.`, which clashes with nested field paths
//!
//! ## Warnings
//! Unknown type tags (with a suggestion), default options, duplicate or
//! ignored options, display-name casing, identical singular/plural forms,
//! keys that need quoting, deep nesting and empty groups.

use std::collections::HashSet;
use std::path::Path;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;

use crate::error::{Result, ScaffoldError};
use crate::input::{FieldSpec, FieldType, InputConfig, Schema, SchemaNode};
use crate::names::is_js_identifier;

/// Result of linting one input
#[derive(Debug, Default)]
pub struct LintResult {
    pub input_id: String,
    pub errors: Vec<LintError>,
    pub warnings: Vec<LintWarning>,
}

impl LintResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// `Err(LintFailed)` when there are errors
    pub fn ensure_clean(&self) -> Result<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(ScaffoldError::LintFailed(self.errors.len()))
        }
    }

    fn error(&mut self, code: &'static str, path: impl Into<String>, message: String) {
        self.errors.push(LintError {
            code,
            message,
            path: path.into(),
        });
    }

    fn warn(&mut self, code: &'static str, path: impl Into<String>, message: String) {
        self.warnings.push(LintWarning {
            code,
            message,
            path: path.into(),
        });
    }
}

#[derive(Debug)]
pub struct LintError {
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

#[derive(Debug)]
pub struct LintWarning {
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

/// The input linter
pub struct InputLinter {
    slug_pattern: Regex,
    /// Keys the generated model and types already define
    reserved_keys: HashSet<&'static str>,
    matcher: SkimMatcherV2,
}

impl Default for InputLinter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputLinter {
    pub fn new() -> Self {
        Self {
            slug_pattern: Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid"),
            reserved_keys: ["_id", "id", "__v", "createdAt", "updatedAt"].into_iter().collect(),
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Lint a parsed input
    pub fn lint(&self, input_id: &str, input: &InputConfig) -> LintResult {
        let mut result = LintResult {
            input_id: input_id.to_string(),
            ..Default::default()
        };

        self.lint_naming(input, &mut result);

        if input.schema.leaves().is_empty() {
            result.error("EMPTY_SCHEMA", "schema", "Schema defines no fields; nothing to generate".to_string());
        }
        for entry in input.schema.entries() {
            if self.reserved_keys.contains(entry.key.as_str()) {
                result.error(
                    "RESERVED_KEY",
                    entry.key.clone(),
                    format!("'{}' collides with a field every generated model already has", entry.key),
                );
            }
        }
        self.lint_schema(&input.schema, "", &mut result);

        result
    }

    fn lint_naming(&self, input: &InputConfig, result: &mut LintResult) {
        let naming = &input.naming;

        for (name, slug) in [("pluralSlug", &naming.plural_slug), ("singularSlug", &naming.singular_slug)] {
            if !self.slug_pattern.is_match(slug) {
                result.error(
                    "INVALID_SLUG",
                    format!("namingConvention.{}", name),
                    format!("'{}' is not a lower-case kebab-case slug", slug),
                );
            }
        }

        for (name, display) in [
            ("pluralDisplay", &naming.plural_display),
            ("singularDisplay", &naming.singular_display),
        ] {
            if !display.starts_with(|c: char| c.is_uppercase()) {
                result.warn(
                    "DISPLAY_CASE",
                    format!("namingConvention.{}", name),
                    format!("Display name '{}' does not start with an upper-case letter", display),
                );
            }
        }

        let names = input.names();
        if names.plural_ident == names.singular_ident || naming.plural_slug == naming.singular_slug {
            result.warn(
                "SAME_SINGULAR_PLURAL",
                "namingConvention",
                format!(
                    "Singular and plural forms are identical; the list hook is generated as '{}'",
                    names.list_hook
                ),
            );
        }
    }

    fn lint_schema(&self, schema: &Schema, prefix: &str, result: &mut LintResult) {
        let depth = if prefix.is_empty() { 0 } else { prefix.matches('.').count() + 1 };

        for entry in schema.entries() {
            let path = if prefix.is_empty() {
                entry.key.clone()
            } else {
                format!("{}.{}", prefix, entry.key)
            };

            if entry.key.trim().is_empty() {
                result.error("EMPTY_KEY", path.clone(), "Schema keys must not be empty".to_string());
            } else if entry.key.contains('.') {
                result.error(
                    "DOTTED_KEY",
                    path.clone(),
                    format!("'{}' contains '.', which reads as a nested field path", entry.key),
                );
            } else if !is_js_identifier(&entry.key) {
                result.warn(
                    "NON_IDENTIFIER_KEY",
                    path.clone(),
                    format!("'{}' is not a JavaScript identifier and will be quoted in generated code", entry.key),
                );
            }

            match &entry.node {
                SchemaNode::Field(field) => {
                    if depth > 1 {
                        result.warn(
                            "DEEP_NESTING",
                            path.clone(),
                            "Fields nested more than one level deep are hard to edit in generated forms".to_string(),
                        );
                    }
                    self.lint_field(field, &path, result);
                }
                SchemaNode::Group(group) => {
                    if group.is_empty() {
                        result.warn("EMPTY_GROUP", path.clone(), "Group has no fields".to_string());
                    }
                    self.lint_schema(group, &path, result);
                }
            }
        }
    }

    fn lint_field(&self, field: &FieldSpec, path: &str, result: &mut LintResult) {
        if let FieldType::Unsupported(tag) = &field.field_type {
            let message = match self.suggest_tag(tag) {
                Some(suggestion) => format!("Unknown type '{}' (did you mean '{}'?); it will be a disabled text field", tag, suggestion),
                None => format!("Unknown type '{}'; it will be a disabled text field", tag),
            };
            result.warn("UNKNOWN_TYPE", path, message);
        }

        if field.uses_default_options() {
            result.warn(
                "DEFAULT_OPTIONS",
                path,
                format!("{} field has no options; the default option set is used", field.field_type),
            );
        }

        if !field.options.is_empty() && !field.field_type.is_enumerated() {
            result.warn(
                "IGNORED_OPTIONS",
                path,
                format!("Options are ignored for {} fields", field.field_type),
            );
        }

        let mut seen = HashSet::new();
        for option in &field.options {
            if !seen.insert(option.as_str()) {
                result.warn("DUPLICATE_OPTION", path, format!("Option '{}' is listed more than once", option));
            }
        }
    }

    /// Closest known tag for an unknown one
    pub fn suggest_tag(&self, tag: &str) -> Option<&'static str> {
        let wanted = tag.trim().to_ascii_uppercase();
        if wanted.is_empty() {
            return None;
        }
        let known: Vec<&'static str> = FieldType::ALL.iter().map(|t| t.tag()).collect();

        let mut best: Option<(i64, &'static str)> = None;
        for &candidate in &known {
            if let Some(score) = self.matcher.fuzzy_match(candidate, &wanted) {
                if best.map(|(s, _)| score > s).unwrap_or(true) {
                    best = Some((score, candidate));
                }
            }
        }
        if let Some((_, tag)) = best {
            return Some(tag);
        }

        similar::get_close_matches(wanted.as_str(), &known, 1, 0.6)
            .into_iter()
            .next()
    }
}

/// Lint one input document
pub fn lint_input(input_id: &str, input: &InputConfig) -> LintResult {
    InputLinter::new().lint(input_id, input)
}

/// Lint every JSON input under a directory.
///
/// Files that fail to parse are reported as `PARSE_ERROR`.
pub fn lint_inputs(dir: &Path) -> Vec<LintResult> {
    let linter = InputLinter::new();
    let mut results = Vec::new();

    let mut paths: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "json").unwrap_or(false))
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    for path in paths {
        let input_id = path
            .strip_prefix(dir)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| path.to_string_lossy().to_string());

        match InputConfig::from_path(&path) {
            Ok(input) => results.push(linter.lint(&input_id, &input)),
            Err(e) => {
                let mut result = LintResult {
                    input_id,
                    ..Default::default()
                };
                result.error("PARSE_ERROR", "", e.to_string());
                results.push(result);
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(schema: &str, naming: &str) -> InputConfig {
        InputConfig::from_json(&format!(r#"{{ "schema": {}, "namingConvention": {} }}"#, schema, naming)).unwrap()
    }

    const NAMING: &str = r#"{
        "pluralDisplay": "Posts",
        "pluralSlug": "posts",
        "singularDisplay": "Post",
        "singularSlug": "post"
    }"#;

    fn codes(result: &LintResult) -> Vec<&'static str> {
        result
            .errors
            .iter()
            .map(|e| e.code)
            .chain(result.warnings.iter().map(|w| w.code))
            .collect()
    }

    #[test]
    fn test_clean_input() {
        let result = lint_input("t", &input(r#"{ "title": "STRING", "status": "SELECT#a,b" }"#, NAMING));
        assert!(result.is_clean());
        assert!(!result.has_warnings(), "{:?}", result.warnings);
        assert!(result.ensure_clean().is_ok());
    }

    #[test]
    fn test_empty_schema() {
        let result = lint_input("t", &input("{}", NAMING));
        assert!(codes(&result).contains(&"EMPTY_SCHEMA"));
        assert!(matches!(result.ensure_clean(), Err(ScaffoldError::LintFailed(1))));

        let result = lint_input("t", &input(r#"{ "meta": {} }"#, NAMING));
        assert!(codes(&result).contains(&"EMPTY_SCHEMA"));
        assert!(codes(&result).contains(&"EMPTY_GROUP"));
    }

    #[test]
    fn test_reserved_keys() {
        let result = lint_input("t", &input(r#"{ "_id": "STRING", "createdAt": "DATE", "meta": { "id": "STRING" } }"#, NAMING));
        let reserved: Vec<_> = result.errors.iter().filter(|e| e.code == "RESERVED_KEY").collect();
        assert_eq!(reserved.len(), 2);
    }

    #[test]
    fn test_invalid_slug_and_display_case() {
        let naming = r#"{
            "pluralDisplay": "posts",
            "pluralSlug": "Blog Posts",
            "singularDisplay": "Post",
            "singularSlug": "post"
        }"#;
        let result = lint_input("t", &input(r#"{ "title": "STRING" }"#, naming));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "namingConvention.pluralSlug");
        assert!(codes(&result).contains(&"DISPLAY_CASE"));
    }

    #[test]
    fn test_same_singular_and_plural() {
        let naming = r#"{
            "pluralDisplay": "Sheep",
            "pluralSlug": "sheep",
            "singularDisplay": "Sheep",
            "singularSlug": "sheep"
        }"#;
        let result = lint_input("t", &input(r#"{ "name": "STRING" }"#, naming));
        assert!(result.is_clean());
        let warning = result.warnings.iter().find(|w| w.code == "SAME_SINGULAR_PLURAL").unwrap();
        assert!(warning.message.contains("useSheepList"));

        // Different display strings, same identifier
        let naming = r#"{
            "pluralDisplay": "sheep",
            "pluralSlug": "flock",
            "singularDisplay": "Sheep",
            "singularSlug": "sheep"
        }"#;
        let result = lint_input("t", &input(r#"{ "name": "STRING" }"#, naming));
        assert!(codes(&result).contains(&"SAME_SINGULAR_PLURAL"));
    }

    #[test]
    fn test_dotted_keys() {
        let result = lint_input("t", &input(r#"{ "a.b": "STRING", "a": { "b": "STRING" } }"#, NAMING));
        assert!(matches!(result.ensure_clean(), Err(ScaffoldError::LintFailed(1))));
        assert_eq!(result.errors[0].code, "DOTTED_KEY");
        assert_eq!(result.errors[0].path, "a.b");
    }

    #[test]
    fn test_field_warnings() {
        let result = lint_input(
            "t",
            &input(
                r#"{
                    "kind": "RADIO",
                    "level": "SELECT#low,low,high",
                    "title": "STRING#ignored",
                    "zip-code": "STRNG",
                    "a": { "b": { "c": "NUMBER" } }
                }"#,
                NAMING,
            ),
        );
        assert!(result.is_clean());
        let codes = codes(&result);
        for code in ["DEFAULT_OPTIONS", "DUPLICATE_OPTION", "IGNORED_OPTIONS", "NON_IDENTIFIER_KEY", "UNKNOWN_TYPE", "DEEP_NESTING"] {
            assert!(codes.contains(&code), "missing {}", code);
        }
        let unknown = result.warnings.iter().find(|w| w.code == "UNKNOWN_TYPE").unwrap();
        assert!(unknown.message.contains("did you mean 'STRING'"));
        assert_eq!(unknown.path, "zip-code");
    }

    #[test]
    fn test_suggest_tag() {
        let linter = InputLinter::new();
        assert_eq!(linter.suggest_tag("strng"), Some("STRING"));
        assert!(linter.suggest_tag("IMG").unwrap().starts_with("IMAGE"));
        assert_eq!(linter.suggest_tag(""), None);
    }

    #[test]
    fn test_lint_inputs_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("posts.json"),
            format!(r#"{{ "schema": {{ "title": "STRING" }}, "namingConvention": {} }}"#, NAMING),
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "skip").unwrap();

        let results = lint_inputs(dir.path());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].input_id, "broken.json");
        assert_eq!(results[0].errors[0].code, "PARSE_ERROR");
        assert!(results[1].is_clean());
    }
}
