//! Template Engine
//!
//! Templates are plain text with delimited placeholders (`{{name}}`). A
//! template is parsed once into literal and placeholder segments and rendered
//! against a set of bindings.
//!
//! - A placeholder is `{{`, optional spaces, an identifier, optional spaces, `}}`.
//!   Anything else starting with `{{` stays literal (`style={{ a: 1 }}`).
//! - The parser always consumes the whole identifier between the delimiters,
//!   so `{{pluralVar}}` can never match inside `{{totalPluralVar}}`.
//! - Rendering an unbound placeholder is an error; nothing leaks into output.
//! - A placeholder alone on its line indents every continuation line of its
//!   value to the placeholder's column. An empty value removes the line.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use include_dir::{include_dir, Dir};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};

/// Built-in templates, compiled into the binary
static BUILTIN_TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

// =============================================================================
// Template
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source
    pub fn parse(name: impl Into<String>, source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            literal.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            match scan_placeholder(after_open) {
                Some((ident, consumed)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(ident.to_string()));
                    rest = &after_open[consumed..];
                }
                None => {
                    literal.push_str("{{");
                    rest = after_open;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            name: name.into(),
            segments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all placeholders used by this template
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Render against bindings; unbound placeholders are an error
    pub fn render(&self, bindings: &Bindings) -> Result<String> {
        let mut out = String::new();
        let mut drop_next_newline = false;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    let text = if drop_next_newline {
                        text.strip_prefix('\n').unwrap_or(text)
                    } else {
                        text
                    };
                    drop_next_newline = false;
                    out.push_str(text);
                }
                Segment::Placeholder(name) => {
                    let value = bindings.get(name).ok_or_else(|| {
                        ScaffoldError::template(&self.name, format!("unbound placeholder '{{{{{}}}}}'", name))
                    })?;

                    let line_start = out.rfind('\n').map(|i| i + 1).unwrap_or(0);
                    let prefix = &out[line_start..];
                    let standalone = prefix.chars().all(|c| c == ' ' || c == '\t');

                    if standalone && value.is_empty() {
                        out.truncate(line_start);
                        drop_next_newline = true;
                    } else if standalone {
                        let indent = prefix.to_string();
                        push_indented(&mut out, value, &indent);
                    } else {
                        out.push_str(value);
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Scan `  ident  }}` right after an opening `{{`.
///
/// Returns the identifier and the number of bytes consumed including `}}`.
fn scan_placeholder(s: &str) -> Option<(&str, usize)> {
    let trimmed = s.trim_start_matches(' ');
    let lead = s.len() - trimmed.len();

    let mut chars = trimmed.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return None,
    }
    let ident_len = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let ident = &trimmed[..ident_len];

    let after_ident = &trimmed[ident_len..];
    let after_spaces = after_ident.trim_start_matches(' ');
    if !after_spaces.starts_with("}}") {
        return None;
    }
    let trailing = after_ident.len() - after_spaces.len();

    Some((ident, lead + ident_len + trailing + 2))
}

fn push_indented(out: &mut String, value: &str, indent: &str) {
    for (i, line) in value.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
}

// =============================================================================
// Bindings
// =============================================================================

/// Placeholder name -> value
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, replacing any earlier binding of the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Bind several values
    pub fn extend<N, V>(&mut self, pairs: impl IntoIterator<Item = (N, V)>) -> &mut Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        for (name, value) in pairs {
            self.set(name, value);
        }
        self
    }

    /// Take every binding of `other`, replacing existing names
    pub fn merge(&mut self, other: Bindings) -> &mut Self {
        self.values.extend(other.values);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

// =============================================================================
// Template Library
// =============================================================================

/// Built-in templates plus optional on-disk overrides (matched by file name)
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    overrides: HashMap<String, String>,
}

impl TemplateLibrary {
    /// Library with built-in templates only
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load every `*.tmpl` file in `dir` as an override of the same name
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ScaffoldError::template(
                dir.display().to_string(),
                "template override directory does not exist",
            ));
        }

        let mut overrides = HashMap::new();
        for entry in WalkDir::new(dir).max_depth(1).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map(|e| e != "tmpl").unwrap_or(true) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                debug!(template = name, "loading template override");
                overrides.insert(name.to_string(), std::fs::read_to_string(path)?);
            }
        }
        Ok(Self { overrides })
    }

    /// Names of all built-in templates
    pub fn builtin_names() -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_TEMPLATES
            .files()
            .filter_map(|f| f.path().file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        names.sort();
        names
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains_key(name)
    }

    /// Look up and parse a template by file name
    pub fn get(&self, name: &str) -> Result<Template> {
        if let Some(source) = self.overrides.get(name) {
            return Ok(Template::parse(name, source));
        }
        let source = BUILTIN_TEMPLATES
            .get_file(name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| ScaffoldError::template(name, "no such template"))?;
        Ok(Template::parse(name, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> Bindings {
        let mut b = Bindings::new();
        b.extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        b
    }

    #[test]
    fn test_simple_substitution() {
        let t = Template::parse("t", "export const {{ name }} = \"{{value}}\";");
        let out = t.render(&bindings(&[("name", "x"), ("value", "y")])).unwrap();
        assert_eq!(out, "export const x = \"y\";");
    }

    #[test]
    fn test_whole_identifier_is_matched() {
        let t = Template::parse("t", "{{totalPlural}} {{Plural}}");
        assert_eq!(
            t.placeholders().into_iter().collect::<Vec<_>>(),
            vec!["Plural", "totalPlural"]
        );
        let out = t
            .render(&bindings(&[("Plural", "Users"), ("totalPlural", "userCount")]))
            .unwrap();
        assert_eq!(out, "userCount Users");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let t = Template::parse("t", "{{a}}");
        let out = t.render(&bindings(&[("a", "{{b}}")])).unwrap();
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn test_jsx_double_braces_stay_literal() {
        let source = "<div style={{ width: 10 }} />{{x}}";
        let t = Template::parse("t", source);
        let out = t.render(&bindings(&[("x", "!")])).unwrap();
        assert_eq!(out, "<div style={{ width: 10 }} />!");
    }

    #[test]
    fn test_unbound_placeholder_errors() {
        let t = Template::parse("model.ts.tmpl", "{{missing}}");
        let err = t.render(&Bindings::new()).unwrap_err();
        assert!(matches!(err, ScaffoldError::Template { ref template, .. } if template == "model.ts.tmpl"));
    }

    #[test]
    fn test_standalone_placeholder_indents_block() {
        let t = Template::parse("t", "{\n  {{fields}}\n}\n");
        let out = t.render(&bindings(&[("fields", "a: 1,\nb: {\n  c: 2,\n},")])).unwrap();
        assert_eq!(out, "{\n  a: 1,\n  b: {\n    c: 2,\n  },\n}\n");
    }

    #[test]
    fn test_empty_standalone_placeholder_removes_line() {
        let t = Template::parse("t", "import a;\n{{extra}}\nimport b;\n");
        let out = t.render(&bindings(&[("extra", "")])).unwrap();
        assert_eq!(out, "import a;\nimport b;\n");
    }

    #[test]
    fn test_inline_placeholder_is_not_indented() {
        let t = Template::parse("t", "  const x = {{value}};");
        let out = t.render(&bindings(&[("value", "[\n1,\n]")])).unwrap();
        assert_eq!(out, "  const x = [\n1,\n];");
    }

    #[test]
    fn test_builtin_templates_parse() {
        let library = TemplateLibrary::builtin();
        let names = TemplateLibrary::builtin_names();
        assert!(names.contains(&"model.ts.tmpl".to_string()));
        for name in names {
            let template = library.get(&name).unwrap();
            assert!(template.placeholders().contains("header"), "{} has no header", name);
        }
    }

    #[test]
    fn test_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.ts.tmpl"), "// custom {{SingularIdent}}\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = TemplateLibrary::with_overrides(dir.path()).unwrap();
        assert!(library.is_overridden("model.ts.tmpl"));
        assert!(!library.is_overridden("notes.txt"));

        let out = library
            .get("model.ts.tmpl")
            .unwrap()
            .render(&bindings(&[("SingularIdent", "Post")]))
            .unwrap();
        assert_eq!(out, "// custom Post\n");
    }

    #[test]
    fn test_override_directory_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("store.ts.tmpl"), "nested").unwrap();
        std::fs::create_dir(dir.path().join("hooks.ts.tmpl")).unwrap();

        let library = TemplateLibrary::with_overrides(dir.path()).unwrap();
        assert!(!library.is_overridden("store.ts.tmpl"));
        assert!(!library.is_overridden("hooks.ts.tmpl"));
        assert!(TemplateLibrary::with_overrides(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_missing_template() {
        assert!(TemplateLibrary::builtin().get("nope.tmpl").is_err());
    }
}
