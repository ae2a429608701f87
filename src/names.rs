//! Name Derivation
//!
//! Derives every identifier form the templates need from the four names of a
//! naming convention, plus the JavaScript quoting helpers the generators use
//! when schema keys end up in generated source.
//!
//! - `Blog Posts` / `blog-posts` / `Blog Post` / `blog-post` become
//!   `BlogPosts`, `BlogPost`, `blogPosts`, `blogPost`
//! - schema keys become labels (`firstName` -> `First Name`)
//! - keys that are not JS identifiers are quoted wherever they are emitted

use crate::codegen::types::{DISPLAY_COMPONENTS, WIDGET_COMPONENTS};
use crate::error::{Result, ScaffoldError};
use crate::input::NamingConvention;

/// Hooks imported next to the generated hooks
const FRAMEWORK_HOOKS: &[&str] = &["useMutation", "useQuery", "useQueryClient", "useState", "useParams", "useRouter"];

/// Default import of `next/link` in generated pages and lists
const LINK_IMPORT: &str = "NextLink";

// =============================================================================
// Name Forms
// =============================================================================

/// All name forms of one entity, resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameForms {
    /// Plural display name as given (`Blog Posts`)
    pub plural: String,
    /// Plural slug as given (`blog-posts`), used for folders and URLs
    pub plural_slug: String,
    /// Singular display name as given (`Blog Post`)
    pub singular: String,
    /// Singular slug as given (`blog-post`)
    pub singular_slug: String,
    /// PascalCase singular (`BlogPost`), used for types and components
    pub singular_ident: String,
    /// PascalCase plural (`BlogPosts`)
    pub plural_ident: String,
    /// camelCase singular (`blogPost`), used for variables
    pub singular_var: String,
    /// camelCase plural (`blogPosts`)
    pub plural_var: String,
    /// List query hook (`useBlogPosts`; `useSheepList` when both idents match)
    pub list_hook: String,
}

impl NameForms {
    /// Derive all forms from a naming convention
    pub fn derive(naming: &NamingConvention) -> Self {
        let singular_ident = to_pascal_case(&naming.singular_display);
        let plural_ident = to_pascal_case(&naming.plural_display);
        let list_hook = if plural_ident == singular_ident {
            format!("use{}List", plural_ident)
        } else {
            format!("use{}", plural_ident)
        };
        Self {
            plural: naming.plural_display.clone(),
            plural_slug: naming.plural_slug.clone(),
            singular: naming.singular_display.clone(),
            singular_slug: naming.singular_slug.clone(),
            singular_var: escape_js_keyword(lower_first(&singular_ident)),
            plural_var: escape_js_keyword(lower_first(&plural_ident)),
            singular_ident,
            plural_ident,
            list_hook,
        }
    }

    /// Reject names that would produce empty or clashing identifiers
    pub fn check(&self) -> Result<()> {
        let invalid = |message: String| Err(ScaffoldError::InvalidInput(message));

        for (form, ident) in [("singularDisplay", &self.singular_ident), ("pluralDisplay", &self.plural_ident)] {
            if ident.is_empty() {
                return invalid(format!("namingConvention.{} must contain a letter or digit", form));
            }
        }

        let s = &self.singular_ident;
        if s == LINK_IMPORT || DISPLAY_COMPONENTS.contains(&s.as_str()) {
            return invalid(format!("entity name '{}' clashes with a component imported by generated views", s));
        }
        let input_type = format!("{}Input", s);
        if WIDGET_COMPONENTS.contains(&input_type.as_str()) {
            return invalid(format!("type '{}' clashes with a form widget of the same name", input_type));
        }
        for hook in [format!("use{}", s), self.list_hook.clone()] {
            if FRAMEWORK_HOOKS.contains(&hook.as_str()) {
                return invalid(format!("generated hook '{}' clashes with a framework hook", hook));
            }
        }
        Ok(())
    }

    /// Template placeholder bindings for every name form
    pub fn bindings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Plural", self.plural.clone()),
            ("plural_slug", self.plural_slug.clone()),
            ("Singular", self.singular.clone()),
            ("singular_slug", self.singular_slug.clone()),
            ("SingularIdent", self.singular_ident.clone()),
            ("PluralIdent", self.plural_ident.clone()),
            ("singularVar", self.singular_var.clone()),
            ("pluralVar", self.plural_var.clone()),
            ("listHook", self.list_hook.clone()),
            ("plural_lower", self.plural.to_lowercase()),
            ("singular_lower", self.singular.to_lowercase()),
        ]
    }
}

// =============================================================================
// Case Conversion
// =============================================================================

/// Convert to PascalCase, splitting on any non-alphanumeric character.
///
/// Existing inner capitals are kept (`BlogPost` stays `BlogPost`).
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}

/// Convert to camelCase
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Turn a schema key into a human label (`firstName` / `first_name` -> `First Name`)
pub fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in key.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// JavaScript Quoting
// =============================================================================

/// Quote a string as a JS/TS string literal (JSON escaping is valid JS)
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

/// Quote a list of strings as a JS array literal
pub fn js_string_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| js_string(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Check whether a key can be used bare as a JS identifier / property name
pub fn is_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render a key as an object-literal property name, quoting when needed
pub fn js_property(key: &str) -> String {
    if is_js_identifier(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

/// Render a property access chain (`row.period?.start`, `row["first-name"]`).
///
/// Every step after the first top-level key uses optional chaining.
pub fn js_access(base: &str, path: &[String]) -> String {
    let mut out = base.to_string();
    for (i, key) in path.iter().enumerate() {
        let optional = if i > 0 { "?." } else { "" };
        if is_js_identifier(key) {
            if optional.is_empty() {
                out.push('.');
            } else {
                out.push_str(optional);
            }
            out.push_str(key);
        } else {
            out.push_str(optional);
            out.push('[');
            out.push_str(&js_string(key));
            out.push(']');
        }
    }
    out
}

/// Escape JS reserved words by appending an underscore
fn escape_js_keyword(s: String) -> String {
    if is_js_keyword(&s) {
        format!("{}_", s)
    } else {
        s
    }
}

fn is_js_keyword(s: &str) -> bool {
    matches!(
        s,
        "break" | "case" | "catch" | "class" | "const" | "continue" | "debugger" |
        "default" | "delete" | "do" | "else" | "enum" | "export" | "extends" |
        "false" | "finally" | "for" | "function" | "if" | "import" | "in" |
        "instanceof" | "new" | "null" | "return" | "super" | "switch" | "this" |
        "throw" | "true" | "try" | "typeof" | "var" | "void" | "while" | "with" |
        "yield" | "let" | "static" | "implements" | "interface" | "package" |
        "private" | "protected" | "public" | "await"
    )
}
