//! Type-to-Artifact Mapping
//!
//! The fixed table from field-type tag to every artifact fragment:
//! persistence declaration, UI widget, TypeScript type, default value and
//! display renderer. Unknown tags degrade to a disabled string field with a
//! visible marker instead of failing generation.

use crate::input::{FieldSpec, FieldType};
use crate::names::{js_string, js_string_array};

// =============================================================================
// Widgets
// =============================================================================

/// Every form widget the widgets module must export
pub const WIDGET_COMPONENTS: &[&str] = &[
    "TextInput",
    "TextArea",
    "EmailInput",
    "PasswordInput",
    "UrlInput",
    "PhoneInput",
    "ColorPicker",
    "NumberInput",
    "Switch",
    "Select",
    "RadioGroup",
    "MultiSelect",
    "CheckboxGroup",
    "TagsInput",
    "DatePicker",
    "TimePicker",
    "DateTimePicker",
    "ImageUpload",
    "FileUpload",
];

/// Every display component the widgets module must export
pub const DISPLAY_COMPONENTS: &[&str] = &["Badge", "Thumbnail", "ImageStrip", "FileLink", "ColorSwatch"];

/// A JSX attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    /// `name="text"` (or `name={"text"}` when the text needs escaping)
    Text(String),
    /// `name={expr}`
    Expr(String),
    /// bare `name`
    Flag,
}

/// The form widget a field renders with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    /// Component exported by the widgets module
    pub component: &'static str,
    pub props: Vec<(String, PropValue)>,
    pub disabled: bool,
}

impl Widget {
    fn new(component: &'static str) -> Self {
        Self {
            component,
            props: Vec::new(),
            disabled: false,
        }
    }

    fn prop(mut self, name: &str, value: PropValue) -> Self {
        self.props.push((name.to_string(), value));
        self
    }

    /// Render all props as JSX attributes, each prefixed with a space
    pub fn render_props(&self) -> String {
        self.props
            .iter()
            .map(|(name, value)| format!(" {}", jsx_attr(name, value)))
            .collect()
    }
}

/// Render one JSX attribute
pub fn jsx_attr(name: &str, value: &PropValue) -> String {
    match value {
        PropValue::Text(text) if is_plain_jsx_text(text) => format!("{}=\"{}\"", name, text),
        PropValue::Text(text) => format!("{}={{{}}}", name, js_string(text)),
        PropValue::Expr(expr) => format!("{}={{{}}}", name, expr),
        PropValue::Flag => name.to_string(),
    }
}

/// Render text as a JSX child, wrapping it in an expression when needed
pub fn jsx_text(text: &str) -> String {
    if is_plain_jsx_text(text) && !text.contains(|c: char| c == '<' || c == '>') {
        text.to_string()
    } else {
        format!("{{{}}}", js_string(text))
    }
}

fn is_plain_jsx_text(text: &str) -> bool {
    !text.contains(|c: char| matches!(c, '"' | '\\' | '{' | '}' | '\n'))
}

// =============================================================================
// Display
// =============================================================================

/// How a stored value is shown in list and detail views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Text,
    Boolean,
    Date,
    DateTime,
    Badge,
    List,
    Image,
    Images,
    File,
    Files,
    Color,
    Link,
    Masked,
}

impl DisplayKind {
    /// JSX child expression showing the value at `access`
    pub fn render(&self, access: &str, label: &str) -> String {
        match self {
            DisplayKind::Text => format!("{{{} ?? \"-\"}}", access),
            DisplayKind::Boolean => format!("{{{} ? \"Yes\" : \"No\"}}", access),
            DisplayKind::Date => format!("{{formatDate({})}}", access),
            DisplayKind::DateTime => format!("{{formatDateTime({})}}", access),
            DisplayKind::Badge => format!("<Badge>{{{}}}</Badge>", access),
            DisplayKind::List => format!("{{({} ?? []).join(\", \")}}", access),
            DisplayKind::Image => format!("<Thumbnail src={{{}}} alt={} />", access, js_attr_string(label)),
            DisplayKind::Images => format!("<ImageStrip images={{{} ?? []}} alt={} />", access, js_attr_string(label)),
            DisplayKind::File => format!("<FileLink href={{{}}} />", access),
            DisplayKind::Files => format!("{{({} ?? []).map((href) => <FileLink key={{href}} href={{href}} />)}}", access),
            DisplayKind::Color => format!("<ColorSwatch color={{{}}} />", access),
            DisplayKind::Link => format!("<a href={{{0}}}>{{{0}}}</a>", access),
            DisplayKind::Masked => "********".to_string(),
        }
    }

    /// Components from the widgets module this display needs
    pub fn components(&self) -> &'static [&'static str] {
        match self {
            DisplayKind::Badge => &["Badge"],
            DisplayKind::Image => &["Thumbnail"],
            DisplayKind::Images => &["ImageStrip"],
            DisplayKind::File | DisplayKind::Files => &["FileLink"],
            DisplayKind::Color => &["ColorSwatch"],
            _ => &[],
        }
    }

    /// Helpers from the format module this display needs
    pub fn helpers(&self) -> &'static [&'static str] {
        match self {
            DisplayKind::Date => &["formatDate"],
            DisplayKind::DateTime => &["formatDateTime"],
            _ => &[],
        }
    }
}

fn js_attr_string(text: &str) -> String {
    if is_plain_jsx_text(text) {
        format!("\"{}\"", text)
    } else {
        format!("{{{}}}", js_string(text))
    }
}

// =============================================================================
// Field Mapping
// =============================================================================

/// Every artifact fragment for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Mongoose field definition (`{ type: String, trim: true }`)
    pub persistence: String,
    /// Form widget
    pub widget: Widget,
    /// TypeScript type annotation
    pub ts_type: String,
    /// Default value as a JS expression
    pub default_value: String,
    /// Display renderer for list / detail views
    pub display: DisplayKind,
    /// Marker shown for unsupported tags
    pub unsupported: Option<String>,
}

/// Map one field to its artifact fragments.
///
/// `label` is the human label of the field; `default_options` is used by
/// enumerated types that carry no options.
pub fn map_field(field: &FieldSpec, label: &str, default_options: &[String]) -> FieldMapping {
    let options = field.effective_options(default_options);
    let placeholder = PropValue::Text(format!("Enter {}", label.to_lowercase()));
    let text = |component: &'static str| Widget::new(component).prop("placeholder", placeholder.clone());

    let union = || {
        if options.is_empty() {
            "string".to_string()
        } else {
            options.iter().map(|o| js_string(o)).collect::<Vec<_>>().join(" | ")
        }
    };
    let options_expr = || PropValue::Expr(js_string_array(&options));
    let first_option = || options.first().map(|o| js_string(o)).unwrap_or_else(|| "\"\"".to_string());

    let (persistence, widget, ts_type, default_value, display) = match &field.field_type {
        FieldType::String => (
            "{ type: String, trim: true }".to_string(),
            text("TextInput"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Text,
        ),
        FieldType::Textarea => (
            "{ type: String, trim: true }".to_string(),
            text("TextArea").prop("rows", PropValue::Expr("4".to_string())),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Text,
        ),
        FieldType::Email => (
            "{ type: String, trim: true, lowercase: true, match: [/^\\S+@\\S+\\.\\S+$/, \"Invalid email address\"] }"
                .to_string(),
            text("EmailInput"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Text,
        ),
        FieldType::Password => (
            "{ type: String, select: false }".to_string(),
            Widget::new("PasswordInput"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Masked,
        ),
        FieldType::Url => (
            "{ type: String, trim: true }".to_string(),
            text("UrlInput"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Link,
        ),
        FieldType::Phone => (
            "{ type: String, trim: true }".to_string(),
            text("PhoneInput"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Text,
        ),
        FieldType::Color => (
            "{ type: String, default: \"#000000\" }".to_string(),
            Widget::new("ColorPicker"),
            "string".to_string(),
            "\"#000000\"".to_string(),
            DisplayKind::Color,
        ),
        FieldType::Number => (
            "{ type: Number }".to_string(),
            Widget::new("NumberInput"),
            "number".to_string(),
            "0".to_string(),
            DisplayKind::Text,
        ),
        FieldType::Boolean => (
            "{ type: Boolean, default: false }".to_string(),
            Widget::new("Switch"),
            "boolean".to_string(),
            "false".to_string(),
            DisplayKind::Boolean,
        ),
        FieldType::Select => (
            format!("{{ type: String, enum: {} }}", js_string_array(&options)),
            Widget::new("Select").prop("options", options_expr()),
            union(),
            first_option(),
            DisplayKind::Badge,
        ),
        FieldType::Radio => (
            format!("{{ type: String, enum: {} }}", js_string_array(&options)),
            Widget::new("RadioGroup").prop("options", options_expr()),
            union(),
            first_option(),
            DisplayKind::Badge,
        ),
        FieldType::MultiSelect => (
            format!("{{ type: [String], enum: {}, default: [] }}", js_string_array(&options)),
            Widget::new("MultiSelect").prop("options", options_expr()),
            format!("Array<{}>", union()),
            "[]".to_string(),
            DisplayKind::List,
        ),
        FieldType::MultiCheckbox => (
            format!("{{ type: [String], enum: {}, default: [] }}", js_string_array(&options)),
            Widget::new("CheckboxGroup").prop("options", options_expr()),
            format!("Array<{}>", union()),
            "[]".to_string(),
            DisplayKind::List,
        ),
        FieldType::Tags => (
            "{ type: [String], default: [] }".to_string(),
            Widget::new("TagsInput"),
            "string[]".to_string(),
            "[]".to_string(),
            DisplayKind::List,
        ),
        FieldType::Date => (
            "{ type: Date }".to_string(),
            Widget::new("DatePicker"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Date,
        ),
        FieldType::Time => (
            "{ type: String }".to_string(),
            Widget::new("TimePicker"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Text,
        ),
        FieldType::DateTime => (
            "{ type: Date }".to_string(),
            Widget::new("DateTimePicker"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::DateTime,
        ),
        FieldType::Image => (
            "{ type: String }".to_string(),
            Widget::new("ImageUpload").prop("accept", PropValue::Text("image/*".to_string())),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::Image,
        ),
        FieldType::Images => (
            "{ type: [String], default: [] }".to_string(),
            Widget::new("ImageUpload")
                .prop("accept", PropValue::Text("image/*".to_string()))
                .prop("multiple", PropValue::Flag),
            "string[]".to_string(),
            "[]".to_string(),
            DisplayKind::Images,
        ),
        FieldType::File => (
            "{ type: String }".to_string(),
            Widget::new("FileUpload"),
            "string".to_string(),
            "\"\"".to_string(),
            DisplayKind::File,
        ),
        FieldType::Files => (
            "{ type: [String], default: [] }".to_string(),
            Widget::new("FileUpload").prop("multiple", PropValue::Flag),
            "string[]".to_string(),
            "[]".to_string(),
            DisplayKind::Files,
        ),
        FieldType::Unsupported(tag) => {
            let marker = format!("Unsupported field type: {}", tag);
            let mut widget = Widget::new("TextInput")
                .prop("disabled", PropValue::Flag)
                .prop("hint", PropValue::Text(marker.clone()));
            widget.disabled = true;
            return FieldMapping {
                persistence: "{ type: String }".to_string(),
                widget,
                ts_type: "string".to_string(),
                default_value: "\"\"".to_string(),
                display: DisplayKind::Text,
                unsupported: Some(marker),
            };
        }
    };

    FieldMapping {
        persistence,
        widget,
        ts_type,
        default_value,
        display,
        unsupported: None,
    }
}

// =============================================================================
// Mapping Table
// =============================================================================

/// One row of the printable mapping table
#[derive(Debug, Clone)]
pub struct MappingRow {
    pub tag: String,
    pub persistence: String,
    pub widget: &'static str,
    pub ts_type: String,
    pub default_value: String,
}

/// The mapping of every supported tag, for documentation and the CLI
pub fn mapping_table(default_options: &[String]) -> Vec<MappingRow> {
    FieldType::ALL
        .iter()
        .map(|ty| {
            let field = FieldSpec::parse("field", ty.tag());
            let mapping = map_field(&field, "Field", default_options);
            MappingRow {
                tag: ty.tag().to_string(),
                persistence: mapping.persistence,
                widget: mapping.widget.component,
                ts_type: mapping.ts_type,
                default_value: mapping.default_value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["option-1".to_string(), "option-2".to_string(), "option-3".to_string()]
    }

    fn mapping(raw: &str) -> FieldMapping {
        map_field(&FieldSpec::parse("field", raw), "Field", &defaults())
    }

    #[test]
    fn test_component_lists_cover_every_mapping() {
        for ty in FieldType::ALL {
            let m = mapping(ty.tag());
            assert!(WIDGET_COMPONENTS.contains(&m.widget.component), "{}", m.widget.component);
            for component in m.display.components() {
                assert!(DISPLAY_COMPONENTS.contains(component), "{}", component);
            }
        }
        assert!(WIDGET_COMPONENTS.contains(&mapping("GEOPOINT").widget.component));
    }

    #[test]
    fn test_string_mapping() {
        let m = mapping("STRING");
        assert_eq!(m.persistence, "{ type: String, trim: true }");
        assert_eq!(m.widget.component, "TextInput");
        assert_eq!(m.ts_type, "string");
        assert_eq!(m.default_value, "\"\"");
        assert_eq!(m.widget.render_props(), " placeholder=\"Enter field\"");
    }

    #[test]
    fn test_select_with_options() {
        let m = mapping("select#draft,published");
        assert_eq!(m.persistence, "{ type: String, enum: [\"draft\", \"published\"] }");
        assert_eq!(m.ts_type, "\"draft\" | \"published\"");
        assert_eq!(m.default_value, "\"draft\"");
        assert_eq!(m.widget.render_props(), " options={[\"draft\", \"published\"]}");
    }

    #[test]
    fn test_select_without_options_uses_defaults() {
        let m = mapping("SELECT");
        assert!(m.persistence.contains("\"option-1\", \"option-2\", \"option-3\""));
        assert_eq!(m.default_value, "\"option-1\"");
    }

    #[test]
    fn test_sequence_types_always_map_to_arrays() {
        for tag in ["IMAGES", "FILES", "TAGS", "MULTISELECT", "MULTICHECKBOX"] {
            let m = mapping(tag);
            assert!(m.persistence.contains("type: [String]"), "{}: {}", tag, m.persistence);
            assert!(m.persistence.contains("default: []"), "{}", tag);
            assert_eq!(m.default_value, "[]", "{}", tag);
            assert!(m.ts_type.ends_with("[]") || m.ts_type.starts_with("Array<"), "{}", tag);
        }
    }

    #[test]
    fn test_multi_select_without_options() {
        let field = FieldSpec::parse("field", "MULTICHECKBOX");
        let m = map_field(&field, "Field", &[]);
        assert_eq!(m.persistence, "{ type: [String], enum: [], default: [] }");
        assert_eq!(m.ts_type, "Array<string>");
    }

    #[test]
    fn test_unsupported_degrades() {
        let m = mapping("GEOPOINT");
        assert_eq!(m.persistence, "{ type: String }");
        assert_eq!(m.widget.component, "TextInput");
        assert!(m.widget.disabled);
        assert_eq!(m.unsupported.as_deref(), Some("Unsupported field type: GEOPOINT"));
        assert!(m.widget.render_props().contains("disabled"));
        assert!(m.widget.render_props().contains("hint=\"Unsupported field type: GEOPOINT\""));
    }

    #[test]
    fn test_case_insensitive_tags() {
        assert_eq!(mapping("email"), mapping("EMAIL"));
        assert_eq!(mapping("Bool").ts_type, "boolean");
    }

    #[test]
    fn test_jsx_attr_escaping() {
        assert_eq!(jsx_attr("label", &PropValue::Text("Title".into())), "label=\"Title\"");
        assert_eq!(jsx_attr("label", &PropValue::Text("Say \"hi\"".into())), r#"label={"Say \"hi\""}"#);
        assert_eq!(jsx_attr("multiple", &PropValue::Flag), "multiple");
        assert_eq!(jsx_text("A {b}"), r#"{"A {b}"}"#);
        assert_eq!(jsx_text("Title"), "Title");
    }

    #[test]
    fn test_display_render() {
        assert_eq!(DisplayKind::Boolean.render("row.active", "Active"), "{row.active ? \"Yes\" : \"No\"}");
        assert_eq!(DisplayKind::Date.render("row.day", "Day"), "{formatDate(row.day)}");
        assert_eq!(DisplayKind::Date.helpers(), &["formatDate"]);
        assert_eq!(DisplayKind::Images.components(), &["ImageStrip"]);
    }

    #[test]
    fn test_mapping_table_covers_all_types() {
        let table = mapping_table(&defaults());
        assert_eq!(table.len(), FieldType::ALL.len());
        assert!(table.iter().all(|row| !row.persistence.is_empty()));
    }
}
