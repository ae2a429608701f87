//! Form component generator
//!
//! Every schema leaf becomes one `Controller` block wrapped in a
//! `data-field="<dotted path>"` element; groups become fieldsets.

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::types::{jsx_attr, jsx_text, FieldMapping, PropValue};
use super::{import_line, ArtifactKind, Bindings, GenerationContext, Generator};
use crate::input::{Schema, SchemaNode};
use crate::names::{humanize, NameForms};

pub struct FormGenerator;

impl Generator for FormGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Form
    }

    fn template(&self) -> &'static str {
        "form.tsx.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        PathBuf::from("components").join(format!("{}Form.tsx", names.singular_ident))
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        let mut components = BTreeSet::new();
        let blocks = render_fields(ctx, ctx.schema(), &mut Vec::new(), &mut components);

        let mut bindings = Bindings::new();
        bindings
            .set("widget_imports", import_line(&components, &ctx.options.widgets_import))
            .set("fields", blocks.join("\n"));
        bindings
    }
}

fn render_fields(
    ctx: &GenerationContext<'_>,
    schema: &Schema,
    path: &mut Vec<String>,
    components: &mut BTreeSet<&'static str>,
) -> Vec<String> {
    let mut blocks = Vec::new();

    for entry in schema.entries() {
        path.push(entry.key.clone());
        let label = humanize(&entry.key);

        match &entry.node {
            SchemaNode::Field(field) => {
                let mapping = ctx.mapping(field);
                components.insert(mapping.widget.component);
                blocks.push(field_block(&path.join("."), &label, &mapping));
            }
            SchemaNode::Group(group) => {
                let children = render_fields(ctx, group, path, components);
                let mut lines = vec![
                    format!("<fieldset {}>", jsx_attr("data-group", &PropValue::Text(path.join(".")))),
                    format!("  <legend>{}</legend>", jsx_text(&label)),
                ];
                lines.extend(children.iter().flat_map(|c| c.lines()).map(|l| format!("  {}", l)));
                lines.push("</fieldset>".to_string());
                blocks.push(lines.join("\n"));
            }
        }

        path.pop();
    }

    blocks
}

fn field_block(dotted: &str, label: &str, mapping: &FieldMapping) -> String {
    let name = PropValue::Text(dotted.to_string());
    let widget = format!(
        "<{} {}{} {{...field}} />",
        mapping.widget.component,
        jsx_attr("label", &PropValue::Text(label.to_string())),
        mapping.widget.render_props()
    );

    [
        format!("<div {}>", jsx_attr("data-field", &name)),
        "  <Controller".to_string(),
        format!("    {}", jsx_attr("name", &name)),
        "    control={control}".to_string(),
        format!("    render={{({{ field }}) => {}}}", widget),
        "  />".to_string(),
        "</div>".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use crate::codegen::{generate_from_json, ArtifactKind};

    const INPUT: &str = r#"{
        "schema": {
            "title": "STRING",
            "status": "SELECT#draft,published",
            "location": "GEOPOINT",
            "period": { "start": "DATE", "end": "DATE" }
        },
        "namingConvention": {
            "pluralDisplay": "Events",
            "pluralSlug": "events",
            "singularDisplay": "Event",
            "singularSlug": "event"
        }
    }"#;

    #[test]
    fn test_one_block_per_leaf() {
        let out = generate_from_json(ArtifactKind::Form, INPUT).unwrap();
        for path in ["title", "status", "location", "period.start", "period.end"] {
            let marker = format!("data-field=\"{}\"", path);
            assert_eq!(out.matches(&marker).count(), 1, "{}", path);
        }
        assert_eq!(out.matches("data-field=").count(), 5);
    }

    #[test]
    fn test_field_block_shape() {
        let out = generate_from_json(ArtifactKind::Form, INPUT).unwrap();
        let expected = [
            "      <div data-field=\"title\">",
            "        <Controller",
            "          name=\"title\"",
            "          control={control}",
            "          render={({ field }) => <TextInput label=\"Title\" placeholder=\"Enter title\" {...field} />}",
            "        />",
            "      </div>",
        ]
        .join("\n");
        assert!(out.contains(&expected), "{}", out);
    }

    #[test]
    fn test_groups_become_fieldsets() {
        let out = generate_from_json(ArtifactKind::Form, INPUT).unwrap();
        assert!(out.contains("<fieldset data-group=\"period\">\n        <legend>Period</legend>\n        <div data-field=\"period.start\">"));
    }

    #[test]
    fn test_imports_only_used_widgets() {
        let out = generate_from_json(ArtifactKind::Form, INPUT).unwrap();
        assert!(out.contains("import { DatePicker, Select, TextInput } from \"@/components/fields\";"));
    }

    #[test]
    fn test_unsupported_field_is_disabled() {
        let out = generate_from_json(ArtifactKind::Form, INPUT).unwrap();
        assert!(out.contains("<TextInput label=\"Location\" disabled hint=\"Unsupported field type: GEOPOINT\" {...field} />"));
    }
}
