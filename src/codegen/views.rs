//! List and detail view generators

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::types::{jsx_text, DisplayKind};
use super::{import_line, ArtifactKind, Bindings, GenerationContext, Generator};
use crate::input::{FieldType, Leaf};
use crate::names::{humanize, js_access, NameForms};

/// A leaf together with its label and display renderer
struct Column<'a> {
    leaf: Leaf<'a>,
    label: String,
    display: DisplayKind,
}

fn columns<'a>(ctx: &GenerationContext<'a>) -> Vec<Column<'a>> {
    ctx.leaves()
        .into_iter()
        .map(|leaf| Column {
            label: humanize(&leaf.dotted()),
            display: ctx.mapping(leaf.field).display,
            leaf,
        })
        .collect()
}

/// Bind the widget and format imports the displays of `columns` need
fn bind_display_imports(ctx: &GenerationContext<'_>, columns: &[Column<'_>], bindings: &mut Bindings) {
    let components: BTreeSet<&str> = columns
        .iter()
        .flat_map(|c| c.display.components().iter().copied())
        .collect();
    let helpers: BTreeSet<&str> = columns
        .iter()
        .flat_map(|c| c.display.helpers().iter().copied())
        .collect();

    bindings
        .set("display_imports", import_line(&components, &ctx.options.widgets_import))
        .set("format_imports", import_line(&helpers, &ctx.options.format_import));
}

// =============================================================================
// List View
// =============================================================================

pub struct ListViewGenerator;

impl Generator for ListViewGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ListView
    }

    fn template(&self) -> &'static str {
        "list.tsx.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        PathBuf::from("components").join(format!("{}List.tsx", names.plural_ident))
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        // Secrets never show up in tables
        let columns: Vec<Column<'_>> = columns(ctx)
            .into_iter()
            .filter(|c| c.leaf.field.field_type != FieldType::Password)
            .collect();

        let header_cells: Vec<String> = columns
            .iter()
            .map(|c| format!("<th>{}</th>", jsx_text(&c.label)))
            .collect();
        let body_cells: Vec<String> = columns
            .iter()
            .map(|c| format!("<td>{}</td>", c.display.render(&js_access("row", &c.leaf.path), &c.label)))
            .collect();

        let mut bindings = Bindings::new();
        bind_display_imports(ctx, &columns, &mut bindings);
        bindings
            .set("header_cells", header_cells.join("\n"))
            .set("body_cells", body_cells.join("\n"))
            .set("empty_message", jsx_text(&format!("No {} yet.", ctx.names.plural.to_lowercase())));
        bindings
    }
}

// =============================================================================
// Detail View
// =============================================================================

pub struct DetailViewGenerator;

impl Generator for DetailViewGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::DetailView
    }

    fn template(&self) -> &'static str {
        "detail.tsx.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        PathBuf::from("components").join(format!("{}Detail.tsx", names.singular_ident))
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        let columns = columns(ctx);
        let rows: Vec<String> = columns
            .iter()
            .map(|c| {
                format!(
                    "<dt>{}</dt>\n<dd>{}</dd>",
                    jsx_text(&c.label),
                    c.display.render(&js_access("item", &c.leaf.path), &c.label)
                )
            })
            .collect();

        let mut bindings = Bindings::new();
        bind_display_imports(ctx, &columns, &mut bindings);
        bindings.set("rows", rows.join("\n"));
        bindings
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::{generate_from_json, ArtifactKind};

    const INPUT: &str = r#"{
        "schema": {
            "name": "STRING",
            "password": "PASSWORD",
            "joined": "DATE",
            "avatar": "IMAGE",
            "address": { "zip-code": "STRING" }
        },
        "namingConvention": {
            "pluralDisplay": "Team Members",
            "pluralSlug": "team-members",
            "singularDisplay": "Team Member",
            "singularSlug": "team-member"
        }
    }"#;

    #[test]
    fn test_list_columns() {
        let out = generate_from_json(ArtifactKind::ListView, INPUT).unwrap();
        assert!(out.contains("export function TeamMembersList("));
        assert!(out.contains("          <th>Name</th>\n          <th>Joined</th>\n          <th>Avatar</th>\n          <th>Address Zip Code</th>\n"));
        assert!(out.contains("<td>{formatDate(row.joined)}</td>"));
        assert!(out.contains("<td>{row.address?.[\"zip-code\"] ?? \"-\"}</td>"));
        assert!(!out.contains("row.password"));
        assert!(out.contains("No team members yet."));
    }

    #[test]
    fn test_list_imports() {
        let out = generate_from_json(ArtifactKind::ListView, INPUT).unwrap();
        assert!(out.contains("import { Thumbnail } from \"@/components/fields\";"));
        assert!(out.contains("import { formatDate } from \"@/lib/format\";"));
    }

    #[test]
    fn test_detail_rows() {
        let out = generate_from_json(ArtifactKind::DetailView, INPUT).unwrap();
        assert!(out.contains("      <dt>Password</dt>\n      <dd>********</dd>"));
        assert!(out.contains("<dd><Thumbnail src={item.avatar} alt=\"Avatar\" /></dd>"));
    }

    #[test]
    fn test_no_format_import_without_dates() {
        let input = INPUT.replace("\"joined\": \"DATE\",", "");
        let out = generate_from_json(ArtifactKind::DetailView, &input).unwrap();
        assert!(!out.contains("@/lib/format"));
        assert!(out.starts_with("// Generated by dashboard-scaffold"));
        assert!(out.contains("import { Thumbnail } from \"@/components/fields\";\nimport type { TeamMember }"));
    }

    #[test]
    fn test_link_entity_does_not_shadow_next_link() {
        let input = INPUT
            .replace("Team Members", "Links")
            .replace("team-members", "links")
            .replace("Team Member", "Link")
            .replace("team-member", "link");
        let out = generate_from_json(ArtifactKind::ListView, &input).unwrap();
        assert!(out.contains("import NextLink from \"next/link\";"));
        assert!(out.contains("import type { Link } from \"@/types/Link\";"));
        assert!(!out.contains("<Link "));

        for kind in [ArtifactKind::IndexPage, ArtifactKind::ShowPage] {
            let page = generate_from_json(kind, &input).unwrap();
            assert!(!page.contains("import Link "), "{}", kind);
        }
    }
}
