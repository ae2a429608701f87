//! Page component generators (index, new, show, edit)

use std::path::PathBuf;

use super::types::jsx_text;
use super::{ArtifactKind, Bindings, GenerationContext, Generator};
use crate::names::NameForms;

fn page_dir(names: &NameForms) -> PathBuf {
    PathBuf::from("app").join(&names.plural_slug)
}

fn title(text: String) -> Bindings {
    let mut bindings = Bindings::new();
    bindings.set("title", jsx_text(&text));
    bindings
}

pub struct IndexPageGenerator;

impl Generator for IndexPageGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::IndexPage
    }

    fn template(&self) -> &'static str {
        "index-page.tsx.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        page_dir(names).join("page.tsx")
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        let mut bindings = title(ctx.names.plural.clone());
        bindings.set(
            "new_label",
            jsx_text(&format!("New {}", ctx.names.singular.to_lowercase())),
        );
        bindings
    }
}

pub struct NewPageGenerator;

impl Generator for NewPageGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::NewPage
    }

    fn template(&self) -> &'static str {
        "new-page.tsx.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        page_dir(names).join("new").join("page.tsx")
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        title(format!("New {}", ctx.names.singular))
    }
}

pub struct ShowPageGenerator;

impl Generator for ShowPageGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ShowPage
    }

    fn template(&self) -> &'static str {
        "show-page.tsx.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        page_dir(names).join("[id]").join("page.tsx")
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        title(ctx.names.singular.clone())
    }
}

pub struct EditPageGenerator;

impl Generator for EditPageGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::EditPage
    }

    fn template(&self) -> &'static str {
        "edit-page.tsx.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        page_dir(names).join("[id]").join("edit").join("page.tsx")
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        title(format!("Edit {}", ctx.names.singular))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::codegen::generate_from_json;
    use crate::input::NamingConvention;

    const INPUT: &str = r#"{
        "schema": { "name": "STRING" },
        "namingConvention": {
            "pluralDisplay": "Categories",
            "pluralSlug": "categories",
            "singularDisplay": "Category",
            "singularSlug": "category"
        }
    }"#;

    #[test]
    fn test_page_paths() {
        let names = NameForms::derive(&NamingConvention {
            plural_display: "Categories".to_string(),
            plural_slug: "categories".to_string(),
            singular_display: "Category".to_string(),
            singular_slug: "category".to_string(),
        });
        assert_eq!(IndexPageGenerator.subpath(&names), Path::new("app/categories/page.tsx"));
        assert_eq!(NewPageGenerator.subpath(&names), Path::new("app/categories/new/page.tsx"));
        assert_eq!(ShowPageGenerator.subpath(&names), Path::new("app/categories/[id]/page.tsx"));
        assert_eq!(EditPageGenerator.subpath(&names), Path::new("app/categories/[id]/edit/page.tsx"));
    }

    #[test]
    fn test_index_page() {
        let out = generate_from_json(ArtifactKind::IndexPage, INPUT).unwrap();
        assert!(out.contains("export default function CategoriesIndexPage()"));
        assert!(out.contains("<h1>Categories</h1>"));
        assert!(out.contains("<NextLink href=\"/categories/new\">New category</NextLink>"));
        assert!(out.contains("import { useDeleteCategory, useCategories } from \"@/hooks/useCategories\";"));
    }

    #[test]
    fn test_edit_page() {
        let out = generate_from_json(ArtifactKind::EditPage, INPUT).unwrap();
        assert!(out.contains("<h1>Edit Category</h1>"));
        assert!(out.contains("const update = useUpdateCategory(id);"));
        assert!(out.contains("router.push(`/categories/${id}`);"));
    }

    #[test]
    fn test_display_names_are_escaped_in_jsx() {
        let input = INPUT.replace("\"Category\"", "\"{Weird} Category\"");
        let out = generate_from_json(ArtifactKind::NewPage, &input).unwrap();
        assert!(out.contains(r#"<h1>{"New {Weird} Category"}</h1>"#));
    }
}
