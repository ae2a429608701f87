//! REST route handler generators
//!
//! - collection route: paginated list with text search, create
//! - item route: fetch, update, delete by id
//!
//! Both map duplicate-key errors (code 11000) and validation errors to 400,
//! invalid ids to 400 and missing documents to 404.

use std::path::PathBuf;

use super::{ArtifactKind, Bindings, GenerationContext, Generator};
use crate::names::{js_string, js_string_array, NameForms};

fn api_dir(names: &NameForms) -> PathBuf {
    PathBuf::from("app").join("api").join(&names.plural_slug)
}

pub struct CollectionRouteGenerator;

impl Generator for CollectionRouteGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::CollectionRoute
    }

    fn template(&self) -> &'static str {
        "collection-route.ts.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        api_dir(names).join("route.ts")
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        let search_fields: Vec<String> = ctx
            .leaves()
            .iter()
            .filter(|leaf| leaf.field.field_type.is_searchable())
            .map(|leaf| leaf.dotted())
            .collect();

        let mut bindings = Bindings::new();
        bindings.set("search_fields", js_string_array(&search_fields));
        bindings
    }
}

pub struct ItemRouteGenerator;

impl Generator for ItemRouteGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ItemRoute
    }

    fn template(&self) -> &'static str {
        "item-route.ts.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        api_dir(names).join("[id]").join("route.ts")
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        let mut bindings = Bindings::new();
        bindings.set("not_found", js_string(&format!("{} not found", ctx.names.singular)));
        bindings
    }
}
