//! Mongoose model generator

use std::path::PathBuf;

use super::{render_object, ArtifactKind, Bindings, GenerationContext, Generator};
use crate::names::{js_string, NameForms};

pub struct ModelGenerator;

impl Generator for ModelGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Model
    }

    fn template(&self) -> &'static str {
        "model.ts.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        PathBuf::from("models").join(format!("{}.ts", names.singular_ident))
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        let definition = render_object(ctx.schema(), &|field, _| ctx.mapping(field).persistence);

        let mut bindings = Bindings::new();
        bindings
            .set("definition", definition)
            .set("collection", js_string(&ctx.names.plural_slug));
        bindings
    }
}
