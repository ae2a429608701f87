//! React Query data hooks generator

use std::path::PathBuf;

use super::{ArtifactKind, Bindings, GenerationContext, Generator};
use crate::names::NameForms;

pub struct HooksGenerator;

impl Generator for HooksGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Hooks
    }

    fn template(&self) -> &'static str {
        "hooks.ts.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        PathBuf::from("hooks").join(format!("use{}.ts", names.plural_ident))
    }

    fn bindings(&self, _ctx: &GenerationContext<'_>) -> Bindings {
        Bindings::new()
    }
}
