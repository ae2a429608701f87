//! Zustand store generator

use std::path::PathBuf;

use super::{ArtifactKind, Bindings, GenerationContext, Generator};
use crate::names::NameForms;

pub struct StoreGenerator;

impl Generator for StoreGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Store
    }

    fn template(&self) -> &'static str {
        "store.ts.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        PathBuf::from("store").join(format!("{}Store.ts", names.singular_var))
    }

    fn bindings(&self, _ctx: &GenerationContext<'_>) -> Bindings {
        Bindings::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::{generate_from_json, ArtifactKind};

    #[test]
    fn test_store() {
        let input = r#"{
            "schema": { "name": "STRING" },
            "namingConvention": {
                "pluralDisplay": "Line Items",
                "pluralSlug": "line-items",
                "singularDisplay": "Line Item",
                "singularSlug": "line-item"
            }
        }"#;
        let out = generate_from_json(ArtifactKind::Store, input).unwrap();
        assert!(out.contains("export const useLineItemStore = create<LineItemState>()((set) => ({"));
        assert!(out.contains("draft: Partial<LineItemInput> | null;"));
    }
}
