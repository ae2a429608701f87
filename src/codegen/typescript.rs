//! TypeScript entity types generator
//!
//! Emits the input interface, the stored entity interface (with `_id` and
//! timestamps), the paginated list shape, option constants for enumerated
//! fields and a defaults object used to seed forms.

use std::collections::HashSet;
use std::path::PathBuf;

use super::{render_members, render_object, ArtifactKind, Bindings, GenerationContext, Generator, MemberStyle};
use crate::names::{js_string_array, to_pascal_case, NameForms};

pub struct TypesGenerator;

impl Generator for TypesGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Types
    }

    fn template(&self) -> &'static str {
        "types.ts.tmpl"
    }

    fn subpath(&self, names: &NameForms) -> PathBuf {
        PathBuf::from("types").join(format!("{}.ts", names.singular_ident))
    }

    fn bindings(&self, ctx: &GenerationContext<'_>) -> Bindings {
        let members = render_members(ctx.schema(), MemberStyle::Interface, &|field, _| ctx.mapping(field).ts_type);
        let defaults = render_object(ctx.schema(), &|field, _| ctx.mapping(field).default_value);

        let mut bindings = Bindings::new();
        bindings
            .set("members", members)
            .set("defaults", defaults)
            .set("option_constants", option_constants(ctx));
        bindings
    }
}

/// `export const postStatusOptions = [...] as const;` per enumerated leaf.
///
/// Paths that collapse to the same name (`a_b`, `aB`) get a numeric suffix.
fn option_constants(ctx: &GenerationContext<'_>) -> String {
    let mut used: HashSet<String> = HashSet::new();
    let mut constants = Vec::new();

    for leaf in ctx.leaves().iter().filter(|leaf| leaf.field.field_type.is_enumerated()) {
        let base = format!("{}{}Options", ctx.names.singular_var, to_pascal_case(&leaf.path.join(" ")));
        let mut name = base.clone();
        let mut n = 2;
        while !used.insert(name.clone()) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        let options = leaf.field.effective_options(&ctx.options.default_options);
        constants.push(format!("export const {} = {} as const;", name, js_string_array(&options)));
    }

    if constants.is_empty() {
        String::new()
    } else {
        // Leading blank line separates the block from the interfaces above
        format!("\n{}", constants.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::{generate_from_json, ArtifactKind};

    fn input(schema: &str) -> String {
        format!(
            r#"{{
                "schema": {},
                "namingConvention": {{
                    "pluralDisplay": "Users",
                    "pluralSlug": "users",
                    "singularDisplay": "User",
                    "singularSlug": "user"
                }}
            }}"#,
            schema
        )
    }

    #[test]
    fn test_interface_members() {
        let out = generate_from_json(
            ArtifactKind::Types,
            &input(r#"{ "name": "STRING", "age": "NUMBER", "roles": "MULTISELECT#admin,editor", "address": { "zip-code": "STRING" } }"#),
        )
        .unwrap();
        assert!(out.contains("export interface UserInput {\n  name: string;\n  age: number;\n"));
        assert!(out.contains("  roles: Array<\"admin\" | \"editor\">;\n"));
        assert!(out.contains("  address: {\n    \"zip-code\": string;\n  };\n}"));
        assert!(out.contains("export interface PaginatedUsers {"));
    }

    #[test]
    fn test_defaults_and_option_constants() {
        let out = generate_from_json(
            ArtifactKind::Types,
            &input(r#"{ "active": "BOOLEAN", "plan": "RADIO", "tags": "TAGS" }"#),
        )
        .unwrap();
        assert!(out.contains("export const userDefaults: UserInput = {\n  active: false,\n  plan: \"option-1\",\n  tags: [],\n};"));
        assert!(out.contains("}\n\nexport const userPlanOptions = [\"option-1\", \"option-2\", \"option-3\"] as const;\n\n"));
    }

    #[test]
    fn test_no_option_constants_leaves_single_blank_line() {
        let out = generate_from_json(ArtifactKind::Types, &input(r#"{ "name": "STRING" }"#)).unwrap();
        assert!(out.contains("  limit: number;\n}\n\nexport const userDefaults"));
    }

    #[test]
    fn test_colliding_option_constant_names() {
        let out = generate_from_json(ArtifactKind::Types, &input(r#"{ "a_b": "SELECT#x", "aB": "RADIO#y" }"#)).unwrap();
        assert!(out.contains("export const userABOptions = [\"x\"] as const;\nexport const userABOptions2 = [\"y\"] as const;"));
    }
}
