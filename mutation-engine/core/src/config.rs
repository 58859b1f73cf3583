use crate::{CoreError, CoreResult, ModelTypeOptions, MutationKind, MutationOptions};
use serde::Deserialize;

fn default_true() -> bool {
    true
}

/// Engine configuration: the exposed model types and the generated mutations.
///
/// ```toml
/// autoCamelcase = true
///
/// [[types]]
/// model = "Cat"
/// globalId = true
///
/// [[mutations]]
/// model = "Cat"
/// kind = "delete"
/// permissions = ["cats.delete_cat"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_true")]
    pub auto_camelcase: bool,
    #[serde(default)]
    pub types: Vec<ModelTypeOptions>,
    #[serde(default)]
    pub mutations: Vec<MutationOptions>,
    /// Generate create, update, patch and delete mutations for every registered type.
    #[serde(default)]
    pub generate_all: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            auto_camelcase: true,
            types: Vec::new(),
            mutations: Vec::new(),
            generate_all: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|err| CoreError::configuration(format!("Invalid JSON configuration: {err}")))
    }

    pub fn from_toml(toml: &str) -> CoreResult<Self> {
        toml::from_str(toml).map_err(|err| CoreError::configuration(format!("Invalid TOML configuration: {err}")))
    }

    /// The configured mutations, followed by the generated ones that are not configured
    /// explicitly for the same model and kind.
    pub fn mutation_options(&self) -> Vec<MutationOptions> {
        let mut mutations = self.mutations.clone();

        if self.generate_all {
            let kinds = [
                MutationKind::Create,
                MutationKind::Update,
                MutationKind::Patch,
                MutationKind::Delete,
            ];

            for typ in &self.types {
                for kind in kinds {
                    let configured = self.mutations.iter().any(|m| m.model == typ.model && m.kind == kind);

                    if !configured {
                        mutations.push(MutationOptions::new(typ.model.clone(), kind));
                    }
                }
            }
        }

        mutations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn loading_toml() {
        let config = EngineConfig::from_toml(indoc! {r#"
            generateAll = true

            [[types]]
            model = "Cat"
            globalId = true

            [[mutations]]
            model = "Cat"
            kind = "delete"
            permissions = ["cats.delete_cat"]

            [[mutations]]
            model = "Cat"
            kind = "filterDelete"
            filterFields = ["name__contains", "owner__username"]
        "#})
        .unwrap();

        assert!(config.auto_camelcase);
        assert!(config.types[0].global_id);

        let kinds: Vec<MutationKind> = config.mutation_options().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MutationKind::Delete,
                MutationKind::FilterDelete,
                MutationKind::Create,
                MutationKind::Update,
                MutationKind::Patch,
            ]
        );
        assert!(config.mutations[0].login_required());
    }

    #[test]
    fn invalid_documents_are_configuration_errors() {
        let err = EngineConfig::from_json(r#"{ "mutations": [{ "model": "Cat", "kind": "upsert" }] }"#).unwrap_err();

        assert!(matches!(err, CoreError::ConfigurationError(msg) if msg.starts_with("Invalid JSON configuration")));
    }
}
