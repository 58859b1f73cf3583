use crate::{CoreError, CoreResult};
use cud_models::{InternalDataModelRef, ModelRef};
use indexmap::IndexMap;
use serde::Deserialize;

/// Registration of the GraphQL object type exposing a model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTypeOptions {
    pub model: String,
    /// Type name, the model name by default.
    #[serde(default)]
    pub name: Option<String>,
    /// The type implements `Node` and exposes a global `id`.
    #[serde(default)]
    pub global_id: bool,
    #[serde(default)]
    pub only_fields: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_fields: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelTypeOptions {
    pub fn new(model: impl Into<String>) -> Self {
        ModelTypeOptions {
            model: model.into(),
            name: None,
            global_id: false,
            only_fields: None,
            exclude_fields: Vec::new(),
            description: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_global_id(mut self) -> Self {
        self.global_id = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ModelType {
    pub name: String,
    pub model: ModelRef,
    pub global_id: bool,
    pub only_fields: Option<Vec<String>>,
    pub exclude_fields: Vec<String>,
    pub description: Option<String>,
}

impl ModelType {
    /// Whether the object type exposes a model field.
    pub fn exposes(&self, field: &str) -> bool {
        let listed = self
            .only_fields
            .as_ref()
            .map(|only| only.iter().any(|f| f == field))
            .unwrap_or(true);

        listed && !self.exclude_fields.iter().any(|f| f == field)
    }
}

/// The object types registered for models, at most one per model.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    internal_data_model: InternalDataModelRef,
    types: IndexMap<String, ModelType>,
}

impl TypeRegistry {
    pub fn new(internal_data_model: InternalDataModelRef) -> Self {
        TypeRegistry {
            internal_data_model,
            types: IndexMap::new(),
        }
    }

    pub fn register(&mut self, options: ModelTypeOptions) -> CoreResult<()> {
        let model = self.internal_data_model.find_model(&options.model)?;
        let name = options.name.unwrap_or_else(|| model.name.clone());

        if self.types.contains_key(&model.name) {
            return Err(CoreError::configuration(format!(
                "A type is already registered for model {}.",
                model.name
            )));
        }

        if self.get_type(&name).is_some() {
            return Err(CoreError::configuration(format!("The type name {name} is already in use.")));
        }

        for field in options.only_fields.iter().flatten().chain(&options.exclude_fields) {
            model.field(field)?;
        }

        tracing::debug!(model = %model.name, r#type = %name, global_id = options.global_id, "registered model type");

        self.types.insert(
            model.name.clone(),
            ModelType {
                name,
                model,
                global_id: options.global_id,
                only_fields: options.only_fields,
                exclude_fields: options.exclude_fields,
                description: options.description,
            },
        );

        Ok(())
    }

    pub fn get_type_for_model(&self, model: &str) -> Option<&ModelType> {
        self.types.get(model)
    }

    pub fn get_type(&self, name: &str) -> Option<&ModelType> {
        self.types.values().find(|t| t.name == name)
    }

    pub fn types(&self) -> impl Iterator<Item = &ModelType> {
        self.types.values()
    }

    pub fn uses_global_ids(&self) -> bool {
        self.types.values().any(|t| t.global_id)
    }

    pub fn internal_data_model(&self) -> &InternalDataModelRef {
        &self.internal_data_model
    }
}
