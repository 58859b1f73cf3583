use crate::{DomainError, ModelRef, RelationField};
use std::sync::Arc;

pub type InternalDataModelRef = Arc<InternalDataModel>;

#[derive(Debug, Default)]
pub struct InternalDataModel {
    pub(crate) models: Vec<ModelRef>,
}

impl InternalDataModel {
    pub fn models(&self) -> &[ModelRef] {
        &self.models
    }

    pub fn find_model(&self, name: &str) -> crate::Result<ModelRef> {
        self.models
            .iter()
            .find(|model| model.name == name)
            .cloned()
            .ok_or_else(|| DomainError::ModelNotFound { name: name.to_owned() })
    }

    pub fn related_model(&self, field: &RelationField) -> crate::Result<ModelRef> {
        self.find_model(&field.related_model)
    }

    /// The relation field on the other side of `field`, if that side is exposed.
    pub fn opposite_field(&self, field: &RelationField) -> crate::Result<Option<RelationField>> {
        let related = self.related_model(field)?;

        match &field.related_field {
            Some(name) => Ok(Some(related.find_relation_field(name)?.clone())),
            None => Ok(None),
        }
    }

    /// Every foreign key or one-to-one field that stores ids of `model_name`.
    pub fn fields_referencing(&self, model_name: &str) -> Vec<RelationField> {
        self.models
            .iter()
            .flat_map(|model| model.relation_fields())
            .filter(|rf| rf.is_inlined() && rf.related_model == model_name)
            .cloned()
            .collect()
    }

    /// Panics when the model does not exist. Meant for tests.
    pub fn assert_model(&self, name: &str) -> ModelRef {
        match self.find_model(name) {
            Ok(model) => model,
            Err(err) => panic!("{err}"),
        }
    }
}
