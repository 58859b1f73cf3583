use super::FieldBuilder;
use crate::{DomainError, Field, Model, ModelRef};
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct ModelBuilder {
    pub name: String,
    pub fields: Vec<FieldBuilder>,
}

impl ModelBuilder {
    pub fn build(self) -> crate::Result<ModelRef> {
        let name = self.name;
        let fields: Vec<Field> = self
            .fields
            .into_iter()
            .map(|field| field.build(&name))
            .collect::<crate::Result<_>>()?;

        let primary_key = fields
            .iter()
            .filter_map(Field::as_scalar)
            .find(|sf| sf.is_id)
            .cloned()
            .ok_or_else(|| DomainError::InvalidDatamodel(format!("Model `{name}` has no primary key.")))?;

        Ok(Arc::new(Model {
            name,
            fields,
            primary_key,
        }))
    }
}
