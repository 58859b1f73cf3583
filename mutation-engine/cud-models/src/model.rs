use crate::{DomainError, Field, RelationField, ScalarField};
use std::sync::Arc;

pub type ModelRef = Arc<Model>;

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) primary_key: ScalarField,
}

impl Model {
    /// Fields in declaration order, reverse relations last.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn primary_key(&self) -> &ScalarField {
        &self.primary_key
    }

    pub fn scalar_fields(&self) -> impl Iterator<Item = &ScalarField> + '_ {
        self.fields.iter().filter_map(Field::as_scalar)
    }

    pub fn relation_fields(&self) -> impl Iterator<Item = &RelationField> + '_ {
        self.fields.iter().filter_map(Field::as_relation)
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field(&self, name: &str) -> crate::Result<&Field> {
        self.find_field(name).ok_or_else(|| DomainError::FieldNotFound {
            name: name.to_owned(),
            model: self.name.clone(),
        })
    }

    pub fn find_scalar_field(&self, name: &str) -> crate::Result<&ScalarField> {
        self.field(name)?
            .as_scalar()
            .ok_or_else(|| DomainError::UnexpectedFieldKind {
                name: name.to_owned(),
                model: self.name.clone(),
                expected: "scalar field",
            })
    }

    pub fn find_relation_field(&self, name: &str) -> crate::Result<&RelationField> {
        self.field(name)?
            .as_relation()
            .ok_or_else(|| DomainError::UnexpectedFieldKind {
                name: name.to_owned(),
                model: self.name.clone(),
                expected: "relation field",
            })
    }

    /// The field exists and stores a value on the record itself.
    pub fn is_stored_field(&self, name: &str) -> bool {
        match self.find_field(name) {
            Some(Field::Scalar(_)) => true,
            Some(Field::Relation(rf)) => rf.is_inlined(),
            None => false,
        }
    }

    /// Panics when the field is missing or not a scalar. Meant for tests.
    pub fn assert_scalar_field(&self, name: &str) -> &ScalarField {
        match self.find_scalar_field(name) {
            Ok(sf) => sf,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panics when the field is missing or not a relation. Meant for tests.
    pub fn assert_relation_field(&self, name: &str) -> &RelationField {
        match self.find_relation_field(name) {
            Ok(rf) => rf,
            Err(err) => panic!("{err}"),
        }
    }
}
