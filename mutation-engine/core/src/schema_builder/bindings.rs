use crate::RelationOperation;
use cud_connector::Lookup;
use cud_models::{Model, ModelRef, RelationField};
use indexmap::IndexMap;

/// Ties the fields of a generated input object to the model they write.
#[derive(Debug, Clone)]
pub struct InputBinding {
    pub model: ModelRef,
    /// Keyed by the source name of the input field.
    pub fields: IndexMap<String, FieldBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldBinding {
    Scalar {
        field: String,
    },
    /// Forward foreign key or one-to-one. Takes an id, or a nested create input.
    ForeignKey {
        field: String,
        nested: Option<String>,
    },
    /// An operation on a to-many relation: many-to-many in either direction or the
    /// reverse side of a foreign key.
    Relation {
        field: String,
        operation: RelationOperation,
        nested: Option<String>,
    },
    /// Reverse side of a one-to-one.
    ReverseOneToOne {
        field: String,
        nested: Option<String>,
    },
    /// The `id` of an item of a batch update.
    ItemId,
}

impl FieldBinding {
    pub fn model_field(&self) -> Option<&str> {
        match self {
            FieldBinding::Scalar { field }
            | FieldBinding::ForeignKey { field, .. }
            | FieldBinding::Relation { field, .. }
            | FieldBinding::ReverseOneToOne { field, .. } => Some(field),
            FieldBinding::ItemId => None,
        }
    }

    /// Name of the input type nested records are created from.
    pub fn nested_type(&self) -> Option<&str> {
        match self {
            FieldBinding::ForeignKey { nested, .. }
            | FieldBinding::Relation { nested, .. }
            | FieldBinding::ReverseOneToOne { nested, .. } => nested.as_deref(),
            FieldBinding::Scalar { .. } | FieldBinding::ItemId => None,
        }
    }

    pub fn relation_field<'m>(&self, model: &'m Model) -> Option<&'m RelationField> {
        match self {
            FieldBinding::Scalar { .. } | FieldBinding::ItemId => None,
            _ => self.model_field().and_then(|name| model.find_relation_field(name).ok()),
        }
    }
}

/// Ties the fields of a generated filter input to filter paths.
#[derive(Debug, Clone)]
pub struct FilterBinding {
    pub model: ModelRef,
    /// Keyed by the filter path as configured, e.g. `owner__name__icontains`.
    pub fields: IndexMap<String, FilterFieldBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterFieldBinding {
    /// Relation fields leading from the filtered model to the model owning `field`.
    pub relations: Vec<String>,
    /// The compared field, scalar or relation.
    pub field: String,
    /// Model owning `field`.
    pub model: String,
    pub lookup: Lookup,
}
