//! Filtering types to select records from a connector.
//!
//! Field names are model field names. Foreign keys compare against the stored id of the
//! relation field, relation filters match when any related record matches the nested filter.

mod relation;
mod scalar;

pub use relation::*;
pub use scalar::*;

use cud_value::CudValue;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Vec<Filter>),
    Scalar(ScalarFilter),
    Relation(RelationFilter),
    BoolFilter(bool),
}

impl Filter {
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    pub fn not(filters: Vec<Filter>) -> Self {
        Filter::Not(filters)
    }

    pub fn empty() -> Self {
        Filter::BoolFilter(true)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Filter::BoolFilter(true) => true,
            Filter::And(filters) => filters.iter().all(Filter::is_empty),
            _ => false,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<CudValue>) -> Self {
        Filter::Scalar(ScalarFilter {
            field: field.into(),
            condition: ScalarCondition::Equals(value.into()),
        })
    }

    pub fn is_in(field: impl Into<String>, values: Vec<CudValue>) -> Self {
        Filter::Scalar(ScalarFilter {
            field: field.into(),
            condition: ScalarCondition::In(values),
        })
    }

    /// Combines two filters, dropping empty ones.
    pub fn merge(self, other: Filter) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other,
            (_, true) => self,
            _ => Filter::And(vec![self, other]),
        }
    }
}

impl From<ScalarFilter> for Filter {
    fn from(sf: ScalarFilter) -> Self {
        Filter::Scalar(sf)
    }
}

impl From<RelationFilter> for Filter {
    fn from(rf: RelationFilter) -> Self {
        Filter::Relation(rf)
    }
}

impl From<bool> for Filter {
    fn from(b: bool) -> Self {
        Filter::BoolFilter(b)
    }
}
