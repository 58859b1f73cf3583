mod relation;
mod scalar;

pub use relation::*;
pub use scalar::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(ScalarField),
    Relation(RelationField),
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Scalar(sf) => &sf.name,
            Field::Relation(rf) => &rf.name,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Field::Scalar(_))
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Field::Relation(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarField> {
        match self {
            Field::Scalar(sf) => Some(sf),
            Field::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationField> {
        match self {
            Field::Relation(rf) => Some(rf),
            Field::Scalar(_) => None,
        }
    }

    pub fn is_editable(&self) -> bool {
        match self {
            Field::Scalar(sf) => sf.is_editable,
            Field::Relation(rf) => rf.is_editable,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Field::Scalar(sf) => sf.description.as_deref(),
            Field::Relation(rf) => rf.description.as_deref(),
        }
    }
}

impl From<ScalarField> for Field {
    fn from(sf: ScalarField) -> Self {
        Field::Scalar(sf)
    }
}

impl From<RelationField> for Field {
    fn from(rf: RelationField) -> Self {
        Field::Relation(rf)
    }
}
