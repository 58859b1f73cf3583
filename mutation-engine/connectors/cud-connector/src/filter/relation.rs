use super::Filter;

/// Matches records with at least one related record (through `field`) matching `nested`.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct RelationFilter {
    pub field: String,
    pub nested: Box<Filter>,
}

impl RelationFilter {
    pub fn new(field: impl Into<String>, nested: Filter) -> Self {
        RelationFilter {
            field: field.into(),
            nested: Box::new(nested),
        }
    }
}
