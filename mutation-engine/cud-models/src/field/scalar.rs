use crate::{DefaultValue, TypeIdentifier};
use cud_value::CudValue;

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub name: String,
    /// Name of the model declaring the field.
    pub model: String,
    pub type_identifier: TypeIdentifier,
    pub is_nullable: bool,
    pub is_blank: bool,
    pub default_value: Option<DefaultValue>,
    pub choices: Option<Vec<Choice>>,
    pub is_id: bool,
    pub is_unique: bool,
    pub is_autoincrement: bool,
    pub is_editable: bool,
    pub description: Option<String>,
}

/// One allowed value of a field with choices.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub value: CudValue,
    pub label: String,
}

impl ScalarField {
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().map(|c| !c.is_empty()).unwrap_or(false)
    }

    /// A create has to provide a value for this field.
    pub fn is_required(&self) -> bool {
        !self.is_nullable && !self.is_blank && !self.has_default() && !self.is_autoincrement
    }

    pub fn is_unique(&self) -> bool {
        self.is_unique || self.is_id
    }
}
