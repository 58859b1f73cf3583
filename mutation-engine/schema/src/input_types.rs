use crate::{IdentifierType, TypeRef};

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub identifier: IdentifierType,
    pub fields: Vec<InputField>,
    pub description: Option<String>,
}

impl InputObjectType {
    pub fn new(identifier: IdentifierType, fields: Vec<InputField>) -> Self {
        InputObjectType {
            identifier,
            fields,
            description: None,
        }
    }

    pub fn name(&self) -> String {
        self.identifier.name()
    }

    pub fn get_fields(&self) -> &[InputField] {
        &self.fields
    }

    /// Finds a field by its GraphQL name.
    pub fn find_field(&self, name: &str) -> Option<&InputField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A field of an input object, or an argument of an output field.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    /// Name in the GraphQL schema.
    pub name: String,
    /// Name the value is delivered under after parsing (the model field or operation name).
    pub source_name: String,
    pub field_type: TypeRef,
    pub description: Option<String>,
}

impl InputField {
    pub fn is_required(&self) -> bool {
        self.field_type.is_non_null()
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Field whose GraphQL and source names are the same.
pub fn input_field(name: impl Into<String>, field_type: TypeRef) -> InputField {
    let name = name.into();

    InputField {
        source_name: name.clone(),
        name,
        field_type,
        description: None,
    }
}
