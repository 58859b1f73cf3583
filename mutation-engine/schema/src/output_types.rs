use crate::{IdentifierType, InputField, TypeRef};

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub identifier: IdentifierType,
    pub fields: Vec<OutputField>,
    /// Names of the interfaces the type implements.
    pub interfaces: Vec<String>,

    // Object types can directly map to models.
    pub model: Option<String>,

    pub description: Option<String>,
}

impl ObjectType {
    pub fn new(identifier: IdentifierType, fields: Vec<OutputField>) -> Self {
        ObjectType {
            identifier,
            fields,
            interfaces: Vec::new(),
            model: None,
            description: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn name(&self) -> String {
        self.identifier.name()
    }

    pub fn get_fields(&self) -> &[OutputField] {
        &self.fields
    }

    pub fn find_field(&self, name: &str) -> Option<&OutputField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    pub name: String,
    /// Name of the value backing the field (record field or payload entry), if it
    /// differs from the GraphQL name.
    pub source_name: Option<String>,
    pub arguments: Vec<InputField>,
    pub field_type: TypeRef,
    pub description: Option<String>,
}

impl OutputField {
    pub fn source(&self) -> &str {
        self.source_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_nullable(&self) -> bool {
        !self.field_type.is_non_null()
    }

    pub fn arguments(&self) -> &[InputField] {
        &self.arguments
    }

    pub fn find_argument(&self, name: &str) -> Option<&InputField> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        let source_name = source_name.into();

        self.source_name = if source_name == self.name { None } else { Some(source_name) };
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

pub fn field(name: impl Into<String>, arguments: Vec<InputField>, field_type: TypeRef) -> OutputField {
    OutputField {
        name: name.into(),
        source_name: None,
        arguments,
        field_type,
        description: None,
    }
}
