use crate::IdentifierType;
use cud_value::CudValue;

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub identifier: IdentifierType,
    pub values: Vec<EnumValue>,
    pub description: Option<String>,
}

/// A named enum value and the value it stands for in records.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub value: CudValue,
    pub description: Option<String>,
}

impl EnumType {
    pub fn new(identifier: IdentifierType, values: Vec<EnumValue>) -> Self {
        EnumType {
            identifier,
            values,
            description: None,
        }
    }

    pub fn name(&self) -> String {
        self.identifier.name()
    }

    pub fn value_for(&self, name: &str) -> Option<&CudValue> {
        self.values.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    pub fn name_for(&self, value: &CudValue) -> Option<&str> {
        self.values.iter().find(|v| &v.value == value).map(|v| v.name.as_str())
    }
}
