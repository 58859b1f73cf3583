use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Storage types of scalar model fields.
#[derive(Debug, Copy, PartialEq, Clone, Serialize, Deserialize, Eq, Hash)]
pub enum TypeIdentifier {
    String,
    Int,
    BigInt,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Json,
    Uuid,
    Upload,
}

impl TypeIdentifier {
    pub fn is_string(&self) -> bool {
        matches!(self, TypeIdentifier::String)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeIdentifier::Int | TypeIdentifier::BigInt | TypeIdentifier::Float | TypeIdentifier::Decimal
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, TypeIdentifier::Date | TypeIdentifier::DateTime | TypeIdentifier::Time)
    }
}

impl FromStr for TypeIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" | "Text" => Ok(TypeIdentifier::String),
            "Int" => Ok(TypeIdentifier::Int),
            "BigInt" => Ok(TypeIdentifier::BigInt),
            "Float" => Ok(TypeIdentifier::Float),
            "Decimal" => Ok(TypeIdentifier::Decimal),
            "Boolean" => Ok(TypeIdentifier::Boolean),
            "Date" => Ok(TypeIdentifier::Date),
            "DateTime" => Ok(TypeIdentifier::DateTime),
            "Time" => Ok(TypeIdentifier::Time),
            "Json" => Ok(TypeIdentifier::Json),
            "Uuid" => Ok(TypeIdentifier::Uuid),
            "Upload" | "File" => Ok(TypeIdentifier::Upload),
            _ => Err(format!("type {s} is not a known scalar type.")),
        }
    }
}

impl AsRef<str> for TypeIdentifier {
    fn as_ref(&self) -> &str {
        match self {
            TypeIdentifier::String => "String",
            TypeIdentifier::Int => "Int",
            TypeIdentifier::BigInt => "BigInt",
            TypeIdentifier::Float => "Float",
            TypeIdentifier::Decimal => "Decimal",
            TypeIdentifier::Boolean => "Boolean",
            TypeIdentifier::Date => "Date",
            TypeIdentifier::DateTime => "DateTime",
            TypeIdentifier::Time => "Time",
            TypeIdentifier::Json => "Json",
            TypeIdentifier::Uuid => "Uuid",
            TypeIdentifier::Upload => "Upload",
        }
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}
