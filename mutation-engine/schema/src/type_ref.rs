use crate::{is_valid_name, SchemaError};
use std::{fmt, str::FromStr};

/// A reference to a named type, possibly wrapped in list and non-null modifiers.
/// Types reference each other by name, the `QuerySchema` owns the definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        TypeRef::Named(scalar.to_string())
    }

    pub fn id() -> Self {
        Self::scalar(ScalarType::ID)
    }

    pub fn boolean() -> Self {
        Self::scalar(ScalarType::Boolean)
    }

    pub fn int() -> Self {
        Self::scalar(ScalarType::Int)
    }

    /// Wraps the type in a non-null modifier. Non-null types are returned as is.
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    pub fn non_null_if(self, condition: bool) -> Self {
        if condition {
            self.non_null()
        } else {
            self
        }
    }

    /// Strips an outer non-null modifier.
    pub fn nullable(self) -> Self {
        match self {
            TypeRef::NonNull(inner) => *inner,
            other => other,
        }
    }

    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::List(_) => true,
            TypeRef::Named(_) => false,
        }
    }

    /// The element type of a (possibly non-null) list.
    pub fn list_item(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::NonNull(inner) => inner.list_item(),
            TypeRef::List(inner) => Some(inner),
            TypeRef::Named(_) => None,
        }
    }

    /// The name of the innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_ref(s)
    }
}

/// Parses a type reference in SDL notation, e.g. `[ID!]!`.
pub fn parse_type_ref(input: &str) -> Result<TypeRef, SchemaError> {
    let trimmed = input.trim();
    let invalid = || SchemaError::InvalidTypeReference(input.to_owned());

    if let Some(inner) = trimmed.strip_suffix('!') {
        let inner = parse_type_ref(inner).map_err(|_| invalid())?;

        return match inner {
            TypeRef::NonNull(_) => Err(invalid()),
            inner => Ok(inner.non_null()),
        };
    }

    if let Some(inner) = trimmed.strip_prefix('[') {
        let inner = inner.strip_suffix(']').ok_or_else(invalid)?;
        return Ok(parse_type_ref(inner).map_err(|_| invalid())?.list());
    }

    if is_valid_name(trimmed) {
        Ok(TypeRef::named(trimmed))
    } else {
        Err(invalid())
    }
}

/// The scalar types generated schemas use. Everything but the five built-ins is rendered
/// as a custom scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(clippy::upper_case_acronyms)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Boolean,
    ID,
    Date,
    DateTime,
    Time,
    Decimal,
    JSONString,
    UUID,
    Upload,
    BigInt,
}

impl ScalarType {
    pub const ALL: [ScalarType; 13] = [
        ScalarType::String,
        ScalarType::Int,
        ScalarType::Float,
        ScalarType::Boolean,
        ScalarType::ID,
        ScalarType::Date,
        ScalarType::DateTime,
        ScalarType::Time,
        ScalarType::Decimal,
        ScalarType::JSONString,
        ScalarType::UUID,
        ScalarType::Upload,
        ScalarType::BigInt,
    ];

    pub fn is_builtin(self) -> bool {
        matches!(
            self,
            ScalarType::String | ScalarType::Int | ScalarType::Float | ScalarType::Boolean | ScalarType::ID
        )
    }
}

impl AsRef<str> for ScalarType {
    fn as_ref(&self) -> &str {
        match self {
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
            ScalarType::ID => "ID",
            ScalarType::Date => "Date",
            ScalarType::DateTime => "DateTime",
            ScalarType::Time => "Time",
            ScalarType::Decimal => "Decimal",
            ScalarType::JSONString => "JSONString",
            ScalarType::UUID => "UUID",
            ScalarType::Upload => "Upload",
            ScalarType::BigInt => "BigInt",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for ScalarType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarType::ALL
            .into_iter()
            .find(|scalar| scalar.as_ref() == s)
            .ok_or_else(|| SchemaError::InvalidTypeReference(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parsing_wrapped_types() {
        let parsed = parse_type_ref("[ID!]!").unwrap();

        assert_eq!(parsed, TypeRef::id().non_null().list().non_null());
        assert_eq!(parsed.to_string(), "[ID!]!");
        assert_eq!(parsed.named_type(), "ID");
        assert!(parsed.is_list());
    }

    #[test]
    fn parsing_rejects_malformed_references() {
        for input in ["", "[ID", "ID!!", "1Cat", "[Cat]]", "Cat Dog"] {
            assert!(parse_type_ref(input).is_err(), "{input} should not parse");
        }
    }

    #[test]
    fn non_null_is_idempotent() {
        assert_eq!(TypeRef::int().non_null().non_null().to_string(), "Int!");
        assert_eq!(TypeRef::int().non_null().nullable().to_string(), "Int");
    }
}
