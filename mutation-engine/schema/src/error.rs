use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("`{}` is not a valid GraphQL type reference.", _0)]
    InvalidTypeReference(String),

    #[error("The type `{}` is defined more than once.", _0)]
    DuplicateType(String),

    #[error("The type `{}` referenced by `{}` does not exist.", name, referenced_by)]
    UnknownType { name: String, referenced_by: String },
}
