use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Model `{}` not found", name)]
    ModelNotFound { name: String },

    #[error("Field `{}` not found on model `{}`", name, model)]
    FieldNotFound { name: String, model: String },

    #[error("Field `{}` on model `{}` is not a {}", name, model, expected)]
    UnexpectedFieldKind {
        name: String,
        model: String,
        expected: &'static str,
    },

    #[error("Invalid datamodel: {}", _0)]
    InvalidDatamodel(String),

    #[error("Conversion from `{}` to `{}` failed.", _0, _1)]
    ConversionFailure(String, String),
}

impl DomainError {
    pub fn conversion(value: impl ToString, to: impl ToString) -> Self {
        DomainError::ConversionFailure(value.to_string(), to.to_string())
    }
}
