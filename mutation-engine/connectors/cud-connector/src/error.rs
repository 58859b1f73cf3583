use cud_models::DomainError;
use itertools::Itertools;
use std::fmt::Display;
use thiserror::Error;
use user_facing_errors::{mutation_engine as errors, KnownError};

#[derive(Debug, Error)]
#[error("{}", kind)]
pub struct ConnectorError {
    /// An optional error already rendered for users in case the core does not handle it.
    pub user_facing_error: Option<KnownError>,
    /// The error information for internal use.
    pub kind: ErrorKind,
}

impl ConnectorError {
    pub fn from_kind(kind: ErrorKind) -> Self {
        let user_facing_error = match &kind {
            ErrorKind::NullConstraintViolation { field_name } => {
                Some(KnownError::new(errors::NullConstraintViolation {
                    field_name: field_name.clone(),
                }))
            }
            ErrorKind::UniqueConstraintViolation { field_name } => Some(KnownError::new(errors::UniqueKeyViolation {
                field_name: field_name.clone(),
            })),
            ErrorKind::ForeignKeyConstraintViolation { field_name } => {
                Some(KnownError::new(errors::ForeignKeyViolation {
                    field_name: field_name.clone(),
                }))
            }
            ErrorKind::ConversionError(message) => Some(KnownError::new(errors::InputError {
                details: format!("{message}"),
            })),
            ErrorKind::MultiError(merror) => Some(KnownError::new(errors::InputError {
                details: format!("{merror}"),
            })),
            _ => None,
        };

        ConnectorError {
            user_facing_error,
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("Unique constraint failed: {}", field_name)]
    UniqueConstraintViolation { field_name: String },

    #[error("Null constraint failed: {}", field_name)]
    NullConstraintViolation { field_name: String },

    #[error("Foreign key constraint failed: {}", field_name)]
    ForeignKeyConstraintViolation { field_name: String },

    #[error("Record does not exist.")]
    RecordDoesNotExist,

    #[error("Error creating a connection. ({})", _0)]
    ConnectionError(anyhow::Error),

    #[error("{}", _0)]
    DomainError(DomainError),

    #[error("Conversion error: {}", _0)]
    ConversionError(anyhow::Error),

    #[error("Multiple errors occurred: {}", _0)]
    MultiError(MultiError),
}

impl From<DomainError> for ConnectorError {
    fn from(e: DomainError) -> ConnectorError {
        ConnectorError::from_kind(ErrorKind::DomainError(e))
    }
}

#[derive(Debug)]
pub struct MultiError {
    pub errors: Vec<ErrorKind>,
}

impl Display for MultiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let errors = self
            .errors
            .iter()
            .enumerate()
            .map(|(i, err)| format!("{}) {}", i + 1, err))
            .collect_vec();

        write!(f, "{}", errors.join("\n"))
    }
}
