use cud_connector::error::ConnectorError;
use cud_models::DomainError;
use cud_schema::SchemaError;
use thiserror::Error;
use user_facing_errors::{common, mutation_engine as errors, KnownError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Must be logged in to access this mutation.")]
    LoginRequired,

    #[error("Not permitted to access this mutation.")]
    PermissionDenied,

    #[error("Model type must be registered for model {}", _0)]
    ModelTypeNotRegistered(String),

    #[error("Error building the schema: {}", _0)]
    SchemaError(#[from] SchemaError),

    #[error("{}", _0)]
    ConfigurationError(String),

    #[error("{}", _0)]
    InputError(String),

    #[error("No `{}` record found for id `{}`.", model, id)]
    RecordNotFound { model: String, id: String },

    #[error("Validation failed for field `{}`: {}", field, message)]
    ValidationError { field: String, message: String },

    #[error("Missing a required value at `{}`", path)]
    MissingRequiredValue { path: String },

    #[error("Cannot query field `{}` on type `{}`.", field_name, type_name)]
    UnknownField { field_name: String, type_name: String },

    #[error("Error in connector: {}", _0)]
    ConnectorError(ConnectorError),

    #[error("Error in domain logic: {}", _0)]
    DomainError(DomainError),

    #[error("Error in batch request {request_idx}: {error}")]
    BatchError { request_idx: usize, error: Box<CoreError> },
}

impl CoreError {
    pub fn input(message: impl Into<String>) -> Self {
        CoreError::InputError(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::ConfigurationError(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn in_batch(self, request_idx: usize) -> Self {
        CoreError::BatchError {
            request_idx,
            error: Box::new(self),
        }
    }
}

impl From<ConnectorError> for CoreError {
    fn from(e: ConnectorError) -> CoreError {
        CoreError::ConnectorError(e)
    }
}

impl From<DomainError> for CoreError {
    fn from(e: DomainError) -> CoreError {
        match e {
            DomainError::ConversionFailure(value, to) => {
                CoreError::InputError(format!("Cannot convert `{value}` to {to}."))
            }
            e => CoreError::DomainError(e),
        }
    }
}

impl From<CoreError> for user_facing_errors::Error {
    fn from(err: CoreError) -> user_facing_errors::Error {
        match err {
            CoreError::LoginRequired => KnownError::new(errors::LoginRequired {}).into(),
            CoreError::PermissionDenied => KnownError::new(errors::PermissionDenied {}).into(),

            CoreError::ModelTypeNotRegistered(_) | CoreError::SchemaError(_) | CoreError::ConfigurationError(_) => {
                KnownError::new(common::InvalidConfiguration {
                    details: err.to_string(),
                })
                .into()
            }

            CoreError::InputError(details) => KnownError::new(errors::InputError { details }).into(),

            CoreError::RecordNotFound { model, id } => KnownError::new(errors::RecordNotFound {
                model_name: model,
                id,
            })
            .into(),

            CoreError::ValidationError { field, message } => KnownError::new(errors::ValidationFailed {
                field_name: field,
                details: message,
            })
            .into(),

            CoreError::MissingRequiredValue { path } => KnownError::new(errors::MissingRequiredValue { path }).into(),

            CoreError::UnknownField { field_name, type_name } => {
                KnownError::new(errors::UnknownField { field_name, type_name }).into()
            }

            CoreError::ConnectorError(ConnectorError {
                user_facing_error: Some(user_facing_error),
                ..
            }) => user_facing_error.into(),

            CoreError::BatchError { request_idx, error } => {
                let mut inner_error = user_facing_errors::Error::from(*error);
                inner_error.set_batch_request_idx(request_idx);
                inner_error
            }

            _ => user_facing_errors::Error::from_dyn_error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn batch_errors_keep_the_inner_code_and_index() {
        let err = CoreError::RecordNotFound {
            model: "Cat".into(),
            id: "7".into(),
        }
        .in_batch(2);

        let user_facing = user_facing_errors::Error::from(err);

        assert_eq!(user_facing.error_code(), Some("C2002"));
        assert_eq!(user_facing.batch_request_idx(), Some(2));
        assert_eq!(user_facing.message(), "No `Cat` record found for id `7`.");
    }

    #[test]
    fn login_and_permission_messages() {
        let login = user_facing_errors::Error::from(CoreError::LoginRequired);
        let denied = user_facing_errors::Error::from(CoreError::PermissionDenied);

        assert_eq!(login.message(), "Must be logged in to access this mutation.");
        assert_eq!(denied.message(), "Not permitted to access this mutation.");
    }
}
