use cud_core::CoreError;
use graphql_parser::query::ParseError;
use thiserror::Error;
use user_facing_errors::{mutation_engine as errors, KnownError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{}", _0)]
    Core(#[from] CoreError),

    #[error("Error parsing GraphQL query: {}", _0)]
    QueryParsing(String),

    #[error("{}", _0)]
    QueryConversion(String),

    #[error("Unsupported feature: {}. {}", feature_name, message)]
    UnsupportedFeature {
        feature_name: &'static str,
        message: String,
    },

    #[error("{}", _0)]
    Serialization(String),
}

impl HandlerError {
    pub fn query_conversion(message: impl ToString) -> Self {
        Self::QueryConversion(message.to_string())
    }

    pub fn unsupported_feature(feature_name: &'static str, message: impl ToString) -> Self {
        let message = message.to_string();

        Self::UnsupportedFeature { feature_name, message }
    }
}

impl From<ParseError> for HandlerError {
    fn from(e: ParseError) -> Self {
        Self::QueryParsing(e.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(format!("Error serializing the response: {e}"))
    }
}

impl From<HandlerError> for user_facing_errors::Error {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Core(err) => err.into(),
            HandlerError::QueryParsing(details) | HandlerError::QueryConversion(details) => {
                KnownError::new(errors::QueryParsingFailed { details }).into()
            }
            err @ HandlerError::UnsupportedFeature { .. } => KnownError::new(errors::QueryParsingFailed {
                details: err.to_string(),
            })
            .into(),
            err @ HandlerError::Serialization(_) => user_facing_errors::Error::from_dyn_error(&err),
        }
    }
}
