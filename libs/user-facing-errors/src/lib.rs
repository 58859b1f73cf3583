#![deny(rust_2018_idioms, unsafe_code)]

pub mod common;
pub mod mutation_engine;

mod panic_hook;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub use panic_hook::{set_panic_hook, PANIC_EXIT_CODE};

/// An error with a stable code and a human readable message, safe to show to API clients.
/// The serialized form of the implementor becomes the `meta` of the resulting [`KnownError`].
pub trait UserFacingError: serde::Serialize {
    const ERROR_CODE: &'static str;

    fn message(&self) -> String;
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct KnownError {
    pub message: String,
    pub meta: serde_json::Value,
    pub error_code: Cow<'static, str>,
}

impl KnownError {
    pub fn new<T: UserFacingError>(inner: T) -> KnownError {
        KnownError {
            message: inner.message(),
            meta: serde_json::to_value(&inner).unwrap_or_default(),
            error_code: Cow::from(T::ERROR_CODE),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct UnknownError {
    pub message: String,
    pub backtrace: Option<String>,
}

impl UnknownError {
    pub fn new(err: &dyn std::error::Error) -> Self {
        UnknownError {
            message: err.to_string(),
            backtrace: None,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(untagged)]
enum ErrorType {
    Known(KnownError),
    Unknown(UnknownError),
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Error {
    is_panic: bool,
    #[serde(flatten)]
    inner: ErrorType,

    #[serde(skip_serializing_if = "Option::is_none")]
    batch_request_idx: Option<usize>,
}

impl Error {
    pub fn as_known(&self) -> Option<&KnownError> {
        match &self.inner {
            ErrorType::Known(err) => Some(err),
            ErrorType::Unknown(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        self.as_known().map(|err| err.error_code.as_ref())
    }

    pub fn message(&self) -> &str {
        match &self.inner {
            ErrorType::Known(err) => &err.message,
            ErrorType::Unknown(err) => &err.message,
        }
    }

    pub fn batch_request_idx(&self) -> Option<usize> {
        self.batch_request_idx
    }

    pub fn set_batch_request_idx(&mut self, batch_request_idx: usize) {
        self.batch_request_idx = Some(batch_request_idx)
    }

    pub fn is_panic(&self) -> bool {
        self.is_panic
    }

    pub fn new_non_panic_with_current_backtrace(message: String) -> Self {
        Error {
            inner: ErrorType::Unknown(UnknownError {
                message,
                backtrace: Some(format!("{:?}", backtrace::Backtrace::new())),
            }),
            is_panic: false,
            batch_request_idx: None,
        }
    }

    /// Construct a new UnknownError from a `PanicHookInfo` in a panic hook. `UnknownError`s created
    /// with this constructor will have a proper, useful backtrace.
    pub fn new_in_panic_hook(panic_info: &std::panic::PanicHookInfo<'_>) -> Self {
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| -> String { (*s).to_owned() })
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.to_owned()))
            .unwrap_or_else(|| "<unknown panic>".to_owned());

        let backtrace = Some(format!("{:?}", backtrace::Backtrace::new()));
        let location = panic_info
            .location()
            .map(|loc| format!("{loc}"))
            .unwrap_or_else(|| "<unknown location>".to_owned());

        Error {
            inner: ErrorType::Unknown(UnknownError {
                message: format!("[{location}] {message}"),
                backtrace,
            }),
            is_panic: true,
            batch_request_idx: None,
        }
    }

    /// Build from a panic payload caught with `catch_unwind`.
    pub fn from_panic_payload(panic_payload: Box<dyn std::any::Any + Send + 'static>) -> Self {
        let message = Self::extract_panic_message(panic_payload).unwrap_or_else(|| "<unknown panic>".to_owned());

        Error {
            inner: ErrorType::Unknown(UnknownError {
                message,
                backtrace: None,
            }),
            is_panic: true,
            batch_request_idx: None,
        }
    }

    pub fn extract_panic_message(panic_payload: Box<dyn std::any::Any + Send + 'static>) -> Option<String> {
        panic_payload
            .downcast_ref::<&str>()
            .map(|s| -> String { (*s).to_owned() })
            .or_else(|| panic_payload.downcast_ref::<String>().map(|s| s.to_owned()))
    }

    pub fn from_dyn_error(err: &dyn std::error::Error) -> Self {
        Error {
            inner: ErrorType::Unknown(UnknownError::new(err)),
            is_panic: false,
            batch_request_idx: None,
        }
    }

    pub fn new_known(err: KnownError) -> Self {
        Error {
            inner: ErrorType::Known(err),
            is_panic: false,
            batch_request_idx: None,
        }
    }
}

impl From<UnknownError> for Error {
    fn from(unknown_error: UnknownError) -> Self {
        Error {
            inner: ErrorType::Unknown(unknown_error),
            is_panic: false,
            batch_request_idx: None,
        }
    }
}

impl From<KnownError> for Error {
    fn from(known_error: KnownError) -> Self {
        Error::new_known(known_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation_engine::{LoginRequired, RecordNotFound};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn known_errors_serialize_with_code_and_meta() {
        let err = Error::from(KnownError::new(RecordNotFound {
            model_name: "Cat".to_owned(),
            id: "12".to_owned(),
        }));

        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "is_panic": false,
                "message": "No `Cat` record found for id `12`.",
                "meta": { "model_name": "Cat", "id": "12" },
                "error_code": "C2002",
            })
        );
    }

    #[test]
    fn batch_index_is_only_serialized_when_set() {
        let mut err = Error::from(KnownError::new(LoginRequired {}));
        assert!(serde_json::to_value(&err).unwrap().get("batch_request_idx").is_none());

        err.set_batch_request_idx(3);

        assert_eq!(serde_json::to_value(&err).unwrap()["batch_request_idx"], json!(3));
        assert_eq!(err.error_code(), Some("C1001"));
    }

    #[test]
    fn unknown_errors_keep_the_message() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::from_dyn_error(&io_err);

        assert_eq!(err.message(), "disk on fire");
        assert!(err.as_known().is_none());
    }
}
