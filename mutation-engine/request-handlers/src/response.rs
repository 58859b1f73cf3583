use crate::HandlerError;
use cud_core::CoreError;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

pub type Map = IndexMap<String, JsonValue>;

#[derive(Debug, serde::Serialize, Default, PartialEq)]
pub struct GQLResponse {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub data: Map,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GQLError>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct GQLError {
    error: String,
    user_facing_error: user_facing_errors::Error,

    /// Response key of the root field that failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    path: Vec<String>,
}

impl GQLError {
    pub fn code(&self) -> Option<&str> {
        self.user_facing_error.as_known().map(|err| err.error_code.as_ref())
    }

    pub fn message(&self) -> &str {
        self.user_facing_error.message()
    }

    pub fn batch_request_idx(&self) -> Option<usize> {
        self.user_facing_error.batch_request_idx()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn at(mut self, response_key: impl Into<String>) -> Self {
        self.path = vec![response_key.into()];
        self
    }

    pub fn from_user_facing_error(err: user_facing_errors::Error) -> Self {
        GQLError {
            error: err.message().to_owned(),
            user_facing_error: err,
            path: Vec::new(),
        }
    }

    pub fn from_core_error(err: CoreError) -> Self {
        GQLError {
            error: format!("{err}"),
            user_facing_error: user_facing_errors::Error::from(err),
            path: Vec::new(),
        }
    }

    pub fn from_handler_error(err: HandlerError) -> Self {
        match err {
            HandlerError::Core(err) => Self::from_core_error(err),
            err => Self::from_user_facing_error(user_facing_errors::Error::from(err)),
        }
    }

    pub fn from_panic_payload(panic_payload: Box<dyn std::any::Any + Send + 'static>) -> Self {
        Self::from_user_facing_error(user_facing_errors::Error::from_panic_payload(panic_payload))
    }
}

impl From<HandlerError> for GQLError {
    fn from(err: HandlerError) -> Self {
        GQLError::from_handler_error(err)
    }
}

impl From<CoreError> for GQLError {
    fn from(err: CoreError) -> Self {
        GQLError::from_core_error(err)
    }
}

impl GQLResponse {
    pub fn new(data: Map) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: IndexMap::with_capacity(capacity),
            ..Default::default()
        }
    }

    pub fn insert_data(&mut self, key: impl Into<String>, item: JsonValue) {
        self.data.insert(key.into(), item);
    }

    pub fn insert_error(&mut self, error: impl Into<GQLError>) {
        self.errors.push(error.into());
    }

    pub fn take_data(&mut self, key: impl AsRef<str>) -> Option<JsonValue> {
        self.data.shift_remove(key.as_ref())
    }

    pub fn errors(&self) -> impl Iterator<Item = &GQLError> {
        self.errors.iter()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_data(self) -> Map {
        self.data
    }
}

impl From<GQLError> for GQLResponse {
    fn from(err: GQLError) -> Self {
        let mut gql_response = Self::default();

        gql_response.insert_error(err);
        gql_response
    }
}

impl From<HandlerError> for GQLResponse {
    fn from(err: HandlerError) -> Self {
        GQLError::from(err).into()
    }
}

impl From<CoreError> for GQLResponse {
    fn from(err: CoreError) -> Self {
        GQLError::from(err).into()
    }
}
