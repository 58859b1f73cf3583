use crate::UserFacingError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginRequired {}

impl UserFacingError for LoginRequired {
    const ERROR_CODE: &'static str = "C1001";

    fn message(&self) -> String {
        "Must be logged in to access this mutation.".to_owned()
    }
}

#[derive(Debug, Serialize)]
pub struct PermissionDenied {}

impl UserFacingError for PermissionDenied {
    const ERROR_CODE: &'static str = "C1002";

    fn message(&self) -> String {
        "Not permitted to access this mutation.".to_owned()
    }
}

#[derive(Debug, Serialize)]
pub struct InputError {
    pub details: String,
}

impl UserFacingError for InputError {
    const ERROR_CODE: &'static str = "C2001";

    fn message(&self) -> String {
        format!("Input error. {}", self.details)
    }
}

#[derive(Debug, Serialize)]
pub struct RecordNotFound {
    /// Name of the model the lookup ran against.
    pub model_name: String,

    /// The raw id that was looked up.
    pub id: String,
}

impl UserFacingError for RecordNotFound {
    const ERROR_CODE: &'static str = "C2002";

    fn message(&self) -> String {
        format!("No `{}` record found for id `{}`.", self.model_name, self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationFailed {
    pub field_name: String,
    pub details: String,
}

impl UserFacingError for ValidationFailed {
    const ERROR_CODE: &'static str = "C2003";

    fn message(&self) -> String {
        format!("Validation failed for field `{}`: {}", self.field_name, self.details)
    }
}

#[derive(Debug, Serialize)]
pub struct MissingRequiredValue {
    /// Dotted path of the missing value inside the arguments.
    pub path: String,
}

impl UserFacingError for MissingRequiredValue {
    const ERROR_CODE: &'static str = "C2004";

    fn message(&self) -> String {
        format!("Missing a required value at `{}`", self.path)
    }
}

#[derive(Debug, Serialize)]
pub struct UnknownField {
    pub field_name: String,
    pub type_name: String,
}

impl UserFacingError for UnknownField {
    const ERROR_CODE: &'static str = "C2005";

    fn message(&self) -> String {
        format!("Cannot query field `{}` on type `{}`.", self.field_name, self.type_name)
    }
}

#[derive(Debug, Serialize)]
pub struct QueryParsingFailed {
    pub details: String,
}

impl UserFacingError for QueryParsingFailed {
    const ERROR_CODE: &'static str = "C2006";

    fn message(&self) -> String {
        format!("Failed to parse the query: {}", self.details)
    }
}

#[derive(Debug, Serialize)]
pub struct UniqueKeyViolation {
    pub field_name: String,
}

impl UserFacingError for UniqueKeyViolation {
    const ERROR_CODE: &'static str = "C2007";

    fn message(&self) -> String {
        format!("Unique constraint failed on the field: `{}`", self.field_name)
    }
}

#[derive(Debug, Serialize)]
pub struct ForeignKeyViolation {
    pub field_name: String,
}

impl UserFacingError for ForeignKeyViolation {
    const ERROR_CODE: &'static str = "C2008";

    fn message(&self) -> String {
        format!("Foreign key constraint failed on the field: `{}`", self.field_name)
    }
}

#[derive(Debug, Serialize)]
pub struct NullConstraintViolation {
    pub field_name: String,
}

impl UserFacingError for NullConstraintViolation {
    const ERROR_CODE: &'static str = "C2009";

    fn message(&self) -> String {
        format!("Null constraint violation on the field: `{}`", self.field_name)
    }
}
