use crate::UserFacingError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DatamodelParserError {
    /// The parser's description of what went wrong.
    pub details: String,
}

impl UserFacingError for DatamodelParserError {
    const ERROR_CODE: &'static str = "C1000";

    fn message(&self) -> String {
        indoc::formatdoc!(
            "
            The datamodel could not be loaded.

            {details}",
            details = self.details
        )
    }
}

#[derive(Debug, Serialize)]
pub struct InvalidConfiguration {
    pub details: String,
}

impl UserFacingError for InvalidConfiguration {
    const ERROR_CODE: &'static str = "C1003";

    fn message(&self) -> String {
        format!("The mutation configuration is invalid: {}", self.details)
    }
}
