use cud_core::CoreError;
use cud_models::DomainError;
use thiserror::Error;
use user_facing_errors::{common, KnownError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{}", _0)]
    CoreError(#[from] CoreError),

    #[error("Error in data model: {}", _0)]
    DatamodelError(DomainError),

    #[error("{}", _0)]
    ConfigurationError(String),

    #[error("{}", _0)]
    JsonDecodeError(anyhow::Error),

    #[error("{}", _0)]
    IOError(anyhow::Error),
}

impl EngineError {
    /// Writes the error as one line of JSON to stderr.
    pub fn render_as_json(self) -> Result<(), anyhow::Error> {
        use std::io::Write as _;

        let error: user_facing_errors::Error = match self {
            EngineError::CoreError(err) => err.into(),
            EngineError::DatamodelError(err) => KnownError::new(common::DatamodelParserError {
                details: err.to_string(),
            })
            .into(),
            EngineError::ConfigurationError(details) => {
                KnownError::new(common::InvalidConfiguration { details }).into()
            }
            other => user_facing_errors::Error::new_non_panic_with_current_backtrace(other.to_string()),
        };

        let stderr = std::io::stderr();
        let locked_stderr = stderr.lock();
        let mut writer = std::io::LineWriter::new(locked_stderr);
        serde_json::to_writer(&mut writer, &error)?;
        writeln!(&mut writer)?;
        writer.flush()?;

        Ok(())
    }
}

impl From<DomainError> for EngineError {
    fn from(e: DomainError) -> Self {
        EngineError::DatamodelError(e)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> EngineError {
        EngineError::JsonDecodeError(e.into())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> EngineError {
        EngineError::IOError(e.into())
    }
}
