#![deny(rust_2018_idioms, unsafe_code)]

pub mod cli;
pub mod context;
pub mod error;
pub mod logger;
pub mod opt;

use error::EngineError;
use std::str::FromStr;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format `{other}`, expected `text` or `json`.")),
        }
    }
}
