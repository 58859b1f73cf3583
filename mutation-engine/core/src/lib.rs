#![deny(rust_2018_idioms, unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod global_id;
pub mod hooks;
pub mod options;
pub mod query_document;
pub mod registry;
pub mod schema_builder;

pub use config::*;
pub use context::*;
pub use error::*;
pub use executor::*;
pub use global_id::*;
pub use hooks::*;
pub use options::*;
pub use query_document::{ParsedInputMap, ParsedInputValue};
pub use registry::*;
pub use schema_builder::*;

pub type CoreResult<T> = Result<T, CoreError>;
