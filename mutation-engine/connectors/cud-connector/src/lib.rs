#![deny(rust_2018_idioms)]

pub mod error;
pub mod filter;

mod interface;
mod write_args;

pub use filter::*;
pub use interface::*;
pub use write_args::*;

pub type Result<T> = std::result::Result<T, error::ConnectorError>;
