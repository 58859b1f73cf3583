#![deny(rust_2018_idioms, unsafe_code)]

mod error;
mod handler;
mod protocols;
mod response;
mod serializer;

pub use error::HandlerError;
pub use handler::*;
pub use protocols::graphql::*;
pub use response::*;

pub type Result<T> = std::result::Result<T, HandlerError>;
