#![deny(rust_2018_idioms, unsafe_code)]

mod enum_type;
mod error;
mod identifier_type;
mod input_types;
mod output_types;
mod query_schema;
mod type_ref;
mod utils;

pub use enum_type::*;
pub use error::*;
pub use identifier_type::*;
pub use input_types::*;
pub use output_types::*;
pub use query_schema::*;
pub use type_ref::*;
pub use utils::*;

use std::sync::Arc;

pub type QuerySchemaRef = Arc<QuerySchema>;
