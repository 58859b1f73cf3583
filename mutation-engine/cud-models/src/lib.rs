mod builders;
mod coerce;
mod datamodel;
mod default_value;
mod error;
mod field;
mod internal_data_model;
mod model;
mod record;
mod scalars;

pub use datamodel::*;
pub use default_value::*;
pub use error::*;
pub use field::*;
pub use internal_data_model::*;
pub use model::*;
pub use record::*;
pub use scalars::*;

pub use cud_value::{self, CudValue};

pub type Result<T> = std::result::Result<T, DomainError>;

/// Converts a JSON datamodel description into an internal data model.
pub fn convert(datamodel_json: &str) -> crate::Result<InternalDataModelRef> {
    let datamodel: Datamodel =
        serde_json::from_str(datamodel_json).map_err(|err| DomainError::InvalidDatamodel(err.to_string()))?;

    builders::build(datamodel)
}
