mod field_builders;
mod internal_dm_builder;
mod model_builder;

pub(crate) use field_builders::*;
pub(crate) use model_builder::*;

use crate::{Datamodel, InternalDataModel, InternalDataModelRef};
use std::sync::Arc;

pub(crate) fn build(datamodel: Datamodel) -> crate::Result<InternalDataModelRef> {
    let model_builders = internal_dm_builder::model_builders(&datamodel)?;
    let models = model_builders
        .into_iter()
        .map(ModelBuilder::build)
        .collect::<crate::Result<Vec<_>>>()?;

    Ok(Arc::new(InternalDataModel { models }))
}
