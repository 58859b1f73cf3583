use crate::{filter, store::Store};
use cud_connector::Filter;
use cud_models::{InternalDataModel, Model, Record, RelationField};
use cud_value::CudValue;

pub(crate) fn get_many_records(
    store: &Store,
    datamodel: &InternalDataModel,
    model: &Model,
    filter: &Filter,
) -> cud_connector::Result<Vec<Record>> {
    let mut records = Vec::new();

    for record in store.rows(&model.name) {
        if filter::matches(store, datamodel, model, record, filter)? {
            records.push(record.clone());
        }
    }

    Ok(records)
}

pub(crate) fn get_single_record(
    store: &Store,
    datamodel: &InternalDataModel,
    model: &Model,
    filter: &Filter,
) -> cud_connector::Result<Option<Record>> {
    for record in store.rows(&model.name) {
        if filter::matches(store, datamodel, model, record, filter)? {
            return Ok(Some(record.clone()));
        }
    }

    Ok(None)
}

pub(crate) fn get_related_m2m_record_ids(store: &Store, field: &RelationField, from_id: &CudValue) -> Vec<CudValue> {
    filter::related_m2m_ids(store, field, from_id)
}
