use crate::{
    filter,
    store::{foreign_key_violation, null_violation, unique_violation, Store},
};
use cud_connector::{
    error::{ConnectorError, ErrorKind},
    Filter, WriteArgs,
};
use cud_models::{DomainError, Field, InternalDataModel, Model, OnDelete, Record, RelationField, TypeIdentifier};
use cud_value::CudValue;
use indexmap::IndexMap;
use std::collections::HashMap;

pub(crate) fn create_record(
    store: &mut Store,
    datamodel: &InternalDataModel,
    model: &Model,
    mut args: WriteArgs,
) -> cud_connector::Result<Record> {
    let mut values: IndexMap<String, CudValue> = IndexMap::new();

    for field in model.fields() {
        match field {
            Field::Scalar(sf) => {
                let value = match args.take_field_value(&sf.name) {
                    Some(value) => value,
                    None => match &sf.default_value {
                        Some(default) => default.get(),
                        // Text columns without a default store the empty string.
                        None if !sf.is_nullable && !sf.is_autoincrement && sf.type_identifier.is_string() => {
                            CudValue::String(String::new())
                        }
                        None => CudValue::Null,
                    },
                };

                values.insert(sf.name.clone(), value);
            }
            Field::Relation(rf) if rf.is_inlined() => {
                let value = args.take_field_value(&rf.name).unwrap_or(CudValue::Null);
                values.insert(rf.name.clone(), value);
            }
            Field::Relation(_) => (),
        }
    }

    reject_unknown_args(model, &args)?;

    let table = store.table_mut(&model.name);

    for sf in model.scalar_fields().filter(|sf| sf.is_autoincrement) {
        match values.get(&sf.name).and_then(CudValue::as_int) {
            Some(id) => table.observe_id(id),
            None => {
                let id = table.next_id();
                let id = match sf.type_identifier {
                    TypeIdentifier::BigInt => CudValue::BigInt(id),
                    _ => CudValue::Int(id),
                };

                values.insert(sf.name.clone(), id);
            }
        }
    }

    let mut candidate_rows = table.rows.clone();
    candidate_rows.push(Record::new(values));

    let idx = candidate_rows.len() - 1;
    check_constraints(store, datamodel, model, &candidate_rows, idx)?;

    let record = candidate_rows[idx].clone();
    store.table_mut(&model.name).rows = candidate_rows;

    tracing::trace!(model = %model.name, "created record");

    Ok(record)
}

pub(crate) fn update_records(
    store: &mut Store,
    datamodel: &InternalDataModel,
    model: &Model,
    record_filter: &Filter,
    args: WriteArgs,
) -> cud_connector::Result<Vec<Record>> {
    reject_unknown_args(model, &args)?;

    let mut indices = Vec::new();

    for (idx, record) in store.rows(&model.name).iter().enumerate() {
        if filter::matches(store, datamodel, model, record, record_filter)? {
            indices.push(idx);
        }
    }

    let mut candidate_rows = store.rows(&model.name).to_vec();

    for idx in indices.iter().copied() {
        for (field, value) in args.iter() {
            candidate_rows[idx].set(field.clone(), value.clone());
        }
    }

    for idx in indices.iter().copied() {
        check_constraints(store, datamodel, model, &candidate_rows, idx)?;
    }

    let updated = indices.iter().map(|idx| candidate_rows[*idx].clone()).collect();
    store.table_mut(&model.name).rows = candidate_rows;

    Ok(updated)
}

/// Rows scheduled for deletion and foreign keys to clear, per model.
#[derive(Default)]
struct DeletePlan {
    deletions: HashMap<String, Vec<CudValue>>,
    nullify: Vec<(String, String, CudValue)>,
}

pub(crate) fn delete_records(
    store: &mut Store,
    datamodel: &InternalDataModel,
    model: &Model,
    record_filter: &Filter,
) -> cud_connector::Result<usize> {
    let pk = &model.primary_key().name;
    let mut ids = Vec::new();

    for record in store.rows(&model.name) {
        if filter::matches(store, datamodel, model, record, record_filter)? {
            ids.push(record.get_or_null(pk));
        }
    }

    let mut plan = DeletePlan::default();
    plan_deletion(store, datamodel, model, &ids, &mut plan)?;

    for (model_name, field, id) in plan.nullify {
        let Ok(referencing) = datamodel.find_model(&model_name) else { continue };
        let referencing_pk = referencing.primary_key().name.clone();

        for row in store.table_mut(&model_name).rows.iter_mut() {
            if row.get(&referencing_pk) == Some(&id) {
                row.set(field.clone(), CudValue::Null);
            }
        }
    }

    for (model_name, deleted) in plan.deletions {
        let deleted_model = datamodel.find_model(&model_name)?;
        let deleted_pk = deleted_model.primary_key().name.clone();

        store
            .table_mut(&model_name)
            .rows
            .retain(|row| !deleted.contains(&row.get_or_null(&deleted_pk)));

        store.remove_join_rows_for(datamodel, &deleted_model, &deleted)?;
    }

    Ok(ids.len())
}

fn plan_deletion(
    store: &Store,
    datamodel: &InternalDataModel,
    model: &Model,
    ids: &[CudValue],
    plan: &mut DeletePlan,
) -> cud_connector::Result<()> {
    let scheduled = plan.deletions.entry(model.name.clone()).or_default();
    let new_ids: Vec<CudValue> = ids.iter().filter(|id| !scheduled.contains(id)).cloned().collect();

    if new_ids.is_empty() {
        return Ok(());
    }

    scheduled.extend(new_ids.iter().cloned());

    for rf in datamodel.fields_referencing(&model.name) {
        let referencing = datamodel.find_model(&rf.model)?;
        let referencing_pk = &referencing.primary_key().name;

        let referencing_ids: Vec<CudValue> = store
            .rows(&rf.model)
            .iter()
            .filter(|row| new_ids.contains(&row.get_or_null(&rf.name)))
            .map(|row| row.get_or_null(referencing_pk))
            .collect();

        if referencing_ids.is_empty() {
            continue;
        }

        match rf.on_delete {
            OnDelete::Cascade => plan_deletion(store, datamodel, &referencing, &referencing_ids, plan)?,
            OnDelete::SetNull => plan
                .nullify
                .extend(referencing_ids.into_iter().map(|id| (rf.model.clone(), rf.name.clone(), id))),
            OnDelete::Protect => return Err(foreign_key_violation(&rf.model, &rf.name)),
        }
    }

    Ok(())
}

pub(crate) fn m2m_connect(
    store: &mut Store,
    datamodel: &InternalDataModel,
    field: &RelationField,
    parent_id: &CudValue,
    child_ids: &[CudValue],
) -> cud_connector::Result<()> {
    let (key, is_forward) = join_table(field)?;
    let parent_model = datamodel.find_model(&field.model)?;
    let child_model = datamodel.related_model(field)?;

    if !store.record_exists(&parent_model, parent_id) {
        return Err(foreign_key_violation(&field.model, &field.name));
    }

    if child_ids.iter().any(|id| !store.record_exists(&child_model, id)) {
        return Err(foreign_key_violation(&field.model, &field.name));
    }

    let rows = store.join_rows_mut(&key);

    for child_id in child_ids {
        let pair = match is_forward {
            true => (parent_id.clone(), child_id.clone()),
            false => (child_id.clone(), parent_id.clone()),
        };

        if !rows.contains(&pair) {
            rows.push(pair);
        }
    }

    Ok(())
}

pub(crate) fn m2m_disconnect(
    store: &mut Store,
    field: &RelationField,
    parent_id: &CudValue,
    child_ids: &[CudValue],
) -> cud_connector::Result<()> {
    let (key, is_forward) = join_table(field)?;

    store.join_rows_mut(&key).retain(|(left, right)| {
        let (parent, child) = if is_forward { (left, right) } else { (right, left) };
        !(parent == parent_id && child_ids.contains(child))
    });

    Ok(())
}

fn join_table(field: &RelationField) -> cud_connector::Result<(String, bool)> {
    field.join_table().ok_or_else(|| {
        ConnectorError::from(DomainError::UnexpectedFieldKind {
            name: field.name.clone(),
            model: field.model.clone(),
            expected: "many-to-many field",
        })
    })
}

fn reject_unknown_args(model: &Model, args: &WriteArgs) -> cud_connector::Result<()> {
    for key in args.keys() {
        if !model.is_stored_field(key) {
            return Err(ConnectorError::from_kind(ErrorKind::DomainError(DomainError::FieldNotFound {
                name: key.clone(),
                model: model.name.clone(),
            })));
        }
    }

    Ok(())
}

/// Checks the row at `idx` of `rows` (the prospective contents of `model`'s table).
fn check_constraints(
    store: &Store,
    datamodel: &InternalDataModel,
    model: &Model,
    rows: &[Record],
    idx: usize,
) -> cud_connector::Result<()> {
    let record = &rows[idx];

    for field in model.fields() {
        match field {
            Field::Scalar(sf) => {
                let value = record.get_or_null(&sf.name);

                if value.is_null() {
                    if !sf.is_nullable {
                        return Err(null_violation(model, &sf.name));
                    }

                    continue;
                }

                if sf.is_unique() && is_taken(rows, idx, &sf.name, &value) {
                    return Err(unique_violation(model, &sf.name));
                }
            }
            Field::Relation(rf) if rf.is_inlined() => {
                let value = record.get_or_null(&rf.name);

                if value.is_null() {
                    if !rf.is_nullable {
                        return Err(null_violation(model, &rf.name));
                    }

                    continue;
                }

                let related = datamodel.related_model(rf)?;
                let exists = if related.name == model.name {
                    rows.iter().any(|r| r.get(&related.primary_key().name) == Some(&value))
                } else {
                    store.record_exists(&related, &value)
                };

                if !exists {
                    return Err(foreign_key_violation(&model.name, &rf.name));
                }

                if rf.kind == cud_models::RelationKind::OneToOne && is_taken(rows, idx, &rf.name, &value) {
                    return Err(unique_violation(model, &rf.name));
                }
            }
            Field::Relation(_) => (),
        }
    }

    Ok(())
}

fn is_taken(rows: &[Record], idx: usize, field: &str, value: &CudValue) -> bool {
    rows.iter()
        .enumerate()
        .any(|(other, row)| other != idx && row.get(field) == Some(value))
}
