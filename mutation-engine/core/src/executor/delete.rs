use super::{coerce_id, filter, take_id, take_list, take_map, unexpected_input, Operation, Payload, PayloadValue};
use crate::{CoreError, CoreResult, MutationEvent, MutationInput, ParsedInputMap, SaveTarget};
use cud_connector::{ConnectionLike, Filter};
use cud_models::Record;
use cud_value::CudValue;
use indexmap::IndexMap;

/// Deletes the record behind `id`.
///
/// 1. `before_mutate` with the input id.
/// 2. Login check.
/// 3. `validate`.
/// 4. Resolves the id (global or raw) and fetches the record within the scope filter.
/// 5. A missing record is reported with `found: false` after `after_mutate`.
/// 6. Otherwise `check_permissions` against the record, `before_save`, which may swap the
///    record, the delete and `after_mutate`.
#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn delete_one(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());
    let model = op.model();

    let input = MutationInput::Delete {
        id: take_id(&mut args, "id")?,
    };

    let input = hooks.before_mutate(ctx, def, input)?;

    let MutationInput::Delete { id } = &input else {
        return Err(unexpected_input("delete"));
    };

    op.ensure_login()?;
    hooks.validate(ctx, def, &input)?;

    let pk = model.primary_key().name.clone();
    let raw_id = coerce_id(model, id)?;
    let filter = op.scope().merge(Filter::equals(pk.clone(), raw_id));

    let Some(record) = conn.get_single_record(model, &filter).await? else {
        tracing::debug!(id = %id, "no record to delete");

        hooks.after_mutate(
            ctx,
            def,
            &input,
            &MutationEvent::Deleted {
                input_id: id.clone(),
                found: false,
            },
        )?;

        return Ok(delete_payload(false, None));
    };

    hooks.check_permissions(ctx, def, &input, Some(&record))?;

    let record = match hooks.before_save(ctx, def, SaveTarget::Delete(record))? {
        SaveTarget::Delete(record) => record,
        other => return Err(SaveTarget::mismatch("delete", &other)),
    };

    let raw_id = record.id(model)?.clone();
    let deleted_id = op.encode_id(&raw_id);

    conn.delete_records(model, &Filter::equals(pk, raw_id.clone())).await?;

    tracing::debug!(id = %raw_id, "deleted record");

    hooks.after_mutate(
        ctx,
        def,
        &input,
        &MutationEvent::Deleted {
            input_id: id.clone(),
            found: true,
        },
    )?;

    Ok(delete_payload(
        true,
        Some(DeletedIds {
            input: id.clone(),
            encoded: deleted_id,
            raw: raw_id.to_id_string(),
        }),
    ))
}

struct DeletedIds {
    input: String,
    encoded: String,
    raw: String,
}

fn delete_payload(found: bool, ids: Option<DeletedIds>) -> Payload {
    let (input, encoded, raw) = match ids {
        Some(ids) => (
            CudValue::String(ids.input),
            CudValue::String(ids.encoded),
            CudValue::String(ids.raw),
        ),
        None => (CudValue::Null, CudValue::Null, CudValue::Null),
    };

    IndexMap::from([
        ("found".to_owned(), PayloadValue::Scalar(CudValue::Boolean(found))),
        ("deleted_input_id".to_owned(), PayloadValue::Scalar(input)),
        ("deleted_id".to_owned(), PayloadValue::Scalar(encoded)),
        ("deleted_raw_id".to_owned(), PayloadValue::Scalar(raw)),
    ])
}

/// Deletes the records behind `ids`. Ids without a record in scope are reported as
/// `missed_ids`, in input order. Null ids are skipped.
#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn delete_many(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());
    let model = op.model();

    let ids = take_list(&mut args, "ids")?
        .into_iter()
        .filter_map(|id| match id.into_value() {
            CudValue::Null => None,
            CudValue::String(id) => Some(id),
            other => Some(other.to_id_string()),
        })
        .collect();

    let input = hooks.before_mutate(ctx, def, MutationInput::BatchDelete { ids })?;

    let MutationInput::BatchDelete { ids } = &input else {
        return Err(unexpected_input("batch delete"));
    };

    op.ensure_login()?;
    hooks.check_permissions(ctx, def, &input, None)?;
    hooks.validate(ctx, def, &input)?;

    let raw_ids = ids
        .iter()
        .map(|id| coerce_id(model, id))
        .collect::<CoreResult<Vec<_>>>()?;

    let pk = model.primary_key().name.clone();
    let filter = op.scope().merge(Filter::is_in(pk.clone(), raw_ids.clone()));
    let records = conn.get_many_records(model, &filter).await?;

    let records = match hooks.before_save(ctx, def, SaveTarget::DeleteMany(records))? {
        SaveTarget::DeleteMany(records) => records,
        other => return Err(SaveTarget::mismatch("batch delete", &other)),
    };

    let found = record_ids(op, &records)?;

    let missed_ids: Vec<CudValue> = ids
        .iter()
        .zip(&raw_ids)
        .filter(|(_, raw)| !found.contains(raw))
        .map(|(id, _)| CudValue::String(id.clone()))
        .collect();

    let (deletion_count, deleted_ids) = delete_records(op, conn, found).await?;

    hooks.after_mutate(
        ctx,
        def,
        &input,
        &MutationEvent::BatchDeleted {
            deletion_count,
            deleted_ids: deleted_ids.clone(),
        },
    )?;

    Ok(IndexMap::from([
        ("deletion_count".to_owned(), PayloadValue::Scalar(CudValue::from(deletion_count))),
        ("deleted_ids".to_owned(), PayloadValue::Scalar(CudValue::List(deleted_ids))),
        ("missed_ids".to_owned(), PayloadValue::Scalar(CudValue::List(missed_ids))),
    ]))
}

/// Deletes the records in scope matching the filter input.
#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn delete_filtered(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());
    let model = op.model();

    let input = MutationInput::FilterDelete {
        filter: take_map(&mut args, "input")?,
    };

    let input = hooks.before_mutate(ctx, def, input)?;

    let MutationInput::FilterDelete { filter: filter_input } = &input else {
        return Err(unexpected_input("filter delete"));
    };

    op.ensure_login()?;
    hooks.check_permissions(ctx, def, &input, None)?;
    hooks.validate(ctx, def, &input)?;

    let filter_type = def
        .filter_type
        .as_deref()
        .and_then(|name| op.schema.filter_binding(name))
        .ok_or_else(|| CoreError::configuration(format!("The mutation {} has no filter input.", def.field_name)))?;

    let filter = filter::build_filter(op.schema.internal_data_model(), filter_type, filter_input)?;
    let records = conn.get_many_records(model, &op.scope().merge(filter)).await?;

    tracing::debug!(matched = records.len(), "records matching the filter");

    let records = match hooks.before_save(ctx, def, SaveTarget::DeleteMany(records))? {
        SaveTarget::DeleteMany(records) => records,
        other => return Err(SaveTarget::mismatch("filter delete", &other)),
    };

    let found = record_ids(op, &records)?;
    let (deletion_count, deleted_ids) = delete_records(op, conn, found).await?;

    hooks.after_mutate(
        ctx,
        def,
        &input,
        &MutationEvent::BatchDeleted {
            deletion_count,
            deleted_ids: deleted_ids.clone(),
        },
    )?;

    Ok(IndexMap::from([
        ("deletion_count".to_owned(), PayloadValue::Scalar(CudValue::from(deletion_count))),
        ("deleted_ids".to_owned(), PayloadValue::Scalar(CudValue::List(deleted_ids))),
    ]))
}

fn record_ids(op: &Operation<'_>, records: &[Record]) -> CoreResult<Vec<CudValue>> {
    let model = op.model();

    records
        .iter()
        .map(|record| -> CoreResult<CudValue> { Ok(record.id(model)?.clone()) })
        .collect()
}

/// Deletes the records with the given primary keys. Returns the deletion count and the
/// exposed ids of the records.
async fn delete_records(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    raw_ids: Vec<CudValue>,
) -> CoreResult<(usize, Vec<CudValue>)> {
    if raw_ids.is_empty() {
        return Ok((0, Vec::new()));
    }

    let model = op.model();
    let deleted_ids = raw_ids.iter().map(|id| CudValue::String(op.encode_id(id))).collect();

    let filter = Filter::is_in(model.primary_key().name.clone(), raw_ids);
    let deletion_count = conn.delete_records(model, &filter).await?;

    tracing::debug!(deletion_count, "deleted records");

    Ok((deletion_count, deleted_ids))
}
