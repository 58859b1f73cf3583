use super::{
    coerce_id, relations::apply_relations, take_id, take_list, take_map, unexpected_input, write_args::prepare_write,
    Operation, Payload, PayloadValue,
};
use crate::{
    CoreError, CoreResult, FieldBinding, InputBinding, MutationEvent, MutationInput, ParsedInputMap, SaveTarget,
};
use cud_connector::{ConnectionLike, Filter};
use cud_models::Record;
use cud_value::CudValue;
use indexmap::IndexMap;

/// Updates the record behind `id`. Update and patch mutations share the lifecycle, they
/// differ in the requiredness of their input fields only.
#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn update_one(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());

    let input = MutationInput::Update {
        id: take_id(&mut args, "id")?,
        input: take_map(&mut args, "input")?,
    };

    let mut input = hooks.before_mutate(ctx, def, input)?;

    let id = match &input {
        MutationInput::Update { id, .. } => id.clone(),
        _ => return Err(unexpected_input("update")),
    };

    op.ensure_login()?;

    let record = fetch_in_scope(op, &mut *conn, &id).await?;

    hooks.check_permissions(ctx, def, &input, Some(&record))?;
    op.apply_auto_context(&mut input);
    hooks.validate(ctx, def, &input)?;

    let MutationInput::Update { input: data, .. } = &input else {
        return Err(unexpected_input("update"));
    };

    let updated = update_record(op, conn, record, data.clone()).await?;

    hooks.after_mutate(ctx, def, &input, &MutationEvent::Updated(updated.clone()))?;

    Ok(IndexMap::from([(
        def.options.return_field_name(),
        PayloadValue::Record(Some(updated)),
    )]))
}

/// Updates one record per item, each item naming its record with `id`.
#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn update_many(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());

    let items = take_list(&mut args, "input")?
        .into_iter()
        .map(|item| item.into_map().ok_or_else(|| CoreError::input("Batch items must be input objects.")))
        .collect::<CoreResult<Vec<_>>>()?;

    let mut input = hooks.before_mutate(ctx, def, MutationInput::BatchUpdate { input: items })?;

    op.ensure_login()?;
    hooks.check_permissions(ctx, def, &input, None)?;
    op.apply_auto_context(&mut input);
    hooks.validate(ctx, def, &input)?;

    let MutationInput::BatchUpdate { input: items } = &input else {
        return Err(unexpected_input("batch update"));
    };

    let binding = op.input_binding(op.input_type()?)?;
    let mut records = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let record = update_item(op, &mut *conn, binding, item.clone())
            .await
            .map_err(|err| err.in_batch(idx))?;

        records.push(record);
    }

    hooks.after_mutate(ctx, def, &input, &MutationEvent::BatchUpdated(records.clone()))?;

    Ok(IndexMap::from([(
        def.options.return_field_name(),
        PayloadValue::Records(records),
    )]))
}

async fn update_item(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    binding: &InputBinding,
    mut item: ParsedInputMap,
) -> CoreResult<Record> {
    let id = item_id(op, binding, &mut item)?;
    let record = fetch_in_scope(op, &mut *conn, &id).await?;

    update_record(op, conn, record, item).await
}

/// The id of a batch update item: the `id` field, or the primary key when the input
/// exposes it under that name.
fn item_id(op: &Operation<'_>, binding: &InputBinding, item: &mut ParsedInputMap) -> CoreResult<String> {
    let id_field = binding
        .fields
        .iter()
        .find(|(_, field)| **field == FieldBinding::ItemId)
        .map(|(source, _)| source.clone());

    let value = match id_field {
        Some(source) => item.shift_remove(&source),
        None => item.get(&op.model().primary_key().name).cloned(),
    };

    match value.map(|v| v.into_value()) {
        Some(CudValue::String(id)) => Ok(id),
        Some(value) if !value.is_null() => Ok(value.to_id_string()),
        _ => Err(CoreError::MissingRequiredValue { path: "id".to_owned() }),
    }
}

/// The record behind `id` within the scope filter.
pub(crate) async fn fetch_in_scope(op: &Operation<'_>, conn: &mut dyn ConnectionLike, id: &str) -> CoreResult<Record> {
    let model = op.model();
    let raw_id = coerce_id(model, id)?;
    let filter = op.scope().merge(Filter::equals(model.primary_key().name.clone(), raw_id));

    conn.get_single_record(model, &filter)
        .await?
        .ok_or_else(|| CoreError::RecordNotFound {
            model: model.name.clone(),
            id: id.to_owned(),
        })
}

/// Writes an update input to `record`: `before_save`, the stored fields, then relations.
pub(crate) async fn update_record(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    record: Record,
    data: ParsedInputMap,
) -> CoreResult<Record> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());
    let model = op.model();
    let pk = model.primary_key().name.clone();

    let plan = prepare_write(op, &mut *conn, op.input_type()?, data, true).await?;

    let (record, args) = match hooks.before_save(ctx, def, SaveTarget::Update { record, args: plan.args })? {
        SaveTarget::Update { record, args } => (record, args),
        other => return Err(SaveTarget::mismatch("update", &other)),
    };

    let updated = if args.is_empty() {
        record
    } else {
        let id = record.id(model)?.clone();

        conn.update_records(model, &Filter::equals(pk, id.clone()), args)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::RecordNotFound {
                model: model.name.clone(),
                id: id.to_id_string(),
            })?
    };

    let id = updated.id(model)?.clone();

    tracing::debug!(model = %model.name, id = %id, "updated record");

    apply_relations(op, &mut *conn, model, &id, plan.relations).await?;

    Ok(updated)
}
