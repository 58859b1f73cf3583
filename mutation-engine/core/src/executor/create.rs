use super::{
    relations::apply_relations, take_list, take_map, unexpected_input, write_args::prepare_write, Operation,
    Payload, PayloadValue,
};
use crate::{CoreError, CoreResult, MutationEvent, MutationInput, ParsedInputMap, SaveTarget};
use cud_connector::ConnectionLike;
use cud_models::Record;
use indexmap::IndexMap;

#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn create_one(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());

    let input = MutationInput::Create {
        input: take_map(&mut args, "input")?,
    };

    let mut input = hooks.before_mutate(ctx, def, input)?;

    op.ensure_login()?;
    hooks.check_permissions(ctx, def, &input, None)?;
    op.apply_auto_context(&mut input);
    hooks.validate(ctx, def, &input)?;

    let MutationInput::Create { input: data } = &input else {
        return Err(unexpected_input("create"));
    };

    let record = create_record(op, conn, data.clone()).await?;

    hooks.after_mutate(ctx, def, &input, &MutationEvent::Created(record.clone()))?;

    Ok(IndexMap::from([(
        def.options.return_field_name(),
        PayloadValue::Record(Some(record)),
    )]))
}

/// Creates one record per item. Checks run once for the whole list, errors carry the
/// index of the failing item.
#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn create_many(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());

    let items = take_list(&mut args, "input")?
        .into_iter()
        .map(|item| item.into_map().ok_or_else(|| CoreError::input("Batch items must be input objects.")))
        .collect::<CoreResult<Vec<_>>>()?;

    let mut input = hooks.before_mutate(ctx, def, MutationInput::BatchCreate { input: items })?;

    op.ensure_login()?;
    hooks.check_permissions(ctx, def, &input, None)?;
    op.apply_auto_context(&mut input);
    hooks.validate(ctx, def, &input)?;

    let MutationInput::BatchCreate { input: items } = &input else {
        return Err(unexpected_input("batch create"));
    };

    let mut records = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let record = create_record(op, &mut *conn, item.clone())
            .await
            .map_err(|err| err.in_batch(idx))?;

        records.push(record);
    }

    hooks.after_mutate(ctx, def, &input, &MutationEvent::BatchCreated(records.clone()))?;

    Ok(IndexMap::from([(
        def.options.return_field_name(),
        PayloadValue::Records(records),
    )]))
}

/// Writes one create input: nested foreign key records, `before_save`, the record itself
/// and its relations.
async fn create_record(op: &Operation<'_>, conn: &mut dyn ConnectionLike, data: ParsedInputMap) -> CoreResult<Record> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());
    let model = op.model();

    let plan = prepare_write(op, &mut *conn, op.input_type()?, data, true).await?;

    let args = match hooks.before_save(ctx, def, SaveTarget::Create(plan.args))? {
        SaveTarget::Create(args) => args,
        other => return Err(SaveTarget::mismatch("create", &other)),
    };

    let record = conn.create_record(model, args).await?;
    let id = record.id(model)?.clone();

    tracing::debug!(model = %model.name, id = %id, "created record");

    apply_relations(op, &mut *conn, model, &id, plan.relations).await?;

    Ok(record)
}
