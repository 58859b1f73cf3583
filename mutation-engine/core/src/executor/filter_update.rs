use super::{
    filter, relations::apply_relations, take_map, unexpected_input, write_args::prepare_write, Operation, Payload,
    PayloadValue,
};
use crate::{CoreError, CoreResult, MutationEvent, MutationInput, ParsedInputMap, SaveTarget};
use cud_connector::{ConnectionLike, Filter};
use cud_models::Record;
use cud_value::CudValue;
use indexmap::IndexMap;

/// Writes `data` to every record in scope matching `filter`. Relation changes of the
/// data input apply to each updated record.
#[tracing::instrument(skip_all, fields(mutation = %op.def.field_name))]
pub(crate) async fn update_filtered(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    mut args: ParsedInputMap,
) -> CoreResult<Payload> {
    let (ctx, def, hooks) = (op.ctx, op.def, op.hooks());
    let model = op.model();

    let input = MutationInput::FilterUpdate {
        filter: take_map(&mut args, "filter")?,
        data: take_map(&mut args, "data")?,
    };

    let mut input = hooks.before_mutate(ctx, def, input)?;

    op.ensure_login()?;
    hooks.check_permissions(ctx, def, &input, None)?;
    op.apply_auto_context(&mut input);
    hooks.validate(ctx, def, &input)?;

    let MutationInput::FilterUpdate {
        filter: filter_input,
        data,
    } = &input
    else {
        return Err(unexpected_input("filter update"));
    };

    let binding = def
        .filter_type
        .as_deref()
        .and_then(|name| op.schema.filter_binding(name))
        .ok_or_else(|| CoreError::configuration(format!("The mutation {} has no filter input.", def.field_name)))?;

    let filter = filter::build_filter(op.schema.internal_data_model(), binding, filter_input)?;
    let records = conn.get_many_records(model, &op.scope().merge(filter)).await?;

    tracing::debug!(matched = records.len(), "records matching the filter");

    let plan = prepare_write(op, &mut *conn, op.input_type()?, data.clone(), true).await?;

    let (records, args) = match hooks.before_save(
        ctx,
        def,
        SaveTarget::UpdateMany {
            records,
            args: plan.args,
        },
    )? {
        SaveTarget::UpdateMany { records, args } => (records, args),
        other => return Err(SaveTarget::mismatch("filter update", &other)),
    };

    let ids = records
        .iter()
        .map(|record| -> CoreResult<CudValue> { Ok(record.id(model)?.clone()) })
        .collect::<CoreResult<Vec<_>>>()?;

    let updated: Vec<Record> = if ids.is_empty() || args.is_empty() {
        records
    } else {
        let filter = Filter::is_in(model.primary_key().name.clone(), ids);
        conn.update_records(model, &filter, args).await?
    };

    if !plan.relations.is_empty() {
        for record in &updated {
            let id = record.id(model)?.clone();
            apply_relations(op, &mut *conn, model, &id, plan.relations.clone()).await?;
        }
    }

    tracing::debug!(updated = updated.len(), "updated records");

    hooks.after_mutate(ctx, def, &input, &MutationEvent::FilterUpdated(updated.clone()))?;

    Ok(IndexMap::from([
        ("updated_count".to_owned(), PayloadValue::Scalar(CudValue::from(updated.len()))),
        ("updated_objects".to_owned(), PayloadValue::Records(updated)),
    ]))
}
