use super::{coerce_id_value, relations, Operation};
use crate::{CoreError, CoreResult, FieldBinding, ParsedInputMap, ParsedInputValue, RelationOperation};
use cud_connector::{ConnectionLike, WriteArgs};
use cud_models::{Field, Model, RelationField};
use cud_value::CudValue;
use futures::future::{BoxFuture, FutureExt};

/// An input turned into the values written to the record itself and the relation
/// changes applied once the record exists.
#[derive(Debug, Default)]
pub(crate) struct WritePlan {
    pub args: WriteArgs,
    pub relations: Vec<PendingRelation>,
}

#[derive(Debug, Clone)]
pub(crate) struct PendingRelation {
    pub field: RelationField,
    pub operation: RelationOperation,
    pub items: Vec<RelationItem>,
}

#[derive(Debug, Clone)]
pub(crate) enum RelationItem {
    Id(CudValue),
    Create { type_name: String, input: ParsedInputMap },
}

/// Builds the write plan of `input`, an instance of the input type `type_name`. Related
/// records given as nested inputs of foreign keys are created right away, since their
/// ids are written to the record. Top level fields pass through `handle_field`, nested
/// inputs run no hooks.
pub(crate) async fn prepare_write(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    type_name: &str,
    input: ParsedInputMap,
    top_level: bool,
) -> CoreResult<WritePlan> {
    let binding = op.input_binding(type_name)?;
    let model = binding.model.clone();
    let mut plan = WritePlan::default();

    for (source, value) in input {
        let value = if top_level {
            op.hooks().handle_field(op.ctx, op.def, &source, value)?
        } else {
            value
        };

        let field_binding = match binding.fields.get(&source) {
            Some(binding) => binding.clone(),
            None => implicit_binding(&model, &source)?,
        };

        match field_binding {
            FieldBinding::ItemId => (),

            FieldBinding::Scalar { field } => {
                let sf = model.find_scalar_field(&field)?;
                let value = value.into_value();

                let value = match value {
                    CudValue::Null => CudValue::Null,
                    value if sf.is_id => coerce_id_value(&model, value)?,
                    value => sf.type_identifier.coerce(value)?,
                };

                plan.args.insert(field, value);
            }

            FieldBinding::ForeignKey { field, nested } => {
                let rf = model.find_relation_field(&field)?;
                let related = op.schema.internal_data_model().related_model(rf)?;

                let id = match (value, nested) {
                    (ParsedInputValue::Map(input), Some(nested)) => {
                        create_nested(op, &mut *conn, nested, input, None).await?
                    }
                    (value, _) => match value.into_value() {
                        CudValue::Null => CudValue::Null,
                        value => coerce_id_value(&related, value)?,
                    },
                };

                plan.args.insert(field, id);
            }

            FieldBinding::Relation {
                field,
                operation,
                nested,
            } => {
                let rf = model.find_relation_field(&field)?.clone();
                let items = relation_items(op, &rf, value, nested.as_deref())?;

                plan.relations.push(PendingRelation {
                    field: rf,
                    operation,
                    items,
                });
            }

            FieldBinding::ReverseOneToOne { field, nested } => {
                let rf = model.find_relation_field(&field)?.clone();
                let items = relation_items(op, &rf, value, nested.as_deref())?;

                plan.relations.push(PendingRelation {
                    field: rf,
                    operation: RelationOperation::Exact,
                    items,
                });
            }
        }
    }

    Ok(plan)
}

/// Context values may target stored fields the input type leaves out.
fn implicit_binding(model: &Model, source: &str) -> CoreResult<FieldBinding> {
    match model.find_field(source) {
        Some(Field::Scalar(sf)) => Ok(FieldBinding::Scalar { field: sf.name.clone() }),
        Some(Field::Relation(rf)) if rf.is_inlined() => Ok(FieldBinding::ForeignKey {
            field: rf.name.clone(),
            nested: None,
        }),
        _ => Err(CoreError::input(format!(
            "`{}` cannot be written on {} records.",
            source, model.name
        ))),
    }
}

fn relation_items(
    op: &Operation<'_>,
    rf: &RelationField,
    value: ParsedInputValue,
    nested: Option<&str>,
) -> CoreResult<Vec<RelationItem>> {
    let related = op.schema.internal_data_model().related_model(rf)?;

    let values = match value {
        ParsedInputValue::List(values) => values,
        value if value.is_null() => Vec::new(),
        value => vec![value],
    };

    let mut items = Vec::with_capacity(values.len());

    for value in values {
        match (value, nested) {
            (ParsedInputValue::Map(input), Some(type_name)) => items.push(RelationItem::Create {
                type_name: type_name.to_owned(),
                input,
            }),
            (ParsedInputValue::Single(CudValue::Null), _) => (),
            (value, _) => items.push(RelationItem::Id(coerce_id_value(&related, value.into_value())?)),
        }
    }

    Ok(items)
}

/// Creates a record from a nested input and returns its id. `back_reference` sets the
/// field pointing at the record the nested input belongs to.
pub(crate) fn create_nested<'b>(
    op: &'b Operation<'_>,
    conn: &'b mut dyn ConnectionLike,
    type_name: String,
    input: ParsedInputMap,
    back_reference: Option<(String, CudValue)>,
) -> BoxFuture<'b, CoreResult<CudValue>> {
    async move {
        let model = op.input_binding(&type_name)?.model.clone();
        let mut plan = prepare_write(op, &mut *conn, &type_name, input, false).await?;

        if let Some((field, parent_id)) = back_reference {
            plan.args.insert(field, parent_id);
        }

        let record = conn.create_record(&model, plan.args).await?;
        let id = record.id(&model)?.clone();

        tracing::trace!(model = %model.name, id = %id, "created nested record");

        relations::apply_relations(op, &mut *conn, &model, &id, plan.relations).await?;

        Ok(id)
    }
    .boxed()
}
