use super::{
    write_args::{create_nested, PendingRelation, RelationItem},
    Operation,
};
use crate::{CoreError, CoreResult, RelationOperation};
use cud_connector::{ConnectionLike, Filter, WriteArgs};
use cud_models::{Model, RelationField};
use cud_value::CudValue;

/// Applies the relation changes of a write to the record `parent_id` of `model`.
pub(crate) async fn apply_relations(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    model: &Model,
    parent_id: &CudValue,
    relations: Vec<PendingRelation>,
) -> CoreResult<()> {
    for relation in relations {
        tracing::trace!(
            model = %model.name,
            field = %relation.field.name,
            operation = ?relation.operation,
            items = relation.items.len(),
            "applying relation operation"
        );

        if relation.field.kind.is_many_to_many() {
            apply_many_to_many(op, &mut *conn, parent_id, relation).await?;
        } else {
            apply_reverse(op, &mut *conn, parent_id, relation).await?;
        }
    }

    Ok(())
}

/// Many-to-many fields, in either direction. Nested records are created before they
/// are connected.
async fn apply_many_to_many(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    parent_id: &CudValue,
    relation: PendingRelation,
) -> CoreResult<()> {
    let PendingRelation { field, operation, items } = relation;
    let ids = resolve_items(op, &mut *conn, items, None).await?;

    match operation {
        RelationOperation::Add if !ids.is_empty() => conn.m2m_connect(&field, parent_id, &ids).await?,
        RelationOperation::Remove if !ids.is_empty() => conn.m2m_disconnect(&field, parent_id, &ids).await?,
        RelationOperation::Add | RelationOperation::Remove => (),

        RelationOperation::Exact => {
            let current = conn.get_related_m2m_record_ids(&field, parent_id).await?;

            let stale: Vec<CudValue> = current.iter().filter(|id| !ids.contains(id)).cloned().collect();
            let new: Vec<CudValue> = ids.iter().filter(|id| !current.contains(id)).cloned().collect();

            if !stale.is_empty() {
                conn.m2m_disconnect(&field, parent_id, &stale).await?;
            }

            if !new.is_empty() {
                conn.m2m_connect(&field, parent_id, &new).await?;
            }
        }
    }

    Ok(())
}

/// Reverse sides of foreign keys and one-to-ones: the related records store the parent id.
async fn apply_reverse(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    parent_id: &CudValue,
    relation: PendingRelation,
) -> CoreResult<()> {
    let PendingRelation { field, operation, items } = relation;

    let back = field.related_field.clone().ok_or_else(|| {
        CoreError::configuration(format!(
            "The relation {}.{} has no field on {} to write.",
            field.model, field.name, field.related_model
        ))
    })?;

    let child = op.schema.internal_data_model().related_model(&field)?;
    let pk = child.primary_key().name.clone();

    let ids = resolve_items(op, &mut *conn, items, Some((back.clone(), parent_id.clone()))).await?;
    let owned_by_parent = || Filter::equals(back.clone(), parent_id.clone());

    match operation {
        RelationOperation::Add => attach(conn, &child, &back, parent_id, ids).await,
        RelationOperation::Remove if ids.is_empty() => Ok(()),
        RelationOperation::Remove => {
            let filter = owned_by_parent().merge(Filter::is_in(pk, ids));
            detach(conn, &child, &back, &filter).await
        }
        RelationOperation::Exact => {
            let others = if ids.is_empty() {
                owned_by_parent()
            } else {
                owned_by_parent().merge(Filter::not(vec![Filter::is_in(pk, ids.clone())]))
            };

            detach(&mut *conn, &child, &back, &others).await?;
            attach(conn, &child, &back, parent_id, ids).await
        }
    }
}

/// Ids of the related records, creating the nested ones.
async fn resolve_items(
    op: &Operation<'_>,
    conn: &mut dyn ConnectionLike,
    items: Vec<RelationItem>,
    back_reference: Option<(String, CudValue)>,
) -> CoreResult<Vec<CudValue>> {
    let mut ids = Vec::with_capacity(items.len());

    for item in items {
        let id = match item {
            RelationItem::Id(id) => id,
            RelationItem::Create { type_name, input } => {
                create_nested(op, &mut *conn, type_name, input, back_reference.clone()).await?
            }
        };

        ids.push(id);
    }

    Ok(ids)
}

async fn attach(
    conn: &mut dyn ConnectionLike,
    child: &Model,
    back: &str,
    parent_id: &CudValue,
    ids: Vec<CudValue>,
) -> CoreResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut args = WriteArgs::new();
    args.insert(back, parent_id.clone());

    let filter = Filter::is_in(child.primary_key().name.clone(), ids);
    conn.update_records(child, &filter, args).await?;

    Ok(())
}

/// Unlinks the matching children: their foreign key is cleared when it is nullable,
/// otherwise they are deleted.
async fn detach(conn: &mut dyn ConnectionLike, child: &Model, back: &str, filter: &Filter) -> CoreResult<()> {
    let fk: &RelationField = child.find_relation_field(back)?;

    if fk.is_nullable {
        let mut args = WriteArgs::new();
        args.insert(back, CudValue::Null);

        conn.update_records(child, filter, args).await?;
    } else {
        let deleted = conn.delete_records(child, filter).await?;
        tracing::debug!(model = %child.name, deleted, "deleted detached records");
    }

    Ok(())
}
