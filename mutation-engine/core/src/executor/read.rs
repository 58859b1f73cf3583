use super::{coerce_id, MutationExecutor};
use crate::{global_id::from_global_id, CoreError, CoreResult};
use cud_connector::{ConnectionLike, Filter};
use cud_models::{Model, Record, RelationKind};
use cud_value::CudValue;

/// Records reached through a relation field.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationValue {
    One(Option<Record>),
    Many(Vec<Record>),
}

impl MutationExecutor {
    /// The record of `model` behind `id`, a raw or global id.
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, model: &str, id: &str) -> CoreResult<Option<Record>> {
        let model = self.schema.internal_data_model().find_model(model)?;
        let raw_id = coerce_id(&model, id)?;
        let mut conn = self.connector.get_connection().await?;

        find_by_id(conn.as_mut(), &model, raw_id).await
    }

    /// Resolves a global id to the name of its object type and the record. Ids of unknown
    /// types, or of types without global ids, resolve to nothing.
    #[tracing::instrument(skip(self))]
    pub async fn node(&self, global_id: &str) -> CoreResult<Option<(String, Record)>> {
        let Some((type_name, raw)) = from_global_id(global_id) else {
            return Ok(None);
        };

        let Some(typ) = self.schema.registry().get_type(&type_name).filter(|t| t.global_id) else {
            return Ok(None);
        };

        let model = typ.model.clone();

        let Ok(raw_id) = model.primary_key().type_identifier.coerce(CudValue::String(raw)) else {
            return Ok(None);
        };

        let mut conn = self.connector.get_connection().await?;
        let record = find_by_id(conn.as_mut(), &model, raw_id).await?;

        Ok(record.map(|record| (type_name, record)))
    }

    /// Reads the records `record` of `model` is connected to through `field`.
    #[tracing::instrument(skip(self, record))]
    pub async fn read_relation(&self, model: &str, record: &Record, field: &str) -> CoreResult<RelationValue> {
        let internal_data_model = self.schema.internal_data_model();
        let model = internal_data_model.find_model(model)?;
        let rf = model.find_relation_field(field)?;
        let related = internal_data_model.related_model(rf)?;
        let related_pk = related.primary_key().name.clone();

        let mut conn = self.connector.get_connection().await?;
        let conn = conn.as_mut();

        let back_reference = || {
            rf.related_field.clone().ok_or_else(|| {
                CoreError::configuration(format!("The relation {}.{} has no opposite field.", model.name, rf.name))
            })
        };

        let value = match rf.kind {
            RelationKind::ForeignKey | RelationKind::OneToOne => match record.get_or_null(&rf.name) {
                CudValue::Null => RelationValue::One(None),
                id => RelationValue::One(find_by_id(conn, &related, id).await?),
            },

            RelationKind::OneToOneRel => {
                let filter = Filter::equals(back_reference()?, record.id(&model)?.clone());
                RelationValue::One(conn.get_single_record(&related, &filter).await?)
            }

            RelationKind::ManyToOneRel => {
                let filter = Filter::equals(back_reference()?, record.id(&model)?.clone());
                RelationValue::Many(conn.get_many_records(&related, &filter).await?)
            }

            RelationKind::ManyToMany | RelationKind::ManyToManyRel => {
                let ids = conn.get_related_m2m_record_ids(rf, record.id(&model)?).await?;

                if ids.is_empty() {
                    RelationValue::Many(Vec::new())
                } else {
                    RelationValue::Many(conn.get_many_records(&related, &Filter::is_in(related_pk, ids)).await?)
                }
            }
        };

        Ok(value)
    }
}

async fn find_by_id(conn: &mut dyn ConnectionLike, model: &Model, id: CudValue) -> CoreResult<Option<Record>> {
    let filter = Filter::equals(model.primary_key().name.clone(), id);

    Ok(conn.get_single_record(model, &filter).await?)
}
