use crate::{operations::write, store::Store};
use cud_connector::{
    error::{ConnectorError, ErrorKind},
    WriteArgs,
};
use cud_models::{DomainError, Field, InternalDataModel, RelationKind};
use cud_value::CudValue;

pub(crate) fn seed(store: &mut Store, datamodel: &InternalDataModel, data: &serde_json::Value) -> cud_connector::Result<()> {
    let Some(models) = data.as_object() else {
        return Err(conversion_error("The seed document must be an object keyed by model name."));
    };

    let mut connections = Vec::new();

    for (model_name, rows) in models {
        let model = datamodel.find_model(model_name)?;
        let Some(rows) = rows.as_array() else {
            return Err(conversion_error(format!("The seed rows of `{model_name}` must be a list.")));
        };

        for row in rows {
            let Some(row) = row.as_object() else {
                return Err(conversion_error(format!("Seed rows of `{model_name}` must be objects.")));
            };

            let mut args = WriteArgs::new();
            let mut pending = Vec::new();

            for (name, value) in row {
                let value = CudValue::try_from(value.clone())
                    .map_err(|err| ConnectorError::from_kind(ErrorKind::ConversionError(err.into())))?;

                match model.field(name)? {
                    Field::Scalar(sf) => args.insert(name.clone(), sf.type_identifier.coerce(value)?),
                    Field::Relation(rf) if rf.is_inlined() => {
                        let related = datamodel.related_model(rf)?;
                        args.insert(name.clone(), related.primary_key().type_identifier.coerce(value)?);
                    }
                    Field::Relation(rf) if rf.kind == RelationKind::ManyToMany => {
                        let related = datamodel.related_model(rf)?;
                        let ids = related.primary_key().type_identifier.coerce(value)?;
                        pending.push((rf.clone(), ids.into_list().unwrap_or_default()));
                    }
                    Field::Relation(_) => {
                        return Err(ConnectorError::from(DomainError::UnexpectedFieldKind {
                            name: name.clone(),
                            model: model.name.clone(),
                            expected: "stored or many-to-many field",
                        }))
                    }
                }
            }

            let record = write::create_record(store, datamodel, &model, args)?;
            let id = record.id(&model)?.clone();

            connections.extend(pending.into_iter().map(|(field, ids)| (field, id.clone(), ids)));
        }

        tracing::debug!(model = %model_name, rows = rows.len(), "seeded records");
    }

    for (field, parent_id, child_ids) in connections {
        write::m2m_connect(store, datamodel, &field, &parent_id, &child_ids)?;
    }

    Ok(())
}

fn conversion_error(message: impl Into<String>) -> ConnectorError {
    ConnectorError::from_kind(ErrorKind::ConversionError(anyhow::anyhow!(message.into())))
}
