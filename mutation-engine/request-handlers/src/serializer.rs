//! Shapes mutation payloads and records into the JSON the selection asks for.

use crate::{HandlerError, Result, Selection};
use cud_core::{to_global_id, CoreError, MutationExecutor, MutationResult, PayloadValue, RelationValue};
use cud_models::Record;
use cud_schema::{ObjectType, QuerySchema, TypeRef};
use cud_value::CudValue;
use futures::future::{BoxFuture, FutureExt};
use serde_json::{Map, Value as JsonValue};

const TYPENAME: &str = "__typename";

pub(crate) struct Serializer<'a> {
    executor: &'a MutationExecutor,
}

impl<'a> Serializer<'a> {
    pub(crate) fn new(executor: &'a MutationExecutor) -> Self {
        Serializer { executor }
    }

    fn query_schema(&self) -> &'a QuerySchema {
        self.executor.schema().query_schema()
    }

    fn object_type(&self, name: &str) -> Result<&'a ObjectType> {
        self.query_schema()
            .object(name)
            .ok_or_else(|| HandlerError::Serialization(format!("Object type `{name}` is not part of the schema.")))
    }

    pub(crate) async fn serialize_mutation(&self, result: &MutationResult, selections: &[Selection]) -> Result<JsonValue> {
        let object = self.object_type(&result.payload_type)?;
        let mut map = Map::new();

        for selection in selections.iter().filter(|s| s.applies_to(&result.payload_type, &object.interfaces)) {
            if selection.name == TYPENAME {
                map.insert(selection.response_key().to_owned(), JsonValue::from(object.name()));
                continue;
            }

            let field = object
                .find_field(&selection.name)
                .ok_or_else(|| unknown_field(&selection.name, &result.payload_type))?;

            let value = match result.get(field.source()) {
                None | Some(PayloadValue::Record(None)) => JsonValue::Null,
                Some(PayloadValue::Scalar(value)) => self.serialize_scalar(value, &field.field_type)?,
                Some(PayloadValue::Record(Some(record))) => {
                    self.serialize_record(field.field_type.named_type(), record, &selection.nested)
                        .await?
                }
                Some(PayloadValue::Records(records)) => {
                    let mut items = Vec::with_capacity(records.len());

                    for record in records {
                        items.push(
                            self.serialize_record(field.field_type.named_type(), record, &selection.nested)
                                .await?,
                        );
                    }

                    JsonValue::Array(items)
                }
            };

            map.insert(selection.response_key().to_owned(), value);
        }

        Ok(JsonValue::Object(map))
    }

    /// Serializes a record as an object of type `type_name`. Relation fields are read
    /// from the connector as the selection reaches them.
    pub(crate) fn serialize_record<'b>(
        &'b self,
        type_name: &'b str,
        record: &'b Record,
        selections: &'b [Selection],
    ) -> BoxFuture<'b, Result<JsonValue>> {
        async move {
            let object = self.object_type(type_name)?;
            let model = object
                .model
                .as_deref()
                .ok_or_else(|| HandlerError::Serialization(format!("`{type_name}` does not represent a model.")))?;

            let internal_data_model = self.executor.schema().internal_data_model();
            let model_ref = internal_data_model.find_model(model).map_err(CoreError::from)?;
            let global_id = self
                .executor
                .schema()
                .registry()
                .get_type(type_name)
                .map(|t| t.global_id)
                .unwrap_or(false);

            let mut map = Map::new();

            for selection in selections.iter().filter(|s| s.applies_to(type_name, &object.interfaces)) {
                if selection.name == TYPENAME {
                    map.insert(selection.response_key().to_owned(), JsonValue::from(type_name));
                    continue;
                }

                let field = object
                    .find_field(&selection.name)
                    .ok_or_else(|| unknown_field(&selection.name, type_name))?;
                let source = field.source();

                let value = if global_id && field.name == "id" && source == model_ref.primary_key().name {
                    match record.get_or_null(source) {
                        CudValue::Null => JsonValue::Null,
                        raw => JsonValue::String(to_global_id(type_name, &raw.to_id_string())),
                    }
                } else if model_ref.find_relation_field(source).is_ok() {
                    let related_type = field.field_type.named_type();

                    match self.executor.read_relation(model, record, source).await? {
                        RelationValue::One(None) => JsonValue::Null,
                        RelationValue::One(Some(related)) => {
                            self.serialize_record(related_type, &related, &selection.nested).await?
                        }
                        RelationValue::Many(related) => {
                            let mut items = Vec::with_capacity(related.len());

                            for related in &related {
                                items.push(self.serialize_record(related_type, related, &selection.nested).await?);
                            }

                            JsonValue::Array(items)
                        }
                    }
                } else {
                    self.serialize_scalar(&record.get_or_null(source), &field.field_type)?
                };

                map.insert(selection.response_key().to_owned(), value);
            }

            Ok(JsonValue::Object(map))
        }
        .boxed()
    }

    fn serialize_scalar(&self, value: &CudValue, type_ref: &TypeRef) -> Result<JsonValue> {
        let named = type_ref.named_type();

        match value {
            CudValue::Null => Ok(JsonValue::Null),

            CudValue::List(items) => {
                let item_type = type_ref.list_item().unwrap_or(type_ref);

                items
                    .iter()
                    .map(|item| self.serialize_scalar(item, item_type))
                    .collect::<Result<Vec<_>>>()
                    .map(JsonValue::Array)
            }

            value if named == "ID" => Ok(JsonValue::String(value.to_id_string())),

            value => match self.query_schema().enum_type(named).and_then(|e| e.name_for(value)) {
                Some(name) => Ok(JsonValue::String(name.to_owned())),
                None => Ok(serde_json::to_value(value)?),
            },
        }
    }
}

fn unknown_field(field_name: &str, type_name: &str) -> HandlerError {
    HandlerError::Core(CoreError::UnknownField {
        field_name: field_name.to_owned(),
        type_name: type_name.to_owned(),
    })
}
