#![allow(dead_code)]

use cud_connector::Filter;
use cud_core::{
    CoreResult, CudSchema, MutationContext, MutationDefinition, MutationEvent, MutationExecutor, MutationHooks,
    MutationInput, PayloadValue, SaveTarget, SchemaBuilder,
};
use cud_models::{convert, CudValue, InternalDataModelRef, Record};
use memory_connector::InMemoryConnector;
use serde_json::{json, Value as JsonValue};
use parking_lot::Mutex;
use std::sync::Arc;

pub fn datamodel() -> InternalDataModelRef {
    convert(
        r#"{
          "models": [
            {
              "name": "User",
              "fields": [{ "name": "username", "type": "String", "unique": true }]
            },
            {
              "name": "Cat",
              "fields": [
                { "name": "name", "type": "String" },
                { "name": "owner", "type": "ForeignKey", "to": "User", "relatedName": "cats" },
                { "name": "enemies", "type": "ManyToMany", "to": "Dog", "relatedName": "enemies" }
              ]
            },
            {
              "name": "Dog",
              "fields": [
                { "name": "name", "type": "String" },
                {
                  "name": "walker",
                  "type": "ForeignKey",
                  "to": "User",
                  "relatedName": "walked_dogs",
                  "null": true,
                  "onDelete": "SET_NULL"
                }
              ]
            }
          ]
        }"#,
    )
    .unwrap()
}

/// jon (1) owns Garfield (1), liz (2) owns Nermal (2). jon walks Odie (1), Rex (2) has no
/// walker. Garfield's enemy is Odie.
pub fn seeded_connector() -> Arc<InMemoryConnector> {
    let connector = InMemoryConnector::new(datamodel());

    connector
        .seed(&json!({
            "User": [{ "username": "jon" }, { "username": "liz" }],
            "Dog": [{ "name": "Odie", "walker": 1 }, { "name": "Rex" }],
            "Cat": [
                { "name": "Garfield", "owner": 1, "enemies": [1] },
                { "name": "Nermal", "owner": 2 }
            ]
        }))
        .unwrap();

    Arc::new(connector)
}

/// A schema builder with an object type per model.
pub fn builder(connector: &InMemoryConnector) -> SchemaBuilder {
    builder_with_types(connector, &["User", "Cat", "Dog"])
}

pub fn builder_with_types(connector: &InMemoryConnector, models: &[&str]) -> SchemaBuilder {
    let mut builder = SchemaBuilder::new(connector.datamodel().clone());

    for model in models {
        builder.register_type(cud_core::ModelTypeOptions::new(*model)).unwrap();
    }

    builder
}

pub fn executor(schema: CudSchema, connector: &Arc<InMemoryConnector>) -> MutationExecutor {
    MutationExecutor::new(Arc::new(schema), connector.clone())
}

/// Arguments of a mutation from a JSON object.
pub fn args(value: JsonValue) -> indexmap::IndexMap<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map.into_iter().collect(),
        other => panic!("arguments must be an object, got {other}"),
    }
}

pub fn names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get("name").or_else(|| r.get("username")).unwrap().to_string())
        .collect()
}

pub fn scalar(value: Option<&PayloadValue>) -> CudValue {
    value.and_then(PayloadValue::as_scalar).cloned().unwrap()
}

pub fn single_record(value: Option<&PayloadValue>) -> Record {
    match value {
        Some(PayloadValue::Record(Some(record))) => record.clone(),
        other => panic!("expected a record, got {other:?}"),
    }
}

pub fn record_list(value: Option<&PayloadValue>) -> Vec<Record> {
    match value {
        Some(PayloadValue::Records(records)) => records.clone(),
        other => panic!("expected records, got {other:?}"),
    }
}

pub fn id_strings(value: CudValue) -> Vec<String> {
    value
        .into_list()
        .unwrap()
        .into_iter()
        .map(|id| id.to_id_string())
        .collect()
}

/// Hooks writing down the lifecycle steps they see.
#[derive(Default)]
pub struct RecordingHooks {
    pub steps: Mutex<Vec<String>>,
    /// Scope mutations to records owned by the caller.
    pub owner_scope: bool,
    /// Delete this record instead of the requested one.
    pub swap_deleted_for: Option<i64>,
}

impl RecordingHooks {
    pub fn steps(&self) -> Vec<String> {
        self.steps.lock().clone()
    }

    fn push(&self, step: impl Into<String>) {
        self.steps.lock().push(step.into());
    }
}

impl MutationHooks for RecordingHooks {
    fn before_mutate(
        &self,
        _ctx: &MutationContext,
        _def: &MutationDefinition,
        input: MutationInput,
    ) -> CoreResult<MutationInput> {
        self.push("before_mutate");
        Ok(input)
    }

    fn get_permissions(&self, _ctx: &MutationContext, def: &MutationDefinition, _input: &MutationInput) -> Vec<String> {
        self.push("check_permissions");
        def.options.permissions.clone()
    }

    fn validate(&self, _ctx: &MutationContext, _def: &MutationDefinition, _input: &MutationInput) -> CoreResult<()> {
        self.push("validate");
        Ok(())
    }

    fn scope_filter(&self, ctx: &MutationContext, _def: &MutationDefinition) -> Filter {
        match (self.owner_scope, ctx.value("user")) {
            (true, Some(user)) => Filter::equals("owner", user),
            _ => Filter::empty(),
        }
    }

    fn before_save(&self, _ctx: &MutationContext, def: &MutationDefinition, target: SaveTarget) -> CoreResult<SaveTarget> {
        self.push("before_save");

        match (target, self.swap_deleted_for) {
            (SaveTarget::Delete(mut record), Some(id)) => {
                record.set(&def.model.primary_key().name, CudValue::Int(id));
                Ok(SaveTarget::Delete(record))
            }
            (target, _) => Ok(target),
        }
    }

    fn after_mutate(
        &self,
        _ctx: &MutationContext,
        _def: &MutationDefinition,
        _input: &MutationInput,
        event: &MutationEvent,
    ) -> CoreResult<()> {
        match event {
            MutationEvent::Deleted { found, .. } => self.push(format!("after_mutate(found: {found})")),
            _ => self.push("after_mutate"),
        }

        Ok(())
    }
}
