//! Interprets mutation definitions against a connector.
//!
//! Every mutation runs on one connection, taken from the connector when the request
//! starts. Connector calls are awaited one after another. Hooks are invoked at the
//! points documented on each operation.

mod create;
mod delete;
mod filter;
mod filter_update;
mod read;
mod relations;
mod update;
mod write_args;

pub use read::RelationValue;

use crate::{
    global_id::{disambiguate_id, to_global_id},
    query_document::ArgumentParser,
    CoreError, CoreResult, CudSchema, InputBinding, MutationContext, MutationDefinition, MutationHooks, MutationInput,
    MutationKind, ParsedInputMap, ParsedInputValue,
};
use cud_connector::{Connector, Filter};
use cud_models::{Model, ModelRef, Record};
use cud_value::CudValue;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Payload entries keyed by source name, e.g. `deleted_raw_id` or the return field name.
pub type Payload = IndexMap<String, PayloadValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Scalar(CudValue),
    Record(Option<Record>),
    Records(Vec<Record>),
}

impl PayloadValue {
    pub fn as_scalar(&self) -> Option<&CudValue> {
        match self {
            PayloadValue::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl From<CudValue> for PayloadValue {
    fn from(value: CudValue) -> Self {
        PayloadValue::Scalar(value)
    }
}

/// The outcome of a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Name of the payload object type.
    pub payload_type: String,
    /// Model of the records in the payload.
    pub model: ModelRef,
    pub payload: Payload,
}

impl MutationResult {
    pub fn get(&self, source_name: &str) -> Option<&PayloadValue> {
        self.payload.get(source_name)
    }
}

pub struct MutationExecutor {
    schema: Arc<CudSchema>,
    connector: Arc<dyn Connector>,
}

impl MutationExecutor {
    pub fn new(schema: Arc<CudSchema>, connector: Arc<dyn Connector>) -> Self {
        MutationExecutor { schema, connector }
    }

    pub fn schema(&self) -> &Arc<CudSchema> {
        &self.schema
    }

    pub fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    /// Runs the mutation behind the root field `field_name` with JSON arguments keyed by
    /// argument name.
    #[tracing::instrument(skip(self, args, ctx))]
    pub async fn execute(
        &self,
        field_name: &str,
        args: IndexMap<String, JsonValue>,
        ctx: &MutationContext,
    ) -> CoreResult<MutationResult> {
        let unknown = || CoreError::UnknownField {
            field_name: field_name.to_owned(),
            type_name: "Mutation".to_owned(),
        };

        let def = self.schema.mutation(field_name).ok_or_else(unknown)?;
        let field = self
            .schema
            .query_schema()
            .find_mutation_field(field_name)
            .ok_or_else(unknown)?;

        let args = ArgumentParser::new(self.schema.query_schema()).parse_arguments(field, args)?;

        let op = Operation {
            schema: &self.schema,
            def,
            ctx,
        };

        let mut conn = self.connector.get_connection().await?;
        let conn = conn.as_mut();

        tracing::debug!(kind = ?def.options.kind, model = %def.model.name, "executing mutation");

        let payload = match def.options.kind {
            MutationKind::Create => create::create_one(&op, conn, args).await?,
            MutationKind::BatchCreate => create::create_many(&op, conn, args).await?,
            MutationKind::Update | MutationKind::Patch => update::update_one(&op, conn, args).await?,
            MutationKind::BatchUpdate | MutationKind::BatchPatch => update::update_many(&op, conn, args).await?,
            MutationKind::Delete => delete::delete_one(&op, conn, args).await?,
            MutationKind::BatchDelete => delete::delete_many(&op, conn, args).await?,
            MutationKind::FilterDelete => delete::delete_filtered(&op, conn, args).await?,
            MutationKind::FilterUpdate => filter_update::update_filtered(&op, conn, args).await?,
        };

        Ok(MutationResult {
            payload_type: def.payload_name.clone(),
            model: def.model.clone(),
            payload,
        })
    }
}

/// One running mutation: its definition and the request context.
pub(crate) struct Operation<'a> {
    pub schema: &'a CudSchema,
    pub def: &'a MutationDefinition,
    pub ctx: &'a MutationContext,
}

impl<'a> Operation<'a> {
    pub fn hooks(&self) -> &'a dyn MutationHooks {
        self.def.hooks.as_ref()
    }

    pub fn model(&self) -> &'a ModelRef {
        &self.def.model
    }

    pub fn ensure_login(&self) -> CoreResult<()> {
        if self.def.options.login_required() && !self.ctx.is_authenticated() {
            tracing::warn!(mutation = %self.def.field_name, "rejected unauthenticated request");
            return Err(CoreError::LoginRequired);
        }

        Ok(())
    }

    /// The rows the mutation may act on.
    pub fn scope(&self) -> Filter {
        self.hooks().scope_filter(self.ctx, self.def)
    }

    pub fn input_type(&self) -> CoreResult<&'a str> {
        self.def.input_type.as_deref().ok_or_else(|| {
            CoreError::configuration(format!("The mutation {} has no input type.", self.def.field_name))
        })
    }

    pub fn input_binding(&self, type_name: &str) -> CoreResult<&'a InputBinding> {
        self.schema
            .input_binding(type_name)
            .ok_or_else(|| CoreError::configuration(format!("The input type {type_name} is not bound to a model.")))
    }

    /// The id exposed for a record of the mutated model.
    pub fn encode_id(&self, raw: &CudValue) -> String {
        if self.def.global_id {
            to_global_id(&self.def.type_name, &raw.to_id_string())
        } else {
            raw.to_id_string()
        }
    }

    /// Fills the data fields the input leaves out from the context.
    pub fn apply_auto_context(&self, input: &mut MutationInput) {
        if self.def.options.auto_context_fields.is_empty() {
            return;
        }

        let data: Vec<&mut ParsedInputMap> = match input {
            MutationInput::Create { input } | MutationInput::Update { input, .. } => vec![input],
            MutationInput::BatchCreate { input } | MutationInput::BatchUpdate { input } => input.iter_mut().collect(),
            MutationInput::FilterUpdate { data, .. } => vec![data],
            MutationInput::Delete { .. } | MutationInput::BatchDelete { .. } | MutationInput::FilterDelete { .. } => {
                Vec::new()
            }
        };

        for map in data {
            for (field, key) in &self.def.options.auto_context_fields {
                if map.contains_key(field) {
                    continue;
                }

                if let Some(value) = self.ctx.value(key) {
                    map.insert(field.clone(), ParsedInputValue::Single(value));
                }
            }
        }
    }
}

/// Resolves an id given by a client, global or raw, to a primary key value of `model`.
pub(crate) fn coerce_id(model: &Model, id: &str) -> CoreResult<CudValue> {
    let raw = disambiguate_id(id);
    let pk = model.primary_key();

    pk.type_identifier
        .coerce(CudValue::String(raw))
        .map_err(|_| CoreError::input(format!("`{}` is not a valid {} id.", id, model.name)))
}

/// Like [`coerce_id`], for ids that may already be typed, e.g. context values.
pub(crate) fn coerce_id_value(model: &Model, value: CudValue) -> CoreResult<CudValue> {
    match value {
        CudValue::String(id) => coerce_id(model, &id),
        other => Ok(model.primary_key().type_identifier.coerce(other)?),
    }
}

pub(crate) fn unexpected_input(expected: &str) -> CoreError {
    CoreError::configuration(format!(
        "before_mutate must return the input of a {expected} mutation."
    ))
}

fn take_argument(args: &mut ParsedInputMap, name: &str) -> CoreResult<ParsedInputValue> {
    args.shift_remove(name)
        .ok_or_else(|| CoreError::MissingRequiredValue { path: name.to_owned() })
}

pub(crate) fn take_id(args: &mut ParsedInputMap, name: &str) -> CoreResult<String> {
    match take_argument(args, name)? {
        ParsedInputValue::Single(CudValue::String(id)) => Ok(id),
        ParsedInputValue::Single(value) if !value.is_null() => Ok(value.to_id_string()),
        _ => Err(CoreError::MissingRequiredValue { path: name.to_owned() }),
    }
}

pub(crate) fn take_map(args: &mut ParsedInputMap, name: &str) -> CoreResult<ParsedInputMap> {
    take_argument(args, name)?
        .into_map()
        .ok_or_else(|| CoreError::input(format!("`{name}` must be an input object.")))
}

/// A list argument. A single value counts as a list of one, null as empty.
pub(crate) fn take_list(args: &mut ParsedInputMap, name: &str) -> CoreResult<Vec<ParsedInputValue>> {
    Ok(match take_argument(args, name)? {
        ParsedInputValue::List(items) => items,
        value if value.is_null() => Vec::new(),
        value => vec![value],
    })
}
