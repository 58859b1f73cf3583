//! Extension points of the mutation lifecycles.
//!
//! Every mutation definition carries a [`MutationHooks`] implementation. All methods have
//! defaults, so implementors override only the steps they care about. Hooks run in the order
//! documented on the executor operations, on the request's task.

use crate::{CoreError, CoreResult, MutationContext, MutationDefinition, ParsedInputMap, ParsedInputValue};
use cud_connector::{Filter, WriteArgs};
use cud_models::Record;
use cud_value::CudValue;

/// The arguments of a mutation, as seen by hooks. Patch mutations use the update variants.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationInput {
    Create { input: ParsedInputMap },
    Update { id: String, input: ParsedInputMap },
    Delete { id: String },
    BatchCreate { input: Vec<ParsedInputMap> },
    BatchUpdate { input: Vec<ParsedInputMap> },
    BatchDelete { ids: Vec<String> },
    FilterDelete { filter: ParsedInputMap },
    FilterUpdate { filter: ParsedInputMap, data: ParsedInputMap },
}

impl MutationInput {
    /// The input entries the default validation visits: data fields of writes, nothing for deletes.
    pub fn entries(&self) -> Vec<(&str, &ParsedInputValue)> {
        let maps: Vec<&ParsedInputMap> = match self {
            MutationInput::Create { input } | MutationInput::Update { input, .. } => vec![input],
            MutationInput::BatchCreate { input } | MutationInput::BatchUpdate { input } => input.iter().collect(),
            MutationInput::FilterUpdate { data, .. } => vec![data],
            MutationInput::Delete { .. } | MutationInput::BatchDelete { .. } | MutationInput::FilterDelete { .. } => {
                Vec::new()
            }
        };

        maps.into_iter()
            .flat_map(|map| map.iter().map(|(name, value)| (name.as_str(), value)))
            .collect()
    }
}

/// What is about to be written. `before_save` may return a different target of the same
/// variant, e.g. another record to delete.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveTarget {
    Create(WriteArgs),
    Update { record: Record, args: WriteArgs },
    Delete(Record),
    DeleteMany(Vec<Record>),
    UpdateMany { records: Vec<Record>, args: WriteArgs },
}

impl SaveTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            SaveTarget::Create(_) => "create",
            SaveTarget::Update { .. } => "update",
            SaveTarget::Delete(_) => "delete",
            SaveTarget::DeleteMany(_) => "delete many",
            SaveTarget::UpdateMany { .. } => "update many",
        }
    }

    pub(crate) fn mismatch(expected: &str, found: &SaveTarget) -> CoreError {
        CoreError::configuration(format!(
            "before_save returned a {} target for a {} mutation.",
            found.kind(),
            expected
        ))
    }
}

/// The outcome handed to `after_mutate`.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationEvent {
    Created(Record),
    Updated(Record),
    Deleted {
        input_id: String,
        found: bool,
    },
    BatchCreated(Vec<Record>),
    BatchUpdated(Vec<Record>),
    BatchDeleted {
        deletion_count: usize,
        deleted_ids: Vec<CudValue>,
    },
    FilterUpdated(Vec<Record>),
}

pub trait MutationHooks: Send + Sync {
    /// First step of every mutation. May rewrite the arguments.
    fn before_mutate(
        &self,
        _ctx: &MutationContext,
        _def: &MutationDefinition,
        input: MutationInput,
    ) -> CoreResult<MutationInput> {
        Ok(input)
    }

    fn get_permissions(&self, _ctx: &MutationContext, def: &MutationDefinition, _input: &MutationInput) -> Vec<String> {
        def.options.permissions.clone()
    }

    /// Fails with `PermissionDenied` unless the caller holds every permission. `record` is
    /// the fetched row for mutations acting on a single existing row.
    fn check_permissions(
        &self,
        ctx: &MutationContext,
        def: &MutationDefinition,
        input: &MutationInput,
        _record: Option<&Record>,
    ) -> CoreResult<()> {
        let permissions = self.get_permissions(ctx, def, input);

        if permissions.is_empty() || ctx.has_perms(&permissions) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied)
        }
    }

    fn validate(&self, ctx: &MutationContext, def: &MutationDefinition, input: &MutationInput) -> CoreResult<()> {
        for (name, value) in input.entries() {
            self.validate_field(ctx, def, name, value)?;
        }

        Ok(())
    }

    fn validate_field(
        &self,
        _ctx: &MutationContext,
        _def: &MutationDefinition,
        _name: &str,
        _value: &ParsedInputValue,
    ) -> CoreResult<()> {
        Ok(())
    }

    /// Transforms an input value before it is written.
    fn handle_field(
        &self,
        _ctx: &MutationContext,
        _def: &MutationDefinition,
        _name: &str,
        value: ParsedInputValue,
    ) -> CoreResult<ParsedInputValue> {
        Ok(value)
    }

    /// Restricts the rows the mutation may act on.
    fn scope_filter(&self, _ctx: &MutationContext, _def: &MutationDefinition) -> Filter {
        Filter::empty()
    }

    fn before_save(&self, _ctx: &MutationContext, _def: &MutationDefinition, target: SaveTarget) -> CoreResult<SaveTarget> {
        Ok(target)
    }

    fn after_mutate(
        &self,
        _ctx: &MutationContext,
        _def: &MutationDefinition,
        _input: &MutationInput,
        _event: &MutationEvent,
    ) -> CoreResult<()> {
        Ok(())
    }
}

/// Hooks with the default behaviour only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl MutationHooks for DefaultHooks {}
