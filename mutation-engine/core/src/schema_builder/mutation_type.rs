use super::{
    filter_inputs,
    input_types::{self, InputRules},
    output_types::payload_field,
    BuilderContext, FieldBinding, MutationDefinition,
};
use crate::{CoreError, CoreResult, MutationHooks, MutationKind, MutationOptions};
use cud_models::Model;
use cud_schema::{field, input_field, IdentifierType, InputField, ObjectType, OutputField, TypeRef};
use std::sync::Arc;

/// Builds the root mutation field, the payload type and the inputs of one mutation.
#[tracing::instrument(skip_all, fields(model = %options.model, kind = ?options.kind))]
pub(crate) fn build_mutation(
    ctx: &mut BuilderContext<'_>,
    options: MutationOptions,
    hooks: Arc<dyn MutationHooks>,
) -> CoreResult<(OutputField, MutationDefinition)> {
    let model_type = ctx
        .registry
        .get_type_for_model(&options.model)
        .cloned()
        .ok_or_else(|| CoreError::ModelTypeNotRegistered(options.model.clone()))?;

    let model = model_type.model.clone();

    for field in options.auto_context_fields.keys() {
        model.field(field)?;
    }

    let kind = options.kind;
    let field_name = options.field_name(ctx.auto_camelcase);
    let payload_name = options.payload_name();

    let mut input_type = None;
    let mut filter_type = None;

    // Reused input types are generated by another mutation.
    if let (Some(name), None) = (options.input_type_name(), &options.use_type_name) {
        match kind {
            MutationKind::FilterDelete => {
                filter_inputs::filter_input_type(ctx, &name, &model, &options.filter_fields)?;
            }
            _ => {
                let rules = InputRules {
                    partial: kind.is_partial(),
                    ignore_primary_key: options.ignore_primary_key,
                    back_reference: None,
                    auto_context: options.auto_context_fields.keys().cloned().collect(),
                };

                let leading = match kind {
                    MutationKind::BatchUpdate | MutationKind::BatchPatch => {
                        item_id_field(ctx, &model, &options).into_iter().collect()
                    }
                    _ => Vec::new(),
                };

                input_types::model_input_type(ctx, &name, &model, &options.input, &rules, leading)?;
            }
        }
    }

    match kind {
        MutationKind::FilterDelete => filter_type = options.input_type_name(),
        MutationKind::FilterUpdate => {
            let name = IdentifierType::FilterUpdateFilterInput(options.model.clone()).name();
            filter_inputs::filter_input_type(ctx, &name, &model, &options.filter_fields)?;

            filter_type = Some(name);
            input_type = options.input_type_name();
        }
        _ => input_type = options.input_type_name(),
    }

    let arguments = mutation_arguments(kind, input_type.as_deref(), filter_type.as_deref());
    let payload = payload_type(ctx, &options, &payload_name, &model_type.name);
    ctx.cache_object_type(payload)?;

    let field = field(field_name.clone(), arguments, TypeRef::named(payload_name.clone()));

    let definition = MutationDefinition {
        model,
        type_name: model_type.name.clone(),
        global_id: model_type.global_id,
        field_name,
        payload_name,
        input_type,
        filter_type,
        hooks,
        options,
    };

    tracing::debug!(field = %definition.field_name, "built mutation");

    Ok((field, definition))
}

/// The `id` of batch update items, unless the primary key is exposed as `id` already.
fn item_id_field(ctx: &BuilderContext<'_>, model: &Model, options: &MutationOptions) -> Option<(InputField, FieldBinding)> {
    let pk = &model.primary_key().name;
    let pk_exposed = !options.ignore_primary_key && options.input.includes(pk) && ctx.graphql_name(pk) == "id";

    if pk_exposed {
        None
    } else {
        Some((input_field("id", TypeRef::id().non_null()), FieldBinding::ItemId))
    }
}

fn mutation_arguments(kind: MutationKind, input_type: Option<&str>, filter_type: Option<&str>) -> Vec<InputField> {
    let id = || input_field("id", TypeRef::id().non_null());
    let input = |name: Option<&str>| {
        input_field(
            "input",
            TypeRef::named(name.unwrap_or_default()).non_null(),
        )
    };

    match kind {
        MutationKind::Create => vec![input(input_type)],
        MutationKind::Update | MutationKind::Patch => vec![id(), input(input_type)],
        MutationKind::Delete => vec![id()],
        MutationKind::BatchCreate | MutationKind::BatchUpdate | MutationKind::BatchPatch => vec![input_field(
            "input",
            TypeRef::named(input_type.unwrap_or_default()).non_null().list().non_null(),
        )],
        MutationKind::BatchDelete => vec![input_field("ids", TypeRef::id().list().non_null())],
        MutationKind::FilterDelete => vec![input(filter_type)],
        MutationKind::FilterUpdate => vec![
            input_field("filter", TypeRef::named(filter_type.unwrap_or_default()).non_null()),
            input_field("data", TypeRef::named(input_type.unwrap_or_default()).non_null()),
        ],
    }
}

fn payload_type(ctx: &BuilderContext<'_>, options: &MutationOptions, payload_name: &str, type_name: &str) -> ObjectType {
    let object = || TypeRef::named(type_name);
    let ids = || TypeRef::id().list();

    let fields = match options.kind {
        MutationKind::Create | MutationKind::Update | MutationKind::Patch => {
            vec![payload_field(ctx, &options.return_field_name(), object())]
        }
        MutationKind::BatchCreate | MutationKind::BatchUpdate | MutationKind::BatchPatch => {
            vec![payload_field(ctx, &options.return_field_name(), object().list())]
        }
        MutationKind::Delete => vec![
            payload_field(ctx, "found", TypeRef::boolean()),
            payload_field(ctx, "deleted_input_id", TypeRef::id()),
            payload_field(ctx, "deleted_id", TypeRef::id()),
            payload_field(ctx, "deleted_raw_id", TypeRef::id()),
        ],
        MutationKind::BatchDelete => vec![
            payload_field(ctx, "deletion_count", TypeRef::int()),
            payload_field(ctx, "deleted_ids", ids()),
            payload_field(ctx, "missed_ids", ids()),
        ],
        MutationKind::FilterDelete => vec![
            payload_field(ctx, "deletion_count", TypeRef::int()),
            payload_field(ctx, "deleted_ids", ids()),
        ],
        MutationKind::FilterUpdate => vec![
            payload_field(ctx, "updated_count", TypeRef::int()),
            payload_field(ctx, "updated_objects", object().list()),
        ],
    };

    ObjectType::new(IdentifierType::Raw(payload_name.to_owned()), fields)
}
