use super::BuilderContext;
use crate::{CoreResult, ModelType};
use cud_models::{Field, RelationField, RelationKind, ScalarField, TypeIdentifier};
use cud_schema::{
    field, to_const, EnumType, EnumValue, IdentifierType, ObjectType, OutputField, ScalarType, TypeRef,
};

/// Builds the object type of every registered model type, and the `Node` interface when
/// a type uses global ids.
#[tracing::instrument(skip_all)]
pub(crate) fn initialize_model_object_types(ctx: &mut BuilderContext<'_>) -> CoreResult<()> {
    if ctx.registry.uses_global_ids() {
        ctx.cache_interface(ObjectType::new(
            IdentifierType::Node,
            vec![field("id", vec![], TypeRef::id().non_null())],
        ));
    }

    let types: Vec<ModelType> = ctx.registry.types().cloned().collect();

    for typ in types {
        let object = model_object_type(ctx, &typ);
        ctx.cache_object_type(object)?;
    }

    Ok(())
}

fn model_object_type(ctx: &mut BuilderContext<'_>, typ: &ModelType) -> ObjectType {
    let model = &typ.model;
    let mut fields = Vec::new();

    if typ.global_id {
        fields.push(field("id", vec![], TypeRef::id().non_null()).with_source_name(model.primary_key().name.clone()));
    }

    for model_field in model.fields() {
        let name = model_field.name();

        if !typ.exposes(name) {
            continue;
        }

        let output_field = match model_field {
            Field::Scalar(sf) if sf.is_id => {
                // The global id takes the place of a primary key named `id`.
                if typ.global_id && ctx.graphql_name(name) == "id" {
                    continue;
                }

                field(ctx.graphql_name(name), vec![], TypeRef::id().non_null())
            }
            Field::Scalar(sf) => field(ctx.graphql_name(name), vec![], scalar_output_type(ctx, sf)),
            Field::Relation(rf) => match relation_output_type(ctx, rf) {
                Some(type_ref) => field(ctx.graphql_name(name), vec![], type_ref),
                None => continue,
            },
        };

        fields.push(
            output_field
                .with_source_name(name)
                .with_description(model_field.description().map(ToOwned::to_owned)),
        );
    }

    let mut object = ObjectType::new(IdentifierType::Raw(typ.name.clone()), fields).with_model(model.name.clone());
    object.description = typ.description.clone();

    if typ.global_id {
        object.interfaces.push(IdentifierType::Node.name());
    }

    object
}

fn scalar_output_type(ctx: &mut BuilderContext<'_>, sf: &ScalarField) -> TypeRef {
    let type_ref = match choice_enum(ctx, sf) {
        Some(name) => TypeRef::named(name),
        None => TypeRef::scalar(map_scalar_type(sf.type_identifier)),
    };

    type_ref.non_null_if(!sf.is_nullable)
}

/// Relations to models without a registered type are not exposed.
fn relation_output_type(ctx: &BuilderContext<'_>, rf: &RelationField) -> Option<TypeRef> {
    let related = ctx.registry.get_type_for_model(&rf.related_model)?;
    let named = TypeRef::named(related.name.clone());

    let type_ref = match rf.kind {
        RelationKind::ForeignKey | RelationKind::OneToOne => named.non_null_if(!rf.is_nullable),
        RelationKind::OneToOneRel => named,
        RelationKind::ManyToMany | RelationKind::ManyToManyRel | RelationKind::ManyToOneRel => {
            named.non_null().list().non_null()
        }
    };

    Some(type_ref)
}

/// The enum of a field with choices, built on first use. Values are named after the
/// stored value, the label becomes the description.
pub(crate) fn choice_enum(ctx: &mut BuilderContext<'_>, sf: &ScalarField) -> Option<String> {
    let choices = sf.choices.as_ref().filter(|c| !c.is_empty())?;
    let identifier = IdentifierType::ChoiceEnum {
        model: sf.model.clone(),
        field: sf.name.clone(),
    };
    let name = identifier.name();

    if ctx.get_enum(&name).is_none() {
        let values = choices
            .iter()
            .map(|choice| EnumValue {
                name: to_const(&choice.value.to_string()),
                value: choice.value.clone(),
                description: Some(choice.label.clone()),
            })
            .collect();

        ctx.cache_enum(EnumType::new(identifier, values));
    }

    Some(name)
}

pub(crate) fn map_scalar_type(type_identifier: TypeIdentifier) -> ScalarType {
    match type_identifier {
        TypeIdentifier::String => ScalarType::String,
        TypeIdentifier::Int => ScalarType::Int,
        TypeIdentifier::BigInt => ScalarType::BigInt,
        TypeIdentifier::Float => ScalarType::Float,
        TypeIdentifier::Decimal => ScalarType::Decimal,
        TypeIdentifier::Boolean => ScalarType::Boolean,
        TypeIdentifier::Date => ScalarType::Date,
        TypeIdentifier::DateTime => ScalarType::DateTime,
        TypeIdentifier::Time => ScalarType::Time,
        TypeIdentifier::Json => ScalarType::JSONString,
        TypeIdentifier::Uuid => ScalarType::UUID,
        TypeIdentifier::Upload => ScalarType::Upload,
    }
}

/// Payload fields are declared with their source name.
pub(crate) fn payload_field(ctx: &BuilderContext<'_>, source: &str, type_ref: TypeRef) -> OutputField {
    field(ctx.graphql_name(source), vec![], type_ref).with_source_name(source)
}
