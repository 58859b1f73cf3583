use super::BuilderContext;
use cud_schema::{field, input_field, to_snake_case, IdentifierType, ObjectType, TypeRef};

/// Builds the `Query` type: `node(id: ID!)` when a type uses global ids, and an
/// `<model>(id: ID!)` lookup per registered type.
pub(crate) fn build(ctx: &BuilderContext<'_>) -> ObjectType {
    let id_argument = || vec![input_field("id", TypeRef::id().non_null())];
    let mut fields = Vec::new();

    if ctx.registry.uses_global_ids() {
        fields.push(field("node", id_argument(), TypeRef::named(IdentifierType::Node.name())));
    }

    for typ in ctx.registry.types() {
        let source = typ.model.name.clone();

        fields.push(
            field(
                ctx.graphql_name(&to_snake_case(&source)),
                id_argument(),
                TypeRef::named(typ.name.clone()),
            )
            .with_source_name(source),
        );
    }

    ObjectType::new(IdentifierType::Query, fields)
}
