use super::{output_types, BuilderContext, FilterBinding, FilterFieldBinding};
use crate::{CoreError, CoreResult};
use cud_connector::Lookup;
use cud_models::{Field, ModelRef};
use cud_schema::{input_field, IdentifierType, InputObjectType, ScalarType, TypeRef};
use indexmap::IndexMap;
use std::str::FromStr;

/// Builds the filter input `name` with one optional field per filter path.
pub(crate) fn filter_input_type(
    ctx: &mut BuilderContext<'_>,
    name: &str,
    model: &ModelRef,
    filter_fields: &[String],
) -> CoreResult<()> {
    ctx.reserve_input_type(name)?;

    let mut fields = Vec::with_capacity(filter_fields.len());
    let mut bindings = IndexMap::with_capacity(filter_fields.len());

    for path in filter_fields {
        let (binding, type_ref) = resolve_filter_path(ctx, model, path)?;

        fields.push(input_field(ctx.graphql_name(path), type_ref).with_source_name(path.clone()));
        bindings.insert(path.clone(), binding);
    }

    ctx.cache_input_type(InputObjectType::new(IdentifierType::Raw(name.to_owned()), fields));
    ctx.bind_filter(
        name.to_owned(),
        FilterBinding {
            model: model.clone(),
            fields: bindings,
        },
    );

    Ok(())
}

/// Splits `relation__field__lookup` into the traversed relations, the compared field and
/// the lookup. Paths without a known lookup suffix compare for equality.
fn resolve_filter_path(
    ctx: &BuilderContext<'_>,
    model: &ModelRef,
    path: &str,
) -> CoreResult<(FilterFieldBinding, TypeRef)> {
    let mut parts: Vec<&str> = path.split("__").collect();

    let suffix = match parts.as_slice() {
        [_, .., last] => Lookup::from_str(last).ok(),
        _ => None,
    };

    let lookup = match suffix {
        Some(lookup) => {
            parts.pop();
            lookup
        }
        None => Lookup::Exact,
    };

    let invalid = |reason: String| CoreError::configuration(format!("Invalid filter field `{path}`: {reason}"));

    let Some((field_name, relations)) = parts.split_last() else {
        return Err(invalid("the path is empty".into()));
    };

    let mut current = model.clone();

    for relation in relations {
        let rf = current
            .find_relation_field(relation)
            .map_err(|_| invalid(format!("`{}` is not a relation of {}", relation, current.name)))?;

        current = ctx.internal_data_model().related_model(rf)?;
    }

    let field = current
        .find_field(field_name)
        .ok_or_else(|| invalid(format!("{} has no field `{}`", current.name, field_name)))?;

    let base = match field {
        Field::Relation(_) => TypeRef::id(),
        Field::Scalar(sf) if sf.is_id => TypeRef::id(),
        Field::Scalar(_) if lookup.is_textual() => TypeRef::scalar(ScalarType::String),
        Field::Scalar(sf) => TypeRef::scalar(output_types::map_scalar_type(sf.type_identifier)),
    };

    let type_ref = match lookup {
        Lookup::In => base.list(),
        Lookup::IsNull => TypeRef::boolean(),
        _ => base,
    };

    let binding = FilterFieldBinding {
        relations: relations.iter().map(|r| (*r).to_owned()).collect(),
        field: (*field_name).to_owned(),
        model: current.name.clone(),
        lookup,
    };

    Ok((binding, type_ref))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::TypeRegistry, ModelTypeOptions};
    use cud_models::convert;
    use pretty_assertions::assert_eq;

    fn registry() -> TypeRegistry {
        let datamodel = convert(
            r#"{
              "models": [
                { "name": "User", "fields": [{ "name": "name", "type": "String" }] },
                {
                  "name": "Dog",
                  "fields": [
                    { "name": "name", "type": "String" },
                    { "name": "age", "type": "Int" },
                    { "name": "owner", "type": "ForeignKey", "to": "User", "relatedName": "dogs" },
                    { "name": "friends", "type": "ManyToMany", "to": "self", "relatedName": "+" }
                  ]
                }
              ]
            }"#,
        )
        .unwrap();

        let mut registry = TypeRegistry::new(datamodel);
        registry.register(ModelTypeOptions::new("Dog")).unwrap();
        registry
    }

    #[test]
    fn filter_paths_resolve_lookups_and_relations() {
        let registry = registry();
        let mut ctx = BuilderContext::new(&registry, true);
        let dog = registry.internal_data_model().assert_model("Dog");
        let paths: Vec<String> = ["id__in", "name__contains", "age__gte", "friends__owner__name", "owner__isnull"]
            .into_iter()
            .map(String::from)
            .collect();

        filter_input_type(&mut ctx, "FilterDeleteDogInput", &dog, &paths).unwrap();

        let rendered: Vec<String> = ctx.cache.input_types["FilterDeleteDogInput"]
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.field_type))
            .collect();

        assert_eq!(
            rendered,
            vec![
                "id_In: [ID]",
                "name_Contains: String",
                "age_Gte: Int",
                "friends_Owner_Name: String",
                "owner_Isnull: Boolean",
            ]
        );

        let binding = &ctx.filter_bindings["FilterDeleteDogInput"].fields["friends__owner__name"];
        assert_eq!(binding.relations, vec!["friends".to_owned(), "owner".to_owned()]);
        assert_eq!(binding.model, "User");
        assert_eq!(binding.lookup, Lookup::Exact);
    }

    #[test]
    fn paths_through_scalars_are_rejected() {
        let registry = registry();
        let mut ctx = BuilderContext::new(&registry, true);
        let dog = registry.internal_data_model().assert_model("Dog");

        let err = filter_input_type(&mut ctx, "FilterDeleteDogInput", &dog, &["name__owner".to_owned()]).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid filter field `name__owner`: `name` is not a relation of Dog"
        );
    }
}
