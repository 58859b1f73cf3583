use super::{output_types, BuilderContext, FieldBinding, InputBinding};
use crate::{CoreError, CoreResult, ExtraEntry, ExtraOptions, ExtraType, InputOptions, RelationOperation};
use cud_models::{Field, ModelRef, RelationField, RelationKind, ScalarField};
use cud_schema::{input_field, parse_type_ref, IdentifierType, InputField, InputObjectType, TypeRef};
use indexmap::IndexMap;
use std::str::FromStr;

/// How the fields of a model input are derived, beyond the user facing options.
#[derive(Debug, Clone, Default)]
pub(crate) struct InputRules {
    /// Every field is optional (patch inputs).
    pub partial: bool,
    pub ignore_primary_key: bool,
    /// Relation field pointing back at the record a nested input is created for.
    pub back_reference: Option<String>,
    /// Fields filled from the context when the input leaves them out.
    pub auto_context: Vec<String>,
}

impl InputRules {
    fn nested(back_reference: Option<String>) -> Self {
        InputRules {
            partial: false,
            ignore_primary_key: true,
            back_reference,
            auto_context: Vec::new(),
        }
    }
}

struct InputFields {
    fields: Vec<InputField>,
    bindings: IndexMap<String, FieldBinding>,
}

impl InputFields {
    fn push(&mut self, field: InputField, binding: FieldBinding) {
        self.bindings.insert(field.source_name.clone(), binding);
        self.fields.push(field);
    }
}

/// Builds the input object `name` writing records of `model` and binds its fields.
/// `leading` fields are placed before the model fields.
pub(crate) fn model_input_type(
    ctx: &mut BuilderContext<'_>,
    name: &str,
    model: &ModelRef,
    options: &InputOptions,
    rules: &InputRules,
    leading: Vec<(InputField, FieldBinding)>,
) -> CoreResult<()> {
    ctx.reserve_input_type(name)?;

    for field in options.referenced_fields() {
        model.field(field)?;
    }

    let mut input = InputFields {
        fields: Vec::new(),
        bindings: IndexMap::new(),
    };

    for (field, binding) in leading {
        input.push(field, binding);
    }

    for model_field in model.fields() {
        let field_name = model_field.name();

        if !model_field.is_editable() || !options.includes(field_name) {
            continue;
        }

        if rules.back_reference.as_deref() == Some(field_name) {
            continue;
        }

        match model_field {
            Field::Scalar(sf) if sf.is_id && rules.ignore_primary_key => continue,
            Field::Scalar(sf) => {
                let field = scalar_input_field(ctx, options, rules, sf)?;
                input.push(
                    field.with_description(sf.description.clone()),
                    FieldBinding::Scalar {
                        field: sf.name.clone(),
                    },
                );
            }
            Field::Relation(rf) => relation_input_fields(ctx, name, options, rules, rf, &mut input)?,
        }
    }

    tracing::trace!(input = %name, model = %model.name, fields = input.fields.len(), "built input type");

    ctx.cache_input_type(InputObjectType::new(IdentifierType::Raw(name.to_owned()), input.fields));
    ctx.bind_input(
        name.to_owned(),
        InputBinding {
            model: model.clone(),
            fields: input.bindings,
        },
    );

    Ok(())
}

fn scalar_input_field(
    ctx: &mut BuilderContext<'_>,
    options: &InputOptions,
    rules: &InputRules,
    sf: &ScalarField,
) -> CoreResult<InputField> {
    let base = if sf.is_id {
        TypeRef::id()
    } else {
        match output_types::choice_enum(ctx, sf) {
            Some(enum_name) => TypeRef::named(enum_name),
            None => TypeRef::scalar(output_types::map_scalar_type(sf.type_identifier)),
        }
    };

    finish_field(ctx, options, rules, &sf.name, base, sf.is_required())
}

fn relation_input_fields(
    ctx: &mut BuilderContext<'_>,
    parent: &str,
    options: &InputOptions,
    rules: &InputRules,
    rf: &RelationField,
    input: &mut InputFields,
) -> CoreResult<()> {
    match rf.kind {
        RelationKind::ForeignKey | RelationKind::OneToOne => {
            let extra = match rf.kind {
                RelationKind::ForeignKey => options.foreign_key_extras.get(&rf.name),
                _ => options.one_to_one_extras.get(&rf.name),
            };

            let nested = match extra {
                Some(extra) => nested_input_type(ctx, parent, rf, None, extra)?,
                None => None,
            };

            let base = nested.as_ref().map(TypeRef::named).unwrap_or_else(TypeRef::id);
            let field = finish_field(ctx, options, rules, &rf.name, base, rf.is_required())?;

            input.push(
                field.with_description(rf.description.clone()),
                FieldBinding::ForeignKey {
                    field: rf.name.clone(),
                    nested,
                },
            );
        }

        // Reverse one-to-one fields are only writable when configured.
        RelationKind::OneToOneRel => {
            if let Some(extra) = options.one_to_one_extras.get(&rf.name) {
                let nested = nested_input_type(ctx, parent, rf, None, extra)?;
                let base = nested.as_ref().map(TypeRef::named).unwrap_or_else(TypeRef::id);
                let field = finish_field(ctx, options, rules, &rf.name, base, false)?;

                input.push(
                    field,
                    FieldBinding::ReverseOneToOne {
                        field: rf.name.clone(),
                        nested,
                    },
                );
            }
        }

        RelationKind::ManyToMany | RelationKind::ManyToManyRel | RelationKind::ManyToOneRel => {
            let extras = match rf.kind {
                RelationKind::ManyToOneRel => options.many_to_one_extras.get(&rf.name),
                _ => options.many_to_many_extras.get(&rf.name),
            };

            let has_exact = extras.map(|e| e.contains_key("exact")).unwrap_or(false);

            if !has_exact {
                let field = finish_field(ctx, options, rules, &rf.name, TypeRef::id().list(), false)?;

                input.push(
                    field.with_description(rf.description.clone()),
                    FieldBinding::Relation {
                        field: rf.name.clone(),
                        operation: RelationOperation::Exact,
                        nested: None,
                    },
                );
            }

            for (key, entry) in extras.into_iter().flatten() {
                if let Some((field, binding)) = operation_input_field(ctx, parent, options, rules, rf, key, entry)? {
                    input.push(field, binding);
                }
            }
        }
    }

    Ok(())
}

/// An operation field of a to-many extra: `<field>` for `exact`, `<field>_<key>` otherwise.
fn operation_input_field(
    ctx: &mut BuilderContext<'_>,
    parent: &str,
    options: &InputOptions,
    rules: &InputRules,
    rf: &RelationField,
    key: &str,
    entry: &ExtraEntry,
) -> CoreResult<Option<(InputField, FieldBinding)>> {
    let Some(extra) = entry.options() else {
        return Ok(None);
    };

    let operation = match (RelationOperation::from_str(key), extra.operation) {
        (Ok(operation), _) | (Err(_), Some(operation)) => operation,
        (Err(_), None) => {
            return Err(CoreError::configuration(format!(
                "The extra `{}` of field `{}` needs an `operation`.",
                key, rf.name
            )))
        }
    };

    let source = if key == "exact" {
        rf.name.clone()
    } else {
        format!("{}_{}", rf.name, key)
    };

    let nested = match operation {
        RelationOperation::Remove => None,
        _ => nested_input_type(ctx, parent, rf, Some(key), &extra)?,
    };

    let base = match &nested {
        Some(name) => TypeRef::named(name.clone()).list(),
        None => TypeRef::id().list(),
    };

    let field = finish_field(ctx, options, rules, &source, base, false)?;

    Ok(Some((
        field,
        FieldBinding::Relation {
            field: rf.name.clone(),
            operation,
            nested,
        },
    )))
}

/// The input nested records of a relation extra are created from, if the extra takes
/// more than ids. `auto` inputs are generated here, named inputs are checked at the end
/// of the build.
fn nested_input_type(
    ctx: &mut BuilderContext<'_>,
    parent: &str,
    rf: &RelationField,
    operation: Option<&str>,
    extra: &ExtraOptions,
) -> CoreResult<Option<String>> {
    match extra.extra_type() {
        ExtraType::Id => Ok(None),
        ExtraType::Named(name) => Ok(Some(name)),
        ExtraType::Auto => {
            let name = extra.type_name.clone().unwrap_or_else(|| {
                IdentifierType::NestedInput {
                    parent: parent.to_owned(),
                    field: rf.name.clone(),
                    operation: operation.map(ToOwned::to_owned),
                }
                .name()
            });

            let related = ctx.internal_data_model().related_model(rf)?;
            let rules = InputRules::nested(rf.related_field.clone());

            model_input_type(ctx, &name, &related, &extra.input, &rules, Vec::new())?;

            Ok(Some(name))
        }
    }
}

/// Applies requiredness rules and type overrides to a field of type `base`.
fn finish_field(
    ctx: &BuilderContext<'_>,
    options: &InputOptions,
    rules: &InputRules,
    source: &str,
    base: TypeRef,
    computed_required: bool,
) -> CoreResult<InputField> {
    let required = if options.is_optional(source) || rules.partial || rules.auto_context.iter().any(|f| f == source) {
        false
    } else if options.is_required(source) {
        true
    } else {
        computed_required
    };

    let field_type = match options.field_types.get(source) {
        Some(type_ref) => parse_type_ref(type_ref)?,
        None => base.non_null_if(required),
    };

    Ok(input_field(ctx.graphql_name(source), field_type).with_source_name(source))
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
                { "name": "User", "fields": [{ "name": "username", "type": "String" }] },
                {
                  "name": "Cat",
                  "fields": [
                    { "name": "name", "type": "String" },
                    { "name": "nickname", "type": "String", "blank": true },
                    { "name": "lives", "type": "Int", "default": { "value": 9 } },
                    { "name": "owner", "type": "ForeignKey", "to": "User", "relatedName": "cats" },
                    { "name": "secret", "type": "String", "null": true, "editable": false }
                  ]
                }
              ]
            }"#,
        )
        .unwrap();

        let mut registry = TypeRegistry::new(datamodel);
        registry.register(ModelTypeOptions::new("Cat")).unwrap();
        registry
    }

    fn rendered(ctx: &BuilderContext<'_>, name: &str) -> Vec<String> {
        ctx.cache.input_types[name]
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.field_type))
            .collect()
    }

    #[test]
    fn requiredness_follows_the_model() {
        let registry = registry();
        let mut ctx = BuilderContext::new(&registry, true);
        let cat = registry.internal_data_model().assert_model("Cat");
        let rules = InputRules {
            ignore_primary_key: true,
            ..Default::default()
        };

        model_input_type(&mut ctx, "CreateCatInput", &cat, &InputOptions::default(), &rules, vec![]).unwrap();

        assert_eq!(
            rendered(&ctx, "CreateCatInput"),
            vec!["name: String!", "nickname: String", "lives: Int", "owner: ID!"]
        );
    }

    #[test]
    fn options_override_requiredness_and_types() {
        let registry = registry();
        let mut ctx = BuilderContext::new(&registry, true);
        let cat = registry.internal_data_model().assert_model("Cat");
        let options = InputOptions {
            optional_fields: vec!["name".into()],
            required_fields: vec!["nickname".into()],
            field_types: [("lives".to_owned(), "[Int!]".to_owned())].into_iter().collect(),
            exclude_fields: vec!["owner".into()],
            ..Default::default()
        };
        let rules = InputRules {
            ignore_primary_key: false,
            ..Default::default()
        };

        model_input_type(&mut ctx, "UpdateCatInput", &cat, &options, &rules, vec![]).unwrap();

        assert_eq!(
            rendered(&ctx, "UpdateCatInput"),
            vec!["id: ID", "name: String", "nickname: String!", "lives: [Int!]"]
        );
    }

    #[test]
    fn unknown_option_fields_are_rejected() {
        let registry = registry();
        let mut ctx = BuilderContext::new(&registry, true);
        let cat = registry.internal_data_model().assert_model("Cat");
        let options = InputOptions {
            exclude_fields: vec!["colour".into()],
            ..Default::default()
        };

        let err = model_input_type(&mut ctx, "CreateCatInput", &cat, &options, &InputRules::default(), vec![])
            .unwrap_err();

        assert!(err.to_string().contains("colour"));
    }
}
