use super::{FieldBuilder, ModelBuilder, RelationFieldBuilder, ScalarFieldBuilder};
use crate::{Datamodel, DomainError, FieldDescription, ModelDescription, OnDelete, RelationKind, TypeIdentifier};
use heck::ToSnakeCase;
use itertools::Itertools;
use std::{collections::HashSet, str::FromStr};

const NO_REVERSE_ACCESSOR: &str = "+";

pub(crate) fn model_builders(datamodel: &Datamodel) -> crate::Result<Vec<ModelBuilder>> {
    if let Some(duplicate) = datamodel.models.iter().map(|m| m.name.as_str()).duplicates().next() {
        return Err(DomainError::InvalidDatamodel(format!(
            "The model `{duplicate}` is defined more than once."
        )));
    }

    let model_names: HashSet<&str> = datamodel.models.iter().map(|m| m.name.as_str()).collect();

    let mut builders = datamodel
        .models
        .iter()
        .map(|model| model_builder(model, &model_names))
        .collect::<crate::Result<Vec<_>>>()?;

    add_reverse_relations(&mut builders)?;

    Ok(builders)
}

fn model_builder(model: &ModelDescription, model_names: &HashSet<&str>) -> crate::Result<ModelBuilder> {
    if let Some(duplicate) = model.fields.iter().map(|f| f.name.as_str()).duplicates().next() {
        return Err(DomainError::InvalidDatamodel(format!(
            "The field `{duplicate}` is defined more than once on model `{}`.",
            model.name
        )));
    }

    let primary_keys = model.fields.iter().filter(|f| f.primary_key).count();

    if primary_keys > 1 {
        return Err(DomainError::InvalidDatamodel(format!(
            "Model `{}` declares more than one primary key.",
            model.name
        )));
    }

    let mut fields = Vec::with_capacity(model.fields.len() + 1);

    if primary_keys == 0 {
        if model.fields.iter().any(|f| f.name == "id") {
            return Err(DomainError::InvalidDatamodel(format!(
                "Model `{}` has a field named `id` that is not its primary key.",
                model.name
            )));
        }

        fields.push(FieldBuilder::Scalar(ScalarFieldBuilder::implicit_id()));
    }

    for field in &model.fields {
        fields.push(field_builder(&model.name, field, model_names)?);
    }

    Ok(ModelBuilder {
        name: model.name.clone(),
        fields,
    })
}

fn field_builder(model: &str, field: &FieldDescription, model_names: &HashSet<&str>) -> crate::Result<FieldBuilder> {
    let relation_kind = match field.field_type.as_str() {
        "ForeignKey" => Some(RelationKind::ForeignKey),
        "OneToOne" => Some(RelationKind::OneToOne),
        "ManyToMany" => Some(RelationKind::ManyToMany),
        _ => None,
    };

    match relation_kind {
        Some(kind) => {
            let target = match field.to.as_deref() {
                Some("self") => model.to_owned(),
                Some(target) if model_names.contains(target) => target.to_owned(),
                Some(target) => {
                    return Err(DomainError::InvalidDatamodel(format!(
                        "The relation field `{model}.{}` points to the unknown model `{target}`.",
                        field.name
                    )))
                }
                None => {
                    return Err(DomainError::InvalidDatamodel(format!(
                        "The relation field `{model}.{}` is missing its `to` model.",
                        field.name
                    )))
                }
            };

            if field.primary_key {
                return Err(DomainError::InvalidDatamodel(format!(
                    "The relation field `{model}.{}` cannot be a primary key.",
                    field.name
                )));
            }

            if field.on_delete == OnDelete::SetNull && !field.null {
                return Err(DomainError::InvalidDatamodel(format!(
                    "The relation field `{model}.{}` uses SET_NULL but is not nullable.",
                    field.name
                )));
            }

            let related_field = match field.related_name.as_deref() {
                Some(NO_REVERSE_ACCESSOR) => None,
                Some(name) => Some(name.to_owned()),
                None => Some(default_reverse_name(model, kind)),
            };

            Ok(FieldBuilder::Relation(RelationFieldBuilder {
                name: field.name.clone(),
                kind,
                related_model: target,
                related_field,
                is_nullable: field.null,
                is_blank: field.blank,
                is_editable: field.editable,
                on_delete: field.on_delete,
                description: field.help_text.clone(),
            }))
        }
        None => {
            let type_identifier = TypeIdentifier::from_str(&field.field_type).map_err(|err| {
                DomainError::InvalidDatamodel(format!("Field `{model}.{}`: {err}", field.name))
            })?;

            if field.autoincrement && !matches!(type_identifier, TypeIdentifier::Int | TypeIdentifier::BigInt) {
                return Err(DomainError::InvalidDatamodel(format!(
                    "Field `{model}.{}` is autoincrementing but not an integer.",
                    field.name
                )));
            }

            Ok(FieldBuilder::Scalar(ScalarFieldBuilder {
                name: field.name.clone(),
                type_identifier,
                is_nullable: field.null,
                is_blank: field.blank,
                default_value: field.default.clone(),
                choices: field.choices.clone(),
                is_id: field.primary_key,
                is_unique: field.unique,
                is_autoincrement: field.autoincrement,
                is_editable: field.editable,
                description: field.help_text.clone(),
            }))
        }
    }
}

/// Reverse accessor names follow the `<model>_set` / `<model>` convention.
fn default_reverse_name(model: &str, kind: RelationKind) -> String {
    let base = model.to_snake_case().replace('_', "");

    match kind {
        RelationKind::OneToOne => base,
        _ => format!("{base}_set"),
    }
}

fn add_reverse_relations(builders: &mut [ModelBuilder]) -> crate::Result<()> {
    let mut reverse_fields: Vec<(String, RelationFieldBuilder)> = Vec::new();

    for builder in builders.iter() {
        for field in &builder.fields {
            let FieldBuilder::Relation(rf) = field else { continue };
            let Some(reverse_name) = &rf.related_field else { continue };

            let kind = match rf.kind {
                RelationKind::ForeignKey => RelationKind::ManyToOneRel,
                RelationKind::OneToOne => RelationKind::OneToOneRel,
                RelationKind::ManyToMany => RelationKind::ManyToManyRel,
                _ => continue,
            };

            reverse_fields.push((
                rf.related_model.clone(),
                RelationFieldBuilder {
                    name: reverse_name.clone(),
                    kind,
                    related_model: builder.name.clone(),
                    related_field: Some(rf.name.clone()),
                    is_nullable: true,
                    is_blank: true,
                    is_editable: true,
                    on_delete: OnDelete::Cascade,
                    description: None,
                },
            ));
        }
    }

    for (target, reverse) in reverse_fields {
        let Some(builder) = builders.iter_mut().find(|b| b.name == target) else {
            return Err(DomainError::ModelNotFound { name: target });
        };

        if builder.fields.iter().any(|f| f.name() == reverse.name) {
            return Err(DomainError::InvalidDatamodel(format!(
                "The reverse accessor `{}.{}` for `{}.{}` clashes with an existing field.",
                target,
                reverse.name,
                reverse.related_model,
                reverse.related_field.as_deref().unwrap_or_default(),
            )));
        }

        builder.fields.push(FieldBuilder::Relation(reverse));
    }

    Ok(())
}
