use crate::*;
use indexmap::IndexMap;
use std::{collections::BTreeSet, str::FromStr};

/// A named type definition.
#[derive(Debug, Clone, PartialEq)]
pub enum NamedType {
    InputObject(InputObjectType),
    Object(ObjectType),
    Interface(ObjectType),
    Enum(EnumType),
}

impl NamedType {
    pub fn name(&self) -> String {
        match self {
            NamedType::InputObject(t) => t.name(),
            NamedType::Object(t) | NamedType::Interface(t) => t.name(),
            NamedType::Enum(t) => t.name(),
        }
    }
}

/// The query schema. Holds the `Query` and `Mutation` root types and all named types
/// they (transitively) reference, in definition order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySchema {
    query: ObjectType,
    mutation: ObjectType,
    types: IndexMap<String, NamedType>,
}

impl QuerySchema {
    /// Assembles the schema, rejecting duplicate definitions and references to undefined types.
    pub fn new(query: ObjectType, mutation: ObjectType, types: Vec<NamedType>) -> Result<Self, SchemaError> {
        let mut by_name = IndexMap::with_capacity(types.len());

        for typ in types {
            let name = typ.name();

            if name == query.name() || name == mutation.name() || by_name.contains_key(&name) {
                return Err(SchemaError::DuplicateType(name));
            }

            by_name.insert(name, typ);
        }

        let schema = QuerySchema {
            query,
            mutation,
            types: by_name,
        };

        schema.verify_references()?;

        Ok(schema)
    }

    pub fn query(&self) -> &ObjectType {
        &self.query
    }

    pub fn mutation(&self) -> &ObjectType {
        &self.mutation
    }

    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    pub fn find_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    pub fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        match self.find_type(name) {
            Some(NamedType::InputObject(t)) => Some(t),
            _ => None,
        }
    }

    /// Object types, including the root types.
    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        if name == self.query.name() {
            return Some(&self.query);
        }

        if name == self.mutation.name() {
            return Some(&self.mutation);
        }

        match self.find_type(name) {
            Some(NamedType::Object(t)) | Some(NamedType::Interface(t)) => Some(t),
            _ => None,
        }
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        match self.find_type(name) {
            Some(NamedType::Enum(t)) => Some(t),
            _ => None,
        }
    }

    pub fn find_mutation_field(&self, name: &str) -> Option<&OutputField> {
        self.mutation.find_field(name)
    }

    pub fn find_query_field(&self, name: &str) -> Option<&OutputField> {
        self.query.find_field(name)
    }

    /// The object type backing a model, if one is exposed.
    pub fn object_for_model(&self, model: &str) -> Option<&ObjectType> {
        self.types.values().find_map(|t| match t {
            NamedType::Object(o) if o.model.as_deref() == Some(model) => Some(o),
            _ => None,
        })
    }

    /// Non built-in scalars referenced anywhere in the schema.
    pub fn custom_scalars(&self) -> Vec<ScalarType> {
        let used: BTreeSet<ScalarType> = self
            .type_refs()
            .filter_map(|(_, type_ref)| ScalarType::from_str(type_ref.named_type()).ok())
            .filter(|scalar| !scalar.is_builtin())
            .collect();

        used.into_iter().collect()
    }

    /// Every type reference in the schema, paired with the name of the referencing type.
    fn type_refs(&self) -> impl Iterator<Item = (String, &TypeRef)> {
        let objects = [&self.query, &self.mutation]
            .into_iter()
            .chain(self.types.values().filter_map(|t| match t {
                NamedType::Object(o) | NamedType::Interface(o) => Some(o),
                _ => None,
            }));

        let output_refs = objects.flat_map(|o| {
            o.fields.iter().flat_map(move |f| {
                std::iter::once((o.name(), &f.field_type))
                    .chain(f.arguments.iter().map(move |arg| (o.name(), &arg.field_type)))
            })
        });

        let input_refs = self.types.values().flat_map(|t| match t {
            NamedType::InputObject(i) => i.fields.iter().map(|f| (i.name(), &f.field_type)).collect(),
            _ => Vec::new(),
        });

        output_refs.chain(input_refs)
    }

    fn verify_references(&self) -> Result<(), SchemaError> {
        for (referenced_by, type_ref) in self.type_refs() {
            let name = type_ref.named_type();
            let known = ScalarType::from_str(name).is_ok() || self.types.contains_key(name);

            if !known {
                return Err(SchemaError::UnknownType {
                    name: name.to_owned(),
                    referenced_by,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query() -> ObjectType {
        ObjectType::new(IdentifierType::Query, vec![])
    }

    #[test]
    fn unknown_references_are_rejected() {
        let mutation = ObjectType::new(
            IdentifierType::Mutation,
            vec![field(
                "createCat",
                vec![input_field("input", TypeRef::named("CreateCatInput").non_null())],
                TypeRef::named("CreateCatMutation"),
            )],
        );

        let err = QuerySchema::new(query(), mutation, vec![]).unwrap_err();

        assert_eq!(
            err,
            SchemaError::UnknownType {
                name: "CreateCatMutation".into(),
                referenced_by: "Mutation".into()
            }
        );
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        let input = || NamedType::InputObject(InputObjectType::new(IdentifierType::CreateInput("Cat".into()), vec![]));
        let mutation = ObjectType::new(IdentifierType::Mutation, vec![]);

        let err = QuerySchema::new(query(), mutation, vec![input(), input()]).unwrap_err();

        assert_eq!(err, SchemaError::DuplicateType("CreateCatInput".into()));
    }

    #[test]
    fn custom_scalars_are_collected_once() {
        let input = InputObjectType::new(
            IdentifierType::CreateInput("Cat".into()),
            vec![
                input_field("born", TypeRef::scalar(ScalarType::Date)),
                input_field("tag", TypeRef::scalar(ScalarType::UUID).non_null()),
                input_field("seen", TypeRef::scalar(ScalarType::Date).list()),
                input_field("name", TypeRef::scalar(ScalarType::String)),
            ],
        );
        let mutation = ObjectType::new(IdentifierType::Mutation, vec![]);

        let schema = QuerySchema::new(query(), mutation, vec![NamedType::InputObject(input)]).unwrap();

        assert_eq!(schema.custom_scalars(), vec![ScalarType::Date, ScalarType::UUID]);
    }
}
