use crate::{HandlerError, Result};
use graphql_parser::query::{
    Definition, Directive, Document, OperationDefinition, Selection as GqlSelection, SelectionSet, Type,
    TypeCondition, Value, VariableDefinition,
};
use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn root_type_name(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
        }
    }
}

/// The operation picked from a GraphQL document, with variables substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: IndexMap<String, JsonValue>,
    /// Set on selections of inline fragments: they apply to objects of this type only.
    pub type_condition: Option<String>,
    pub nested: Vec<Selection>,
}

impl Selection {
    /// Key of the selection in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn applies_to(&self, type_name: &str, interfaces: &[String]) -> bool {
        match &self.type_condition {
            None => true,
            Some(condition) => condition == type_name || interfaces.iter().any(|i| i == condition),
        }
    }
}

/// Protocol adapter for GraphQL -> Operation.
///
/// GraphQL is mapped as following:
/// - `query { ... }` and single selection blocks `{ ... }` become read operations.
/// - `mutation { ... }` becomes a write operation. Its fields run one after another.
/// - If the request names an operation, only that operation is picked. Documents with
///   several operations require a name.
/// - Variables are substituted, falling back to the defaults of their definitions.
/// - Inline fragments are flattened into their parent selection, keeping the type condition.
/// - `@skip` and `@include` on fields are evaluated here.
///
/// Currently unsupported features:
/// - Named fragments.
/// - Subscription queries.
pub struct GraphQLProtocolAdapter;

type Variables = IndexMap<String, JsonValue>;

impl GraphQLProtocolAdapter {
    pub fn convert(
        document: Document<'_, String>,
        operation_name: Option<&str>,
        variables: &IndexMap<String, JsonValue>,
    ) -> Result<Operation> {
        let mut operations = Vec::with_capacity(document.definitions.len());

        for definition in document.definitions {
            match definition {
                Definition::Operation(op) => operations.push(op),
                Definition::Fragment(f) => {
                    return Err(HandlerError::unsupported_feature(
                        "Fragment definition",
                        format!("Fragment '{}', at position {}.", f.name, f.position),
                    ))
                }
            }
        }

        let operation = match operation_name {
            Some(name) => operations
                .into_iter()
                .find(|op| Self::matches_operation(op, name))
                .ok_or_else(|| HandlerError::query_conversion(format!("Operation '{name}' does not match any query.")))?,

            None if operations.len() > 1 => {
                return Err(HandlerError::query_conversion(
                    "The document contains several operations, an operation name is required.",
                ))
            }

            None => operations
                .pop()
                .ok_or_else(|| HandlerError::query_conversion("Document contained no operations."))?,
        };

        Self::convert_operation(operation, variables)
    }

    fn convert_operation(operation: OperationDefinition<'_, String>, given: &Variables) -> Result<Operation> {
        let (kind, definitions, selection_set) = match operation {
            OperationDefinition::SelectionSet(s) => (OperationKind::Query, Vec::new(), s),
            OperationDefinition::Query(q) => (OperationKind::Query, q.variable_definitions, q.selection_set),
            OperationDefinition::Mutation(m) => (OperationKind::Mutation, m.variable_definitions, m.selection_set),
            OperationDefinition::Subscription(s) => {
                return Err(HandlerError::unsupported_feature(
                    "Subscription query",
                    format!("At position {}.", s.position),
                ))
            }
        };

        let variables = Self::resolve_variables(definitions, given)?;
        let selections = Self::convert_selection_set(selection_set, &variables, None)?;

        Ok(Operation { kind, selections })
    }

    /// Values of the declared variables: given, defaulted or null. Missing values of
    /// non-null variables without default are rejected.
    fn resolve_variables(definitions: Vec<VariableDefinition<'_, String>>, given: &Variables) -> Result<Variables> {
        let mut variables = IndexMap::with_capacity(definitions.len());

        for definition in definitions {
            let required = matches!(definition.var_type, Type::NonNullType(_));

            // An explicit null overrides the default.
            let value = match (given.get(&definition.name), definition.default_value) {
                (Some(JsonValue::Null), _) if required => {
                    return Err(HandlerError::query_conversion(format!(
                        "Variable `${}` of required type `{}` must not be null.",
                        definition.name, definition.var_type
                    )))
                }
                (Some(value), _) => value.clone(),
                (None, Some(default)) => Self::convert_value(default, &IndexMap::new())?,
                (None, None) if required => {
                    return Err(HandlerError::query_conversion(format!(
                        "Variable `${}` of required type `{}` was not provided.",
                        definition.name, definition.var_type
                    )))
                }
                (None, None) => JsonValue::Null,
            };

            variables.insert(definition.name, value);
        }

        Ok(variables)
    }

    fn convert_selection_set(
        selection_set: SelectionSet<'_, String>,
        variables: &Variables,
        type_condition: Option<&str>,
    ) -> Result<Vec<Selection>> {
        let mut selections = Vec::with_capacity(selection_set.items.len());

        for item in selection_set.items {
            match item {
                GqlSelection::Field(f) => {
                    if !Self::is_included(&f.directives, variables)? {
                        continue;
                    }

                    let arguments = f
                        .arguments
                        .into_iter()
                        .map(|(k, v)| Ok((k, Self::convert_value(v, variables)?)))
                        .collect::<Result<IndexMap<_, _>>>()?;

                    selections.push(Selection {
                        name: f.name,
                        alias: f.alias,
                        arguments,
                        type_condition: type_condition.map(ToOwned::to_owned),
                        nested: Self::convert_selection_set(f.selection_set, variables, None)?,
                    });
                }

                GqlSelection::FragmentSpread(fs) => {
                    return Err(HandlerError::unsupported_feature(
                        "Fragment spread",
                        format!("Fragment '{}', at position {}.", fs.fragment_name, fs.position),
                    ))
                }

                GqlSelection::InlineFragment(i) => {
                    if !Self::is_included(&i.directives, variables)? {
                        continue;
                    }

                    let condition = match &i.type_condition {
                        Some(TypeCondition::On(name)) => Some(name.as_str()),
                        None => type_condition,
                    };

                    selections.extend(Self::convert_selection_set(i.selection_set, variables, condition)?);
                }
            }
        }

        Ok(selections)
    }

    /// Evaluates `@skip(if:)` and `@include(if:)`.
    fn is_included(directives: &[Directive<'_, String>], variables: &Variables) -> Result<bool> {
        for directive in directives {
            let skip_when = match directive.name.as_str() {
                "skip" => true,
                "include" => false,
                _ => continue,
            };

            let condition = directive
                .arguments
                .iter()
                .find(|(name, _)| name == "if")
                .map(|(_, value)| Self::convert_value(value.clone(), variables))
                .transpose()?;

            match condition {
                Some(JsonValue::Bool(b)) if b == skip_when => return Ok(false),
                Some(JsonValue::Bool(_)) => (),
                _ => {
                    return Err(HandlerError::query_conversion(format!(
                        "The @{} directive requires a boolean `if` argument.",
                        directive.name
                    )))
                }
            }
        }

        Ok(true)
    }

    /// Checks if the given GraphQL definition matches the operation name that should be executed.
    fn matches_operation(def: &OperationDefinition<'_, String>, operation: &str) -> bool {
        let check = |n: Option<&String>| n.filter(|name| name.as_str() == operation).is_some();

        match def {
            OperationDefinition::Subscription(s) => check(s.name.as_ref()),
            OperationDefinition::SelectionSet(_) => false,
            OperationDefinition::Query(q) => check(q.name.as_ref()),
            OperationDefinition::Mutation(m) => check(m.name.as_ref()),
        }
    }

    fn convert_value(value: Value<'_, String>, variables: &Variables) -> Result<JsonValue> {
        match value {
            Value::Variable(name) => variables
                .get(&name)
                .cloned()
                .ok_or_else(|| HandlerError::query_conversion(format!("Variable `${name}` is not defined."))),
            Value::Int(i) => match i.as_i64() {
                Some(i) => Ok(JsonValue::from(i)),
                None => Err(HandlerError::query_conversion(format!("Invalid 64 bit integer: {i:?}"))),
            },
            Value::Float(f) => match Number::from_f64(f) {
                Some(number) => Ok(JsonValue::Number(number)),
                None => Err(HandlerError::query_conversion(format!("Invalid 64 bit float: {f:?}"))),
            },
            Value::String(s) => Ok(JsonValue::String(s)),
            Value::Boolean(b) => Ok(JsonValue::Bool(b)),
            Value::Null => Ok(JsonValue::Null),
            Value::Enum(e) => Ok(JsonValue::String(e)),
            Value::List(values) => {
                let values = values
                    .into_iter()
                    .map(|v| Self::convert_value(v, variables))
                    .collect::<Result<Vec<JsonValue>>>()?;

                Ok(JsonValue::Array(values))
            }
            Value::Object(map) => {
                let values = map
                    .into_iter()
                    .map(|(k, v)| Self::convert_value(v, variables).map(|v| (k, v)))
                    .collect::<Result<serde_json::Map<String, JsonValue>>>()?;

                Ok(JsonValue::Object(values))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn convert(query: &str, operation_name: Option<&str>, variables: JsonValue) -> Result<Operation> {
        let document = graphql_parser::parse_query::<String>(query).unwrap();
        let variables: Variables = serde_json::from_value(variables).unwrap();

        GraphQLProtocolAdapter::convert(document, operation_name, &variables)
    }

    #[test]
    fn variables_and_defaults_are_substituted() {
        let operation = convert(
            indoc! {r#"
                mutation Delete($id: ID!, $other: ID = "7") {
                    first: deleteCat(id: $id) { found }
                    second: deleteCat(id: $other) { found }
                }
            "#},
            None,
            json!({ "id": "1" }),
        )
        .unwrap();

        assert_eq!(operation.kind, OperationKind::Mutation);
        assert_eq!(operation.selections[0].response_key(), "first");
        assert_eq!(operation.selections[0].arguments["id"], json!("1"));
        assert_eq!(operation.selections[1].arguments["id"], json!("7"));
        assert_eq!(operation.selections[1].nested[0].name, "found");
    }

    #[test]
    fn missing_required_variables_are_rejected() {
        let err = convert("mutation ($id: ID!) { deleteCat(id: $id) { found } }", None, json!({})).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Variable `$id` of required type `ID!` was not provided."
        );
    }

    #[test]
    fn explicit_nulls_override_defaults() {
        let operation = convert(
            r#"mutation ($id: ID = "1") { deleteDog(id: $id) { found } }"#,
            None,
            json!({ "id": null }),
        )
        .unwrap();

        assert_eq!(operation.selections[0].arguments["id"], JsonValue::Null);

        let err = convert("mutation ($id: ID!) { deleteDog(id: $id) { found } }", None, json!({ "id": null })).unwrap_err();

        assert_eq!(err.to_string(), "Variable `$id` of required type `ID!` must not be null.");
    }

    #[test]
    fn operations_are_picked_by_name() {
        let query = indoc! {r#"
            query Lookup { cat(id: "1") { name } }
            mutation Remove { deleteCat(id: "1") { found } }
        "#};

        let operation = convert(query, Some("Remove"), json!({})).unwrap();
        assert_eq!(operation.kind, OperationKind::Mutation);

        let err = convert(query, None, json!({})).unwrap_err();
        assert!(matches!(err, HandlerError::QueryConversion(_)));

        let err = convert(query, Some("Missing"), json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Operation 'Missing' does not match any query.");
    }

    #[test]
    fn inline_fragments_keep_their_type_condition() {
        let operation = convert(
            r#"{ node(id: "Q2F0Tm9kZTox") { id ... on CatNode { name } } }"#,
            None,
            json!({}),
        )
        .unwrap();

        let nested = &operation.selections[0].nested;

        assert_eq!(nested[0].type_condition, None);
        assert_eq!(nested[1].name, "name");
        assert_eq!(nested[1].type_condition.as_deref(), Some("CatNode"));
        assert!(nested[1].applies_to("CatNode", &[]));
        assert!(!nested[1].applies_to("DogNode", &["Node".to_owned()]));
    }

    #[test]
    fn skip_and_include_directives() {
        let operation = convert(
            "query ($full: Boolean!) { cat(id: 1) { name @include(if: $full) id @skip(if: true) } }",
            None,
            json!({ "full": false }),
        )
        .unwrap();

        assert!(operation.selections[0].nested.is_empty());
    }

    #[test]
    fn named_fragments_are_unsupported() {
        let err = convert(
            "{ cat(id: 1) { ...CatFields } } fragment CatFields on Cat { name }",
            None,
            json!({}),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            HandlerError::UnsupportedFeature {
                feature_name: "Fragment definition",
                ..
            }
        ));
    }
}
