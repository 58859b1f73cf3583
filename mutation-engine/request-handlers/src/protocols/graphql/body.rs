use super::{GraphQLProtocolAdapter, Operation};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// A GraphQL request as sent over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlBody {
    pub query: String,
    pub operation_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_variables")]
    pub variables: IndexMap<String, JsonValue>,
}

impl GraphqlBody {
    pub fn new(query: impl Into<String>) -> Self {
        GraphqlBody {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn with_variables(mut self, variables: IndexMap<String, JsonValue>) -> Self {
        self.variables = variables;
        self
    }

    /// Parses the query and picks the operation to run.
    pub fn into_operation(self) -> crate::Result<Operation> {
        let document = graphql_parser::parse_query::<String>(&self.query)?;

        GraphQLProtocolAdapter::convert(document, self.operation_name.as_deref(), &self.variables)
    }
}

fn nullable_variables<'de, D>(deserializer: D) -> Result<IndexMap<String, JsonValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<IndexMap<String, JsonValue>>::deserialize(deserializer)?.unwrap_or_default())
}
