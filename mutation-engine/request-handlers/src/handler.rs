use crate::{
    serializer::Serializer, GQLError, GQLResponse, GraphqlBody, Operation, OperationKind, Result,
    Selection,
};
use cud_core::{CoreError, MutationContext, MutationExecutor};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info_span;
use tracing_futures::Instrument;

/// Answers GraphQL requests against a mutation schema.
///
/// Root fields are resolved one after another, in document order. A failing field is
/// answered with `null` and an error pointing at its response key. The other fields are
/// still resolved.
pub struct RequestHandler {
    executor: Arc<MutationExecutor>,
}

impl RequestHandler {
    pub fn new(executor: Arc<MutationExecutor>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Arc<MutationExecutor> {
        &self.executor
    }

    pub async fn handle(&self, body: GraphqlBody, ctx: &MutationContext) -> GQLResponse {
        let span = info_span!("cud:request", operation_name = ?body.operation_name);

        async move {
            let operation = match body.into_operation() {
                Ok(operation) => operation,
                Err(err) => {
                    tracing::warn!(error = %err, "rejected request");
                    return GQLResponse::from(err);
                }
            };

            self.handle_operation(operation, ctx).await
        }
        .instrument(span)
        .await
    }

    async fn handle_operation(&self, operation: Operation, ctx: &MutationContext) -> GQLResponse {
        let mut response = GQLResponse::with_capacity(operation.selections.len());
        let root = operation.kind.root_type_name();

        for selection in operation.selections.iter().filter(|s| s.applies_to(root, &[])) {
            let key = selection.response_key().to_owned();

            let result = match operation.kind {
                OperationKind::Mutation => self.resolve_mutation(selection, ctx).await,
                OperationKind::Query => self.resolve_query(selection).await,
            };

            match result {
                Ok(value) => response.insert_data(key, value),
                Err(err) => {
                    response.insert_data(key.clone(), JsonValue::Null);
                    response.insert_error(GQLError::from(err).at(key));
                }
            }
        }

        response
    }

    async fn resolve_mutation(&self, selection: &Selection, ctx: &MutationContext) -> Result<JsonValue> {
        if selection.name == "__typename" {
            return Ok(JsonValue::from(OperationKind::Mutation.root_type_name()));
        }

        let result = self
            .executor
            .execute(&selection.name, selection.arguments.clone(), ctx)
            .await?;

        Serializer::new(&self.executor)
            .serialize_mutation(&result, &selection.nested)
            .await
    }

    async fn resolve_query(&self, selection: &Selection) -> Result<JsonValue> {
        if selection.name == "__typename" {
            return Ok(JsonValue::from(OperationKind::Query.root_type_name()));
        }

        let query_schema = self.executor.schema().query_schema();
        let field = query_schema
            .find_query_field(&selection.name)
            .ok_or_else(|| CoreError::UnknownField {
                field_name: selection.name.clone(),
                type_name: OperationKind::Query.root_type_name().to_owned(),
            })?;

        let id = match selection.arguments.get("id") {
            Some(JsonValue::String(id)) => id.clone(),
            Some(JsonValue::Number(id)) => id.to_string(),
            _ => {
                return Err(CoreError::MissingRequiredValue {
                    path: format!("{}.id", selection.name),
                }
                .into())
            }
        };

        let serializer = Serializer::new(&self.executor);

        if field.name == "node" {
            return match self.executor.node(&id).await? {
                Some((type_name, record)) => serializer.serialize_record(&type_name, &record, &selection.nested).await,
                None => Ok(JsonValue::Null),
            };
        }

        match self.executor.lookup(field.source(), &id).await? {
            Some(record) => {
                serializer
                    .serialize_record(field.field_type.named_type(), &record, &selection.nested)
                    .await
            }
            None => Ok(JsonValue::Null),
        }
    }
}
