use cud_core::{
    to_global_id, ContextUser, MutationContext, MutationExecutor, MutationKind, MutationOptions, ModelTypeOptions,
    SchemaBuilder,
};
use cud_models::{convert, InternalDataModelRef};
use indoc::indoc;
use memory_connector::InMemoryConnector;
use pretty_assertions::assert_eq;
use request_handlers::{GQLResponse, GraphqlBody, RequestHandler};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

fn datamodel() -> InternalDataModelRef {
    convert(
        r#"{
          "models": [
            {
              "name": "User",
              "fields": [{ "name": "username", "type": "String", "unique": true }]
            },
            {
              "name": "Cat",
              "fields": [
                { "name": "name", "type": "String" },
                { "name": "owner", "type": "ForeignKey", "to": "User", "relatedName": "cats" },
                { "name": "enemies", "type": "ManyToMany", "to": "Dog", "relatedName": "enemies" }
              ]
            },
            {
              "name": "Dog",
              "fields": [{ "name": "name", "type": "String" }]
            }
          ]
        }"#,
    )
    .unwrap()
}

fn connector() -> Arc<InMemoryConnector> {
    let connector = InMemoryConnector::new(datamodel());

    connector
        .seed(&json!({
            "User": [{ "username": "jon" }, { "username": "liz" }],
            "Dog": [{ "name": "Odie" }, { "name": "Rex" }],
            "Cat": [
                { "name": "Garfield", "owner": 1, "enemies": [1] },
                { "name": "Nermal", "owner": 2 }
            ]
        }))
        .unwrap();

    Arc::new(connector)
}

/// Cats are exposed as `CatNode` with global ids, the other models with raw ids.
fn handler(mutations: Vec<MutationOptions>) -> RequestHandler {
    let connector = connector();
    let mut builder = SchemaBuilder::new(connector.datamodel().clone());

    builder.register_type(ModelTypeOptions::new("User")).unwrap();
    builder.register_type(ModelTypeOptions::new("Dog")).unwrap();
    builder
        .register_type(ModelTypeOptions::new("Cat").named("CatNode").with_global_id())
        .unwrap();

    for options in mutations {
        builder.mutation(options);
    }

    let executor = MutationExecutor::new(Arc::new(builder.build().unwrap()), connector);

    RequestHandler::new(Arc::new(executor))
}

fn body(query: &str, variables: JsonValue) -> GraphqlBody {
    GraphqlBody::new(query).with_variables(serde_json::from_value(variables).unwrap())
}

fn to_json(response: &GQLResponse) -> JsonValue {
    serde_json::to_value(response).unwrap()
}

fn error_codes(response: &GQLResponse) -> Vec<Option<&str>> {
    response.errors().map(|err| err.code()).collect()
}

#[tokio::test]
async fn deleting_by_global_id() {
    let handler = handler(vec![MutationOptions::new("Cat", MutationKind::Delete)]);
    let garfield = to_global_id("CatNode", "1");

    let response = handler
        .handle(
            body(
                indoc! {r#"
                    mutation Remove($id: ID!) {
                        gone: deleteCat(id: $id) { found deletedId deletedRawId deletedInputId }
                        again: deleteCat(id: $id) { found deletedId }
                    }
                "#},
                json!({ "id": garfield }),
            ),
            &MutationContext::anonymous(),
        )
        .await;

    assert_eq!(
        to_json(&response),
        json!({
            "data": {
                "gone": {
                    "found": true,
                    "deletedId": garfield,
                    "deletedRawId": "1",
                    "deletedInputId": garfield
                },
                "again": { "found": false, "deletedId": null }
            }
        })
    );
}

#[tokio::test]
async fn failing_fields_do_not_stop_the_request() {
    let handler = handler(vec![
        MutationOptions::new("Cat", MutationKind::Delete),
        MutationOptions::new("Dog", MutationKind::Delete).with_login_required(),
    ]);

    let response = handler
        .handle(
            body(
                r#"mutation { deleteDog(id: "1") { found } deleteCat(id: "2") { found __typename } }"#,
                json!({}),
            ),
            &MutationContext::anonymous(),
        )
        .await;

    assert_eq!(error_codes(&response), vec![Some("C1001")]);
    assert_eq!(response.errors().next().unwrap().path(), ["deleteDog"]);
    assert_eq!(
        JsonValue::Object(response.into_data().into_iter().collect()),
        json!({
            "deleteDog": null,
            "deleteCat": { "found": true, "__typename": "DeleteCatMutation" }
        })
    );
}

#[tokio::test]
async fn null_variables_do_not_fall_back_to_defaults() {
    let handler = handler(vec![MutationOptions::new("Dog", MutationKind::Delete)]);

    let response = handler
        .handle(
            body(
                r#"mutation ($id: ID = "1") { deleteDog(id: $id) { found deletedRawId } }"#,
                json!({ "id": null }),
            ),
            &MutationContext::anonymous(),
        )
        .await;

    assert_eq!(error_codes(&response), vec![Some("C2004")]);
    assert_eq!(
        JsonValue::Object(response.into_data().into_iter().collect()),
        json!({ "deleteDog": null })
    );

    let lookup = handler
        .handle(body(r#"{ dog(id: 1) { name } }"#, json!({})), &MutationContext::anonymous())
        .await;

    assert_eq!(to_json(&lookup), json!({ "data": { "dog": { "name": "Odie" } } }));
}

#[tokio::test]
async fn permissions_are_checked_per_user() {
    let handler = handler(vec![
        MutationOptions::new("Dog", MutationKind::Delete).with_permissions(["delete_dog"]),
    ]);
    let query = r#"mutation { deleteDog(id: "2") { found } }"#;

    let denied = handler
        .handle(body(query, json!({})), &MutationContext::for_user(ContextUser::new(1)))
        .await;

    assert_eq!(error_codes(&denied), vec![Some("C1002")]);

    let allowed = handler
        .handle(
            body(query, json!({})),
            &MutationContext::for_user(ContextUser::new(1).with_permissions(["delete_dog"])),
        )
        .await;

    assert_eq!(to_json(&allowed), json!({ "data": { "deleteDog": { "found": true } } }));
}

#[tokio::test]
async fn created_records_resolve_their_relations() {
    let handler = handler(vec![MutationOptions::new("Cat", MutationKind::Create)]);

    let response = handler
        .handle(
            body(
                indoc! {r#"
                    mutation ($input: CreateCatInput!) {
                        createCat(input: $input) {
                            cat { id name owner { username } enemies { name } __typename }
                        }
                    }
                "#},
                json!({ "input": { "name": "Arlene", "owner": "2", "enemies": ["2"] } }),
            ),
            &MutationContext::anonymous(),
        )
        .await;

    assert_eq!(
        to_json(&response),
        json!({
            "data": {
                "createCat": {
                    "cat": {
                        "id": to_global_id("CatNode", "3"),
                        "name": "Arlene",
                        "owner": { "username": "liz" },
                        "enemies": [{ "name": "Rex" }],
                        "__typename": "CatNode"
                    }
                }
            }
        })
    );
}

#[tokio::test]
async fn nodes_and_lookups() {
    let handler = handler(vec![MutationOptions::new("Cat", MutationKind::Delete)]);

    let response = handler
        .handle(
            body(
                indoc! {r#"
                    query ($node: ID!) {
                        node(id: $node) {
                            id
                            ... on CatNode { name owner { id cats { name } } }
                            ... on Dog { name }
                        }
                        dog(id: 1) { id name }
                        missing: user(id: "9") { id }
                    }
                "#},
                json!({ "node": to_global_id("CatNode", "2") }),
            ),
            &MutationContext::anonymous(),
        )
        .await;

    assert_eq!(
        to_json(&response),
        json!({
            "data": {
                "node": {
                    "id": to_global_id("CatNode", "2"),
                    "name": "Nermal",
                    "owner": { "id": "2", "cats": [{ "name": "Nermal" }] }
                },
                "dog": { "id": "1", "name": "Odie" },
                "missing": null
            }
        })
    );
}

#[tokio::test]
async fn unknown_fields_are_reported() {
    let handler = handler(vec![MutationOptions::new("Cat", MutationKind::Delete)]);

    let response = handler
        .handle(
            body(r#"mutation { deleteCat(id: "1") { found deleted } }"#, json!({})),
            &MutationContext::anonymous(),
        )
        .await;

    let error = response.errors().next().unwrap();

    assert_eq!(error.code(), Some("C2005"));
    assert_eq!(error.message(), "Cannot query field `deleted` on type `DeleteCatMutation`.");
}

#[tokio::test]
async fn unparsable_queries_fail_as_a_whole() {
    let handler = handler(vec![MutationOptions::new("Cat", MutationKind::Delete)]);

    let response = handler
        .handle(body("mutation { deleteCat(id: ", json!({})), &MutationContext::anonymous())
        .await;

    assert!(response.data.is_empty());
    assert_eq!(error_codes(&response), vec![Some("C2006")]);
}
