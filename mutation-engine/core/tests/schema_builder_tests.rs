mod common;

use common::*;
use cud_core::{CoreError, EngineConfig, MutationKind, MutationOptions, SchemaBuilder};
use indoc::indoc;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn field_names(fields: impl IntoIterator<Item = String>) -> Vec<String> {
    fields.into_iter().collect()
}

#[test]
fn delete_mutations_expose_the_deleted_ids() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(MutationOptions::new("Cat", MutationKind::Delete));
    let schema = builder.build().unwrap();
    let query_schema = schema.query_schema();

    let field = query_schema.find_mutation_field("deleteCat").unwrap();
    let arguments: Vec<String> = field
        .arguments()
        .iter()
        .map(|arg| format!("{}: {}", arg.name, arg.field_type))
        .collect();

    assert_eq!(arguments, vec!["id: ID!"]);
    assert_eq!(field.field_type.to_string(), "DeleteCatMutation");

    let payload = query_schema.object("DeleteCatMutation").unwrap();

    assert_eq!(
        field_names(payload.get_fields().iter().map(|f| format!("{}: {}", f.name, f.field_type))),
        vec!["found: Boolean", "deletedInputId: ID", "deletedId: ID", "deletedRawId: ID"]
    );
    assert_eq!(payload.find_field("deletedRawId").unwrap().source(), "deleted_raw_id");
}

#[test]
fn snake_case_schemas_keep_model_names() {
    let connector = seeded_connector();
    let mut builder = builder(&connector).auto_camelcase(false);
    builder.mutation(MutationOptions::new("Cat", MutationKind::BatchDelete));
    let schema = builder.build().unwrap();
    let query_schema = schema.query_schema();

    let field = query_schema.find_mutation_field("batch_delete_cat").unwrap();
    assert_eq!(field.find_argument("ids").unwrap().field_type.to_string(), "[ID]!");

    let payload = query_schema.object("BatchDeleteCatMutation").unwrap();
    assert_eq!(
        field_names(payload.get_fields().iter().map(|f| f.name.clone())),
        vec!["deletion_count", "deleted_ids", "missed_ids"]
    );
}

#[test]
fn write_inputs_follow_the_model() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(MutationOptions::new("Cat", MutationKind::Create));
    builder.mutation(MutationOptions::new("Cat", MutationKind::Patch));
    builder.mutation(MutationOptions::new("Cat", MutationKind::BatchUpdate));
    let schema = builder.build().unwrap();
    let query_schema = schema.query_schema();

    let rendered = |name: &str| -> Vec<String> {
        query_schema
            .input_object(name)
            .unwrap()
            .get_fields()
            .iter()
            .map(|f| format!("{}: {}", f.name, f.field_type))
            .collect()
    };

    assert_eq!(rendered("CreateCatInput"), vec!["name: String!", "owner: ID!", "enemies: [ID]"]);
    assert_eq!(rendered("PatchCatInput"), vec!["name: String", "owner: ID", "enemies: [ID]"]);
    assert_eq!(
        rendered("BatchUpdateCatInput"),
        vec!["id: ID!", "name: String!", "owner: ID!", "enemies: [ID]"]
    );

    let batch = query_schema.find_mutation_field("batchUpdateCat").unwrap();
    assert_eq!(
        batch.find_argument("input").unwrap().field_type.to_string(),
        "[BatchUpdateCatInput!]!"
    );
}

#[test]
fn mutations_need_a_registered_type() {
    let connector = seeded_connector();
    let mut builder = builder_with_types(&connector, &["User", "Dog"]);
    builder.mutation(MutationOptions::new("Cat", MutationKind::Delete));

    let err = builder.build().unwrap_err();

    assert!(matches!(err, CoreError::ModelTypeNotRegistered(model) if model == "Cat"));
}

#[test]
fn duplicate_field_names_are_rejected() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(MutationOptions::new("Cat", MutationKind::Delete));
    builder.mutation(MutationOptions::new("Cat", MutationKind::Delete));

    let err = builder.build().unwrap_err();

    assert_eq!(err.to_string(), "The mutation field deleteCat is defined twice.");
}

#[test]
#[traced_test]
fn building_from_a_toml_config() {
    let connector = seeded_connector();
    let config = EngineConfig::from_toml(indoc! {r#"
        generateAll = true

        [[types]]
        model = "User"

        [[types]]
        model = "Dog"

        [[types]]
        model = "Cat"
        name = "CatNode"
        globalId = true

        [[mutations]]
        model = "Cat"
        kind = "filterDelete"
        filterFields = ["name__icontains"]
    "#})
    .unwrap();

    let schema = SchemaBuilder::from_config(connector.datamodel().clone(), &config)
        .unwrap()
        .build()
        .unwrap();

    let mut fields: Vec<&str> = schema.mutations().map(|def| def.field_name.as_str()).collect();
    fields.sort_unstable();

    assert_eq!(fields.len(), 13);
    assert!(fields.contains(&"filterDeleteCat"));
    assert!(fields.contains(&"patchDog"));

    let node = schema.query_schema().object("CatNode").unwrap();
    assert!(node.implements("Node"));
    assert!(schema.query_schema().find_query_field("node").is_some());

    assert!(logs_contain("built mutation schema"));
}
