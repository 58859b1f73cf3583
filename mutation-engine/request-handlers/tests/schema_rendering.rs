use cud_core::{MutationKind, MutationOptions, ModelTypeOptions, SchemaBuilder};
use cud_models::convert;
use expect_test::expect;
use request_handlers::render_graphql_schema;

fn builder(models: &str) -> SchemaBuilder {
    SchemaBuilder::new(convert(models).unwrap())
}

#[test]
fn delete_only_schema() {
    let mut builder = builder(
        r#"{ "models": [{ "name": "User", "fields": [{ "name": "username", "type": "String", "unique": true }] }] }"#,
    );

    builder.register_type(ModelTypeOptions::new("User")).unwrap();
    builder.mutation(MutationOptions::new("User", MutationKind::Delete));

    let schema = builder.build().unwrap();

    let expected = expect![[r#"
        type Query {
          user(id: ID!): User
        }

        type Mutation {
          deleteUser(id: ID!): DeleteUserMutation
        }

        type User {
          id: ID!
          username: String!
        }

        type DeleteUserMutation {
          found: Boolean
          deletedInputId: ID
          deletedId: ID
          deletedRawId: ID
        }"#]];

    expected.assert_eq(&render_graphql_schema(schema.query_schema()));
}

#[test]
fn global_ids_enums_and_custom_scalars() {
    let mut builder = builder(
        r#"{
          "models": [
            {
              "name": "Cat",
              "fields": [
                { "name": "name", "type": "String", "helpText": "What the cat answers to." },
                {
                  "name": "mood",
                  "type": "String",
                  "choices": [["grumpy", "Grumpy"], ["sleepy", "Sleepy"]]
                },
                { "name": "born", "type": "Date", "null": true }
              ]
            }
          ]
        }"#,
    );

    builder
        .register_type(ModelTypeOptions::new("Cat").named("CatNode").with_global_id())
        .unwrap();
    builder.mutation(MutationOptions::new("Cat", MutationKind::Patch));

    let schema = builder.build().unwrap();
    let rendered = render_graphql_schema(schema.query_schema());

    assert!(rendered.contains("node(id: ID!): Node\n"), "{rendered}");
    assert!(rendered.contains("interface Node {\n  id: ID!\n}"), "{rendered}");
    assert!(rendered.contains("type CatNode implements Node {\n  id: ID!\n"), "{rendered}");
    assert!(rendered.contains("  \"\"\"What the cat answers to.\"\"\"\n  name: String!\n"), "{rendered}");
    assert!(rendered.contains("  \"\"\"Grumpy\"\"\"\n  GRUMPY\n"), "{rendered}");
    assert!(rendered.contains("  born: Date\n"), "{rendered}");
    assert!(
        rendered.contains("  patchCat(\n    id: ID!\n    input: PatchCatInput!\n  ): PatchCatMutation\n"),
        "{rendered}"
    );
    assert!(rendered.ends_with("\n\nscalar Date"), "{rendered}");
}
