use cud_connector::{error::ErrorKind, Connector, Filter, RelationFilter, ScalarCondition, ScalarFilter, WriteArgs};
use cud_models::{convert, CudValue, InternalDataModelRef};
use memory_connector::InMemoryConnector;
use pretty_assertions::assert_eq;
use serde_json::json;

fn datamodel() -> InternalDataModelRef {
    convert(
        r#"{
          "models": [
            {
              "name": "User",
              "fields": [
                { "name": "username", "type": "String", "unique": true },
                { "name": "age", "type": "Int", "null": true }
              ]
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
              "fields": [
                { "name": "name", "type": "String" },
                { "name": "walker", "type": "ForeignKey", "to": "User", "null": true, "onDelete": "SET_NULL" },
                { "name": "vet", "type": "ForeignKey", "to": "Vet", "null": true, "onDelete": "PROTECT" }
              ]
            },
            { "name": "Vet", "fields": [{ "name": "name", "type": "String" }] }
          ]
        }"#,
    )
    .unwrap()
}

fn seeded() -> InMemoryConnector {
    let connector = InMemoryConnector::new(datamodel());

    connector
        .seed(&json!({
            "User": [
                { "username": "jon", "age": 30 },
                { "username": "liz" }
            ],
            "Vet": [{ "name": "Dr. Paws" }],
            "Dog": [
                { "name": "Odie", "walker": 2 },
                { "name": "Rex", "vet": 1 }
            ],
            "Cat": [
                { "name": "Garfield", "owner": 1, "enemies": [1, 2] },
                { "name": "Nermal", "owner": 2 }
            ]
        }))
        .unwrap();

    connector
}

fn names(records: &[cud_models::Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get("name").or_else(|| r.get("username")).unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn creating_assigns_autoincrement_ids_and_defaults() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let user = dm.assert_model("User");
    let mut conn = connector.get_connection().await.unwrap();

    let mut args = WriteArgs::new();
    args.insert("username", "odie");

    let record = conn.create_record(&user, args).await.unwrap();

    assert_eq!(record.get("id"), Some(&CudValue::Int(3)));
    assert_eq!(record.get("age"), Some(&CudValue::Null));
}

#[tokio::test]
async fn unique_and_null_constraints_are_enforced() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let user = dm.assert_model("User");
    let cat = dm.assert_model("Cat");
    let mut conn = connector.get_connection().await.unwrap();

    let mut args = WriteArgs::new();
    args.insert("username", "jon");
    let err = conn.create_record(&user, args).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UniqueConstraintViolation { ref field_name } if field_name == "User.username"));
    assert_eq!(err.user_facing_error.unwrap().error_code, "C2007");

    let mut args = WriteArgs::new();
    args.insert("name", "Arlene");
    let err = conn.create_record(&cat, args).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NullConstraintViolation { ref field_name } if field_name == "Cat.owner"));

    let mut args = WriteArgs::new();
    args.insert("name", "Arlene");
    args.insert("owner", 42);
    let err = conn.create_record(&cat, args).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignKeyConstraintViolation { .. }));

    assert_eq!(connector.records("Cat").len(), 2);
}

#[tokio::test]
async fn relation_filters_traverse_all_relation_kinds() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let cat = dm.assert_model("Cat");
    let user = dm.assert_model("User");
    let dog = dm.assert_model("Dog");
    let mut conn = connector.get_connection().await.unwrap();

    // Forward foreign key.
    let owned_by_jon = Filter::from(RelationFilter::new("owner", Filter::equals("username", "jon")));
    let cats = conn.get_many_records(&cat, &owned_by_jon).await.unwrap();
    assert_eq!(names(&cats), vec!["Garfield"]);

    // Reverse foreign key.
    let owns_nermal = Filter::from(RelationFilter::new("cats", Filter::equals("name", "Nermal")));
    let users = conn.get_many_records(&user, &owns_nermal).await.unwrap();
    assert_eq!(names(&users), vec!["liz"]);

    // Reverse many-to-many, then a scalar condition on the related ids.
    let hated_by_garfield = Filter::from(RelationFilter::new("enemies", Filter::equals("name", "Garfield")));
    let dogs = conn.get_many_records(&dog, &hated_by_garfield).await.unwrap();
    assert_eq!(names(&dogs), vec!["Odie", "Rex"]);

    let enemy_of_dog_two = Filter::Scalar(ScalarFilter {
        field: "enemies".to_owned(),
        condition: ScalarCondition::In(vec![CudValue::Int(2)]),
    });
    let cats = conn.get_many_records(&cat, &enemy_of_dog_two).await.unwrap();
    assert_eq!(names(&cats), vec!["Garfield"]);
}

#[tokio::test]
async fn deleting_cascades_and_sets_null() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let user = dm.assert_model("User");
    let mut conn = connector.get_connection().await.unwrap();

    let deleted = conn.delete_records(&user, &Filter::equals("id", 2)).await.unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(names(&connector.records("Cat")), vec!["Garfield"]);
    assert_eq!(connector.records("Dog")[0].get("walker"), Some(&CudValue::Null));
}

#[tokio::test]
async fn protected_references_block_deletion() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let vet = dm.assert_model("Vet");
    let mut conn = connector.get_connection().await.unwrap();

    let err = conn.delete_records(&vet, &Filter::empty()).await.unwrap_err();

    assert!(matches!(err.kind, ErrorKind::ForeignKeyConstraintViolation { ref field_name } if field_name == "Dog.vet"));
    assert_eq!(connector.records("Vet").len(), 1);
}

#[tokio::test]
async fn deleting_removes_join_rows() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let dog = dm.assert_model("Dog");
    let enemies = dm.assert_model("Cat").assert_relation_field("enemies").clone();
    let mut conn = connector.get_connection().await.unwrap();

    conn.delete_records(&dog, &Filter::equals("id", 1)).await.unwrap();

    let ids = conn
        .get_related_m2m_record_ids(&enemies, &CudValue::Int(1))
        .await
        .unwrap();

    assert_eq!(ids, vec![CudValue::Int(2)]);
}

#[tokio::test]
async fn connecting_and_disconnecting_many_to_many() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let reverse = dm.assert_model("Dog").assert_relation_field("enemies").clone();
    let mut conn = connector.get_connection().await.unwrap();

    conn.m2m_connect(&reverse, &CudValue::Int(1), &[CudValue::Int(2)])
        .await
        .unwrap();
    assert_eq!(
        conn.get_related_m2m_record_ids(&reverse, &CudValue::Int(1)).await.unwrap(),
        vec![CudValue::Int(1), CudValue::Int(2)]
    );

    conn.m2m_disconnect(&reverse, &CudValue::Int(1), &[CudValue::Int(1)])
        .await
        .unwrap();
    assert_eq!(
        conn.get_related_m2m_record_ids(&reverse, &CudValue::Int(1)).await.unwrap(),
        vec![CudValue::Int(2)]
    );

    let err = conn
        .m2m_connect(&reverse, &CudValue::Int(1), &[CudValue::Int(99)])
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignKeyConstraintViolation { .. }));
}

#[tokio::test]
async fn updates_are_all_or_nothing() {
    let connector = seeded();
    let dm = connector.datamodel().clone();
    let user = dm.assert_model("User");
    let mut conn = connector.get_connection().await.unwrap();

    let mut args = WriteArgs::new();
    args.insert("username", "same");
    let err = conn.update_records(&user, &Filter::empty(), args).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UniqueConstraintViolation { .. }));
    assert_eq!(names(&connector.records("User")), vec!["jon", "liz"]);

    let mut args = WriteArgs::new();
    args.insert("age", 5);
    let updated = conn
        .update_records(&user, &Filter::equals("username", "liz"), args)
        .await
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].get("age"), Some(&CudValue::Int(5)));
}
