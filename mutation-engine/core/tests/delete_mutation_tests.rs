mod common;

use common::*;
use cud_core::{
    to_global_id, ContextUser, CoreError, ModelTypeOptions, MutationContext, MutationExecutor, MutationKind,
    MutationOptions,
};
use cud_models::CudValue;
use memory_connector::InMemoryConnector;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn delete_cat_with(hooks: Arc<RecordingHooks>, options: MutationOptions) -> (MutationExecutor, Arc<InMemoryConnector>) {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation_with_hooks(options, hooks);

    (executor(builder.build().unwrap(), &connector), connector)
}

#[tokio::test]
async fn deleting_by_raw_id() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(MutationOptions::new("Cat", MutationKind::Delete));
    let executor = executor(builder.build().unwrap(), &connector);

    let result = executor
        .execute("deleteCat", args(json!({ "id": "1" })), &MutationContext::anonymous())
        .await
        .unwrap();

    assert_eq!(result.payload_type, "DeleteCatMutation");
    assert_eq!(scalar(result.get("found")), CudValue::Boolean(true));
    assert_eq!(scalar(result.get("deleted_input_id")), CudValue::from("1"));
    assert_eq!(scalar(result.get("deleted_id")), CudValue::from("1"));
    assert_eq!(scalar(result.get("deleted_raw_id")), CudValue::from("1"));
    assert_eq!(names(&connector.records("Cat")), vec!["Nermal"]);
}

#[tokio::test]
async fn global_ids_are_accepted_and_returned() {
    let connector = seeded_connector();
    let mut builder = builder_with_types(&connector, &["User", "Dog"]);
    builder
        .register_type(ModelTypeOptions::new("Cat").named("CatNode").with_global_id())
        .unwrap();
    builder.mutation(MutationOptions::new("Cat", MutationKind::Delete));
    let executor = executor(builder.build().unwrap(), &connector);
    let ctx = MutationContext::anonymous();

    let result = executor
        .execute("deleteCat", args(json!({ "id": "Q2F0Tm9kZTox" })), &ctx)
        .await
        .unwrap();

    assert_eq!(scalar(result.get("found")), CudValue::Boolean(true));
    assert_eq!(scalar(result.get("deleted_input_id")), CudValue::from("Q2F0Tm9kZTox"));
    assert_eq!(scalar(result.get("deleted_id")), CudValue::from("Q2F0Tm9kZTox"));
    assert_eq!(scalar(result.get("deleted_raw_id")), CudValue::from("1"));

    // Raw ids work as well, the exposed id is still global.
    let result = executor.execute("deleteCat", args(json!({ "id": "2" })), &ctx).await.unwrap();

    assert_eq!(scalar(result.get("deleted_input_id")), CudValue::from("2"));
    assert_eq!(
        scalar(result.get("deleted_id")),
        CudValue::from(to_global_id("CatNode", "2"))
    );
    assert_eq!(scalar(result.get("deleted_raw_id")), CudValue::from("2"));
    assert!(connector.records("Cat").is_empty());
}

#[tokio::test]
async fn lifecycle_of_a_found_record() {
    let hooks = Arc::new(RecordingHooks::default());
    let options = MutationOptions::new("Cat", MutationKind::Delete).with_permissions(["cats.delete_cat"]);
    let (executor, _) = delete_cat_with(hooks.clone(), options);
    let ctx = MutationContext::for_user(ContextUser::new(1).with_permissions(["cats.delete_cat"]));

    executor.execute("deleteCat", args(json!({ "id": "1" })), &ctx).await.unwrap();

    assert_eq!(
        hooks.steps(),
        vec![
            "before_mutate",
            "validate",
            "check_permissions",
            "before_save",
            "after_mutate(found: true)"
        ]
    );
}

#[tokio::test]
async fn missing_records_are_reported_without_permission_checks() {
    let hooks = Arc::new(RecordingHooks::default());
    let options = MutationOptions::new("Cat", MutationKind::Delete).with_permissions(["cats.delete_cat"]);
    let (executor, connector) = delete_cat_with(hooks.clone(), options);

    // The caller lacks the permission, which only matters once there is a record.
    let ctx = MutationContext::for_user(ContextUser::new(1));

    let result = executor
        .execute("deleteCat", args(json!({ "id": "42" })), &ctx)
        .await
        .unwrap();

    assert_eq!(scalar(result.get("found")), CudValue::Boolean(false));
    assert_eq!(scalar(result.get("deleted_input_id")), CudValue::Null);
    assert_eq!(scalar(result.get("deleted_id")), CudValue::Null);
    assert_eq!(scalar(result.get("deleted_raw_id")), CudValue::Null);
    assert_eq!(
        hooks.steps(),
        vec!["before_mutate", "validate", "after_mutate(found: false)"]
    );
    assert_eq!(connector.records("Cat").len(), 2);
}

#[tokio::test]
async fn anonymous_callers_need_a_login() {
    let hooks = Arc::new(RecordingHooks::default());
    let options = MutationOptions::new("Cat", MutationKind::Delete).with_login_required();
    let (executor, connector) = delete_cat_with(hooks.clone(), options);

    let err = executor
        .execute("deleteCat", args(json!({ "id": "1" })), &MutationContext::anonymous())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::LoginRequired));
    assert_eq!(hooks.steps(), vec!["before_mutate"]);
    assert_eq!(connector.records("Cat").len(), 2);
}

#[tokio::test]
async fn missing_permissions_keep_the_record() {
    let hooks = Arc::new(RecordingHooks::default());
    let options = MutationOptions::new("Cat", MutationKind::Delete).with_permissions(["cats.delete_cat"]);
    let (executor, connector) = delete_cat_with(hooks.clone(), options);
    let ctx = MutationContext::for_user(ContextUser::new(1).with_permissions(["cats.view_cat"]));

    let err = executor
        .execute("deleteCat", args(json!({ "id": "1" })), &ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::PermissionDenied));
    assert_eq!(hooks.steps(), vec!["before_mutate", "validate", "check_permissions"]);
    assert_eq!(names(&connector.records("Cat")), vec!["Garfield", "Nermal"]);
}

#[tokio::test]
async fn superusers_hold_every_permission() {
    let hooks = Arc::new(RecordingHooks::default());
    let options = MutationOptions::new("Cat", MutationKind::Delete).with_permissions(["cats.delete_cat"]);
    let (executor, connector) = delete_cat_with(hooks, options);
    let ctx = MutationContext::for_user(ContextUser::new(2).superuser());

    let result = executor.execute("deleteCat", args(json!({ "id": "2" })), &ctx).await.unwrap();

    assert_eq!(scalar(result.get("found")), CudValue::Boolean(true));
    assert_eq!(names(&connector.records("Cat")), vec!["Garfield"]);
}

#[tokio::test]
async fn records_outside_the_scope_are_not_found() {
    let hooks = Arc::new(RecordingHooks {
        owner_scope: true,
        ..Default::default()
    });
    let (executor, connector) = delete_cat_with(hooks, MutationOptions::new("Cat", MutationKind::Delete));
    let ctx = MutationContext::for_user(ContextUser::new(1));

    // Nermal belongs to liz.
    let result = executor.execute("deleteCat", args(json!({ "id": "2" })), &ctx).await.unwrap();
    assert_eq!(scalar(result.get("found")), CudValue::Boolean(false));

    let result = executor.execute("deleteCat", args(json!({ "id": "1" })), &ctx).await.unwrap();
    assert_eq!(scalar(result.get("found")), CudValue::Boolean(true));

    assert_eq!(names(&connector.records("Cat")), vec!["Nermal"]);
}

#[tokio::test]
async fn before_save_can_swap_the_deleted_record() {
    let hooks = Arc::new(RecordingHooks {
        swap_deleted_for: Some(2),
        ..Default::default()
    });
    let (executor, connector) = delete_cat_with(hooks, MutationOptions::new("Cat", MutationKind::Delete));

    let result = executor
        .execute("deleteCat", args(json!({ "id": "1" })), &MutationContext::anonymous())
        .await
        .unwrap();

    assert_eq!(scalar(result.get("deleted_input_id")), CudValue::from("1"));
    assert_eq!(scalar(result.get("deleted_raw_id")), CudValue::from("2"));
    assert_eq!(names(&connector.records("Cat")), vec!["Garfield"]);
}

#[tokio::test]
async fn ids_of_the_wrong_type_are_input_errors() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(MutationOptions::new("Cat", MutationKind::Delete));
    let executor = executor(builder.build().unwrap(), &connector);

    let err = executor
        .execute("deleteCat", args(json!({ "id": "garfield" })), &MutationContext::anonymous())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "`garfield` is not a valid Cat id.");
}

#[tokio::test]
async fn deleting_a_user_cascades_to_owned_cats() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(MutationOptions::new("User", MutationKind::Delete));
    let executor = executor(builder.build().unwrap(), &connector);

    executor
        .execute("deleteUser", args(json!({ "id": 1 })), &MutationContext::anonymous())
        .await
        .unwrap();

    assert_eq!(names(&connector.records("Cat")), vec!["Nermal"]);

    let odie = &connector.records("Dog")[0];
    assert_eq!(odie.get("walker"), Some(&CudValue::Null));
}

#[tokio::test]
async fn batch_delete_reports_missed_ids_in_input_order() {
    let hooks = Arc::new(RecordingHooks::default());
    let (executor, connector) = delete_cat_with(hooks.clone(), MutationOptions::new("Cat", MutationKind::BatchDelete));

    let result = executor
        .execute(
            "batchDeleteCat",
            args(json!({ "ids": ["9", "2", null, "7", "1"] })),
            &MutationContext::anonymous(),
        )
        .await
        .unwrap();

    assert_eq!(scalar(result.get("deletion_count")), CudValue::Int(2));
    assert_eq!(id_strings(scalar(result.get("deleted_ids"))), vec!["1", "2"]);
    assert_eq!(id_strings(scalar(result.get("missed_ids"))), vec!["9", "7"]);
    assert!(connector.records("Cat").is_empty());
    assert_eq!(
        hooks.steps(),
        vec![
            "before_mutate",
            "check_permissions",
            "validate",
            "before_save",
            "after_mutate"
        ]
    );
}

#[tokio::test]
async fn batch_delete_respects_the_scope() {
    let hooks = Arc::new(RecordingHooks {
        owner_scope: true,
        ..Default::default()
    });
    let (executor, connector) = delete_cat_with(hooks, MutationOptions::new("Cat", MutationKind::BatchDelete));
    let ctx = MutationContext::for_user(ContextUser::new(2));

    let result = executor
        .execute("batchDeleteCat", args(json!({ "ids": ["1", "2"] })), &ctx)
        .await
        .unwrap();

    assert_eq!(scalar(result.get("deletion_count")), CudValue::Int(1));
    assert_eq!(id_strings(scalar(result.get("missed_ids"))), vec!["1"]);
    assert_eq!(names(&connector.records("Cat")), vec!["Garfield"]);
}

#[tokio::test]
async fn filter_delete_removes_matching_records() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(
        MutationOptions::new("Cat", MutationKind::FilterDelete)
            .with_filter_fields(["name__icontains", "owner__username"]),
    );
    let executor = executor(builder.build().unwrap(), &connector);
    let ctx = MutationContext::anonymous();

    let result = executor
        .execute("filterDeleteCat", args(json!({ "input": { "name_Icontains": "GAR" } })), &ctx)
        .await
        .unwrap();

    assert_eq!(result.payload_type, "FilterDeleteCatMutation");
    assert_eq!(scalar(result.get("deletion_count")), CudValue::Int(1));
    assert_eq!(id_strings(scalar(result.get("deleted_ids"))), vec!["1"]);

    let result = executor
        .execute("filterDeleteCat", args(json!({ "input": { "owner_Username": "jon" } })), &ctx)
        .await
        .unwrap();

    assert_eq!(scalar(result.get("deletion_count")), CudValue::Int(0));
    assert_eq!(names(&connector.records("Cat")), vec!["Nermal"]);
}

#[tokio::test]
async fn filter_delete_follows_relation_paths() {
    let connector = seeded_connector();
    let mut builder = builder(&connector);
    builder.mutation(MutationOptions::new("Cat", MutationKind::FilterDelete).with_filter_fields(["owner__username"]));
    let executor = executor(builder.build().unwrap(), &connector);

    let result = executor
        .execute(
            "filterDeleteCat",
            args(json!({ "input": { "owner_Username": "liz" } })),
            &MutationContext::anonymous(),
        )
        .await
        .unwrap();

    assert_eq!(scalar(result.get("deletion_count")), CudValue::Int(1));
    assert_eq!(id_strings(scalar(result.get("deleted_ids"))), vec!["2"]);
    assert_eq!(names(&connector.records("Cat")), vec!["Garfield"]);
}
