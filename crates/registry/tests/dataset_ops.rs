//! Integration tests for data set operations: implicit data source
//! management, batch adds, archiving, and relinking.

mod common;

use assert_matches::assert_matches;
use grove_core::error::CoreError;
use grove_db::models::dataset::{DataSetInput, DataSetPatch};
use grove_db::models::field::Field;
use grove_registry::engine::datasets;
use grove_registry::Error;
use serde_json::json;
use sqlx::PgPool;

use common::{
    count_datasources, count_operations, count_transactions, make_context, make_ecosystem,
    make_project,
};

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn add_dataset_creates_its_datasource(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;

    let dataset = datasets::add_dataset(
        &pool,
        &ctx,
        project.id,
        "GitHub",
        "https://github.com/sigtools/harvester",
        "issues",
        &json!({}),
    )
    .await
    .unwrap();

    assert_eq!(dataset.project_id, project.id);
    assert_eq!(dataset.category, "issues");
    assert_eq!(dataset.filters, "{}");
    assert!(!dataset.is_archived);
    assert_eq!(count_datasources(&pool).await, 1);

    // The call logs both the datasource ADD and the dataset ADD.
    let ops: Vec<(String, String)> = sqlx::query_as(
        "SELECT op_type, entity_type FROM operations ORDER BY timestamp, ouid",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let dataset_ops: Vec<_> = ops
        .iter()
        .filter(|(_, e)| e == "datasource" || e == "dataset")
        .collect();
    assert_eq!(dataset_ops.len(), 2);
    assert_eq!(dataset_ops[0].1, "datasource");
    assert_eq!(dataset_ops[1].1, "dataset");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_dataset_reuses_an_existing_datasource(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;
    let uri = "https://github.com/sigtools/harvester";

    datasets::add_dataset(&pool, &ctx, project.id, "GitHub", uri, "issues", &json!({}))
        .await
        .unwrap();
    let before = count_operations(&pool).await;

    datasets::add_dataset(&pool, &ctx, project.id, "GitHub", uri, "commits", &json!({}))
        .await
        .unwrap();

    assert_eq!(count_datasources(&pool).await, 1);
    // The second call only logs the dataset ADD.
    assert_eq!(count_operations(&pool).await, before + 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_dataset_view_is_rejected(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;
    let uri = "https://github.com/sigtools/harvester";
    let filters = json!({"tag": "v1", "branch": "main"});

    datasets::add_dataset(&pool, &ctx, project.id, "GitHub", uri, "issues", &filters)
        .await
        .unwrap();

    // Same filter set with another key order is the same view.
    let reordered = json!({"branch": "main", "tag": "v1"});
    let err = datasets::add_dataset(&pool, &ctx, project.id, "GitHub", uri, "issues", &reordered)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Core(CoreError::AlreadyExists { entity: "dataset", .. }));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_dataset_rejects_unknown_datasource_type(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;

    let before = count_transactions(&pool).await;
    let err = datasets::add_dataset(
        &pool,
        &ctx,
        project.id,
        "Gopher",
        "gopher://example.org",
        "docs",
        &json!({}),
    )
    .await
    .unwrap_err();
    assert_matches!(err, Error::Core(CoreError::NotFound { .. }));
    assert_eq!(count_transactions(&pool).await, before);
}

// ---------------------------------------------------------------------------
// Batch creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn add_datasets_commits_valid_items_and_returns_last_error(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;

    let items = vec![
        DataSetInput {
            uri: "https://github.com/sigtools/a".to_string(),
            category: "issues".to_string(),
            filters: json!({}),
        },
        DataSetInput {
            uri: String::new(), // invalid
            category: "issues".to_string(),
            filters: json!({}),
        },
        DataSetInput {
            uri: "https://github.com/sigtools/b".to_string(),
            category: "issues".to_string(),
            filters: json!({}),
        },
    ];

    let err = datasets::add_datasets(&pool, &ctx, project.id, "GitHub", &items)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Core(CoreError::InvalidValue(_)));

    // The two valid items survived the failed one.
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM datasets")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_datasets_returns_all_created_rows_on_success(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;

    let items = vec![
        DataSetInput {
            uri: "https://github.com/sigtools/a".to_string(),
            category: "issues".to_string(),
            filters: json!({}),
        },
        DataSetInput {
            uri: "https://github.com/sigtools/b".to_string(),
            category: "commits".to_string(),
            filters: json!({"branch": "main"}),
        },
    ];

    let created = datasets::add_datasets(&pool, &ctx, project.id, "GitHub", &items)
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn update_dataset_canonicalizes_filters(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;
    let dataset = datasets::add_dataset(
        &pool,
        &ctx,
        project.id,
        "GitHub",
        "https://github.com/sigtools/a",
        "issues",
        &json!({}),
    )
    .await
    .unwrap();

    let patch = DataSetPatch {
        filters: Field::Set(json!({"tag": "v2", "branch": "dev"})),
        ..Default::default()
    };
    let updated = datasets::update_dataset(&pool, &ctx, dataset.id, &patch)
        .await
        .unwrap();
    assert_eq!(updated.filters, r#"{"branch":"dev","tag":"v2"}"#);
    assert_eq!(updated.category, "issues");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_dataset_rejects_null_category(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;
    let dataset = datasets::add_dataset(
        &pool,
        &ctx,
        project.id,
        "GitHub",
        "https://github.com/sigtools/a",
        "issues",
        &json!({}),
    )
    .await
    .unwrap();

    let patch = DataSetPatch {
        category: Field::Null,
        ..Default::default()
    };
    let err = datasets::update_dataset(&pool, &ctx, dataset.id, &patch)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Core(CoreError::InvalidValue(_)));
}

// ---------------------------------------------------------------------------
// Deletion and data source garbage collection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_last_dataset_removes_its_datasource(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;
    let dataset = datasets::add_dataset(
        &pool,
        &ctx,
        project.id,
        "GitHub",
        "https://github.com/sigtools/a",
        "issues",
        &json!({}),
    )
    .await
    .unwrap();

    let deleted = datasets::delete_dataset(&pool, &ctx, dataset.id)
        .await
        .unwrap();
    assert_eq!(deleted.id, dataset.id);
    assert_eq!(count_datasources(&pool).await, 0);

    // The delete call logged both removals.
    let ops: Vec<(String, String)> = sqlx::query_as(
        "SELECT op_type, entity_type FROM operations \
         WHERE op_type = 'DELETE' ORDER BY timestamp, ouid",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].1, "dataset");
    assert_eq!(ops[1].1, "datasource");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_dataset_keeps_a_shared_datasource(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;
    let uri = "https://github.com/sigtools/a";

    let first = datasets::add_dataset(&pool, &ctx, project.id, "GitHub", uri, "issues", &json!({}))
        .await
        .unwrap();
    datasets::add_dataset(&pool, &ctx, project.id, "GitHub", uri, "commits", &json!({}))
        .await
        .unwrap();

    datasets::delete_dataset(&pool, &ctx, first.id).await.unwrap();
    assert_eq!(count_datasources(&pool).await, 1);
}

// ---------------------------------------------------------------------------
// Archiving
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn archive_and_unarchive_roundtrip(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let project = make_project(&pool, &ctx, eco.id, "harvester").await;
    let dataset = datasets::add_dataset(
        &pool,
        &ctx,
        project.id,
        "GitHub",
        "https://github.com/sigtools/a",
        "issues",
        &json!({}),
    )
    .await
    .unwrap();

    let archived = datasets::archive_dataset(&pool, &ctx, dataset.id)
        .await
        .unwrap();
    assert!(archived.is_archived);
    assert!(archived.archived_at.is_some());

    // Archiving twice is an error.
    let err = datasets::archive_dataset(&pool, &ctx, dataset.id)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Core(CoreError::InvalidValue(_)));

    let restored = datasets::unarchive_dataset(&pool, &ctx, dataset.id)
        .await
        .unwrap();
    assert!(!restored.is_archived);
    assert_eq!(restored.archived_at, None);

    let err = datasets::unarchive_dataset(&pool, &ctx, dataset.id)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Core(CoreError::InvalidValue(_)));
}

// ---------------------------------------------------------------------------
// Relinking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn link_dataset_to_another_project(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = make_ecosystem(&pool, &ctx, "sigtools").await;
    let source = make_project(&pool, &ctx, eco.id, "harvester").await;
    let target = make_project(&pool, &ctx, eco.id, "collector").await;
    let dataset = datasets::add_dataset(
        &pool,
        &ctx,
        source.id,
        "GitHub",
        "https://github.com/sigtools/a",
        "issues",
        &json!({}),
    )
    .await
    .unwrap();

    let moved = datasets::link_dataset_project(&pool, &ctx, dataset.id, target.id)
        .await
        .unwrap();
    assert_eq!(moved.project_id, target.id);

    // Linking to the current project is rejected.
    let err = datasets::link_dataset_project(&pool, &ctx, dataset.id, target.id)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Core(CoreError::InvalidValue(_)));
}
