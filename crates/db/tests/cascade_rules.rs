use grove_db::models::audit::OpType;
use grove_db::repositories::{
    DataSetRepo, DataSourceRepo, DataSourceTypeRepo, EcosystemRepo, OperationRepo, ProjectRepo,
    TransactionRepo, UserRepo,
};
use sqlx::PgPool;

/// Removing an ecosystem takes its whole project tree and their data
/// sets with it.
#[sqlx::test(migrations = "./migrations")]
async fn test_ecosystem_delete_cascades(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let eco = EcosystemRepo::insert(&mut conn, "sigtools", None, None)
        .await
        .unwrap();
    let root = ProjectRepo::insert(&mut conn, "harvester", None, eco.id, None)
        .await
        .unwrap();
    let child = ProjectRepo::insert(&mut conn, "harvester-core", None, eco.id, Some(root.id))
        .await
        .unwrap();

    let git = DataSourceTypeRepo::find_by_name(&mut conn, "Git")
        .await
        .unwrap()
        .unwrap();
    let source = DataSourceRepo::insert(&mut conn, git.id, "https://example.org/repo.git")
        .await
        .unwrap();
    DataSetRepo::insert(&mut conn, child.id, source.id, "commit", "{}")
        .await
        .unwrap();

    assert!(EcosystemRepo::delete(&mut conn, eco.id).await.unwrap());

    assert!(ProjectRepo::find_by_id(&mut conn, root.id)
        .await
        .unwrap()
        .is_none());
    assert!(ProjectRepo::find_by_id(&mut conn, child.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        DataSetRepo::count_by_datasource(&mut conn, source.id)
            .await
            .unwrap(),
        0
    );
    // Data sources are not part of the cascade; orphan collection is a
    // separate concern.
    assert!(DataSourceRepo::find_by_id(&mut conn, source.id)
        .await
        .unwrap()
        .is_some());
}

/// Duplicate names surface as unique violations, never as silent
/// overwrites.
#[sqlx::test(migrations = "./migrations")]
async fn test_unique_names_rejected(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    EcosystemRepo::insert(&mut conn, "sigtools", None, None)
        .await
        .unwrap();
    let err = EcosystemRepo::insert(&mut conn, "sigtools", Some("other"), None)
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("expected database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_ecosystems_name"));
}

/// Audit rows reference nothing but their transaction, so they outlive
/// the entities they describe.
#[sqlx::test(migrations = "./migrations")]
async fn test_audit_rows_survive_entity_deletion(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    UserRepo::insert(&mut conn, "hturner").await.unwrap();
    let eco = EcosystemRepo::insert(&mut conn, "sigtools", None, None)
        .await
        .unwrap();

    TransactionRepo::insert(&mut conn, "trx-1", "add_ecosystem", Some("hturner"))
        .await
        .unwrap();
    OperationRepo::insert(
        &mut conn,
        "op-1",
        "trx-1",
        OpType::Add,
        "ecosystem",
        "sigtools",
        &serde_json::json!({"name": "sigtools"}),
    )
    .await
    .unwrap();

    EcosystemRepo::delete(&mut conn, eco.id).await.unwrap();

    let ops = OperationRepo::list_by_transaction(&mut conn, "trx-1")
        .await
        .unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].target, "sigtools");
}

/// Deleting a transaction removes its operations with it.
#[sqlx::test(migrations = "./migrations")]
async fn test_operations_cascade_with_transaction(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    TransactionRepo::insert(&mut conn, "trx-1", "add_ecosystem", None)
        .await
        .unwrap();
    OperationRepo::insert(
        &mut conn,
        "op-1",
        "trx-1",
        OpType::Add,
        "ecosystem",
        "sigtools",
        &serde_json::json!({}),
    )
    .await
    .unwrap();

    sqlx::query("DELETE FROM transactions WHERE tuid = 'trx-1'")
        .execute(&mut *conn)
        .await
        .unwrap();

    assert!(OperationRepo::find_by_ouid(&mut conn, "op-1")
        .await
        .unwrap()
        .is_none());
}
