//! Integration tests for the audit trail: transaction queries,
//! replay ordering, and argument snapshots.

mod common;

use grove_db::models::audit::{OperationQuery, TransactionQuery};
use grove_db::models::ecosystem::EcosystemPatch;
use grove_db::models::field::Field;
use grove_db::repositories::{OperationRepo, TransactionRepo};
use grove_registry::engine::ecosystems;
use sqlx::PgPool;

use common::make_context;

#[sqlx::test(migrations = "../db/migrations")]
async fn transactions_record_author_and_close_stamp(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    ecosystems::add_ecosystem(&pool, &ctx, "sigtools", None, None)
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let query = TransactionQuery {
        authored_by: Some("hturner".to_string()),
        ..Default::default()
    };
    let rows = TransactionRepo::query(&mut conn, &query).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_closed);
    assert!(rows[0].closed_at.is_some());
    assert!(rows[0].closed_at.unwrap() >= rows[0].created_at);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn operations_replay_in_timestamp_order(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = ecosystems::add_ecosystem(&pool, &ctx, "sigtools", None, None)
        .await
        .unwrap();

    let patch = EcosystemPatch {
        title: Field::Set("Signal Tools".to_string()),
        ..Default::default()
    };
    ecosystems::update_ecosystem(&pool, &ctx, eco.id, &patch)
        .await
        .unwrap();
    ecosystems::delete_ecosystem(&pool, &ctx, eco.id).await.unwrap();

    // Replaying the whole log tells the ecosystem's story in order.
    let mut conn = pool.acquire().await.unwrap();
    let query = OperationQuery {
        entity_type: Some("ecosystem".to_string()),
        ..Default::default()
    };
    let ops = OperationRepo::query(&mut conn, &query).await.unwrap();
    assert_eq!(ops.len(), 3);
    assert_eq!(ops[0].op_type.as_str(), "ADD");
    assert_eq!(ops[1].op_type.as_str(), "UPDATE");
    assert_eq!(ops[2].op_type.as_str(), "DELETE");

    // Each operation carries the snapshot of its call's arguments,
    // so the log outlives the deleted entity.
    assert_eq!(ops[0].args["name"], "sigtools");
    assert_eq!(ops[1].args["title"], "Signal Tools");
    assert_eq!(ops[2].args["id"], eco.id);

    let count = OperationRepo::count(&mut conn, &query).await.unwrap();
    assert_eq!(count, 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn operations_filter_by_transaction(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    ecosystems::add_ecosystem(&pool, &ctx, "sigtools", None, None)
        .await
        .unwrap();
    ecosystems::add_ecosystem(&pool, &ctx, "metrics", None, None)
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let transactions = TransactionRepo::query(&mut conn, &TransactionQuery::default())
        .await
        .unwrap();
    assert_eq!(transactions.len(), 2);

    let ops = OperationRepo::list_by_transaction(&mut conn, &transactions[0].tuid)
        .await
        .unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].tuid, transactions[0].tuid);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn negative_paging_values_are_clamped(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    ecosystems::add_ecosystem(&pool, &ctx, "sigtools", None, None)
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();

    // A negative offset reads from the start instead of erroring out.
    let query = TransactionQuery {
        offset: Some(-1),
        ..Default::default()
    };
    let rows = TransactionRepo::query(&mut conn, &query).await.unwrap();
    assert_eq!(rows.len(), 1);

    // A negative limit yields an empty page.
    let query = TransactionQuery {
        limit: Some(-5),
        ..Default::default()
    };
    let rows = TransactionRepo::query(&mut conn, &query).await.unwrap();
    assert!(rows.is_empty());

    let query = OperationQuery {
        limit: Some(-1),
        offset: Some(-3),
        ..Default::default()
    };
    let ops = OperationRepo::query(&mut conn, &query).await.unwrap();
    assert!(ops.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn transaction_names_identify_the_engine_call(pool: PgPool) {
    let ctx = make_context(&pool, "hturner").await;
    let eco = ecosystems::add_ecosystem(&pool, &ctx, "sigtools", None, None)
        .await
        .unwrap();
    ecosystems::delete_ecosystem(&pool, &ctx, eco.id).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let named = TransactionRepo::query(
        &mut conn,
        &TransactionQuery {
            name: Some("delete_ecosystem".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name, "delete_ecosystem");
}
