//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use grove_db::models::ecosystem::Ecosystem;
use grove_db::models::project::Project;
use grove_db::repositories::UserRepo;
use grove_registry::engine::{ecosystems, projects};
use grove_registry::RegistryContext;
use sqlx::PgPool;

/// Register a user and build the calling context for it.
pub async fn make_context(pool: &PgPool, username: &str) -> RegistryContext {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::insert(&mut conn, username).await.unwrap();
    RegistryContext::new(user.id, username)
}

/// Add an ecosystem with no title or description.
pub async fn make_ecosystem(pool: &PgPool, ctx: &RegistryContext, name: &str) -> Ecosystem {
    ecosystems::add_ecosystem(pool, ctx, name, None, None)
        .await
        .unwrap()
}

/// Add a top-level project to an ecosystem.
pub async fn make_project(
    pool: &PgPool,
    ctx: &RegistryContext,
    ecosystem_id: i64,
    name: &str,
) -> Project {
    projects::add_project(pool, ctx, ecosystem_id, name, None, None)
        .await
        .unwrap()
}

/// Number of rows in the `transactions` table.
pub async fn count_transactions(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM transactions")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Number of rows in the `operations` table.
pub async fn count_operations(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM operations")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Number of rows in the `datasources` table.
pub async fn count_datasources(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM datasources")
        .fetch_one(pool)
        .await
        .unwrap()
}
