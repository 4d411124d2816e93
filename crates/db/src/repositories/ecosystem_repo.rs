//! Repository for the `ecosystems` table.

use grove_core::types::DbId;
use sqlx::PgConnection;

use crate::models::ecosystem::Ecosystem;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, title, description, created_at, last_modified";

/// Provides CRUD operations for ecosystems.
pub struct EcosystemRepo;

impl EcosystemRepo {
    /// Insert a new ecosystem, returning the created row.
    pub async fn insert(
        conn: &mut PgConnection,
        name: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Ecosystem, sqlx::Error> {
        let query = format!(
            "INSERT INTO ecosystems (name, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ecosystem>(&query)
            .bind(name)
            .bind(title)
            .bind(description)
            .fetch_one(conn)
            .await
    }

    /// Find an ecosystem by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Ecosystem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ecosystems WHERE id = $1");
        sqlx::query_as::<_, Ecosystem>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all ecosystems ordered by name.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Ecosystem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ecosystems ORDER BY name");
        sqlx::query_as::<_, Ecosystem>(&query).fetch_all(conn).await
    }

    /// Overwrite the updatable fields of an ecosystem.
    ///
    /// The engine resolves patch semantics before calling this, so the
    /// given values are final. Returns the updated row.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        name: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Ecosystem, sqlx::Error> {
        let query = format!(
            "UPDATE ecosystems
             SET name = $2, title = $3, description = $4, last_modified = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ecosystem>(&query)
            .bind(id)
            .bind(name)
            .bind(title)
            .bind(description)
            .fetch_one(conn)
            .await
    }

    /// Bump `last_modified` without touching any other field.
    pub async fn touch(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE ecosystems SET last_modified = NOW() WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Delete an ecosystem. The store cascades to its projects and
    /// their datasets. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ecosystems WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
