//! Repositories for the `datasource_types` and `datasources` tables.

use grove_core::types::DbId;
use sqlx::PgConnection;

use crate::models::datasource::{DataSource, DataSourceType};

/// Column list for `datasources` queries.
const COLUMNS: &str = "id, type_id, uri, created_at, last_modified";

/// Provides lookups for the fixed set of data source types.
pub struct DataSourceTypeRepo;

impl DataSourceTypeRepo {
    /// Find a data source type by its unique name.
    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<DataSourceType>, sqlx::Error> {
        sqlx::query_as::<_, DataSourceType>("SELECT id, name FROM datasource_types WHERE name = $1")
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    /// List all known data source types ordered by name.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<DataSourceType>, sqlx::Error> {
        sqlx::query_as::<_, DataSourceType>("SELECT id, name FROM datasource_types ORDER BY name")
            .fetch_all(conn)
            .await
    }
}

/// Provides CRUD operations for data sources.
pub struct DataSourceRepo;

impl DataSourceRepo {
    /// Insert a new data source, returning the created row.
    pub async fn insert(
        conn: &mut PgConnection,
        type_id: DbId,
        uri: &str,
    ) -> Result<DataSource, sqlx::Error> {
        let query = format!(
            "INSERT INTO datasources (type_id, uri)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSource>(&query)
            .bind(type_id)
            .bind(uri)
            .fetch_one(conn)
            .await
    }

    /// Find a data source by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DataSource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM datasources WHERE id = $1");
        sqlx::query_as::<_, DataSource>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a data source by its natural key (type, uri).
    pub async fn find_by_type_and_uri(
        conn: &mut PgConnection,
        type_id: DbId,
        uri: &str,
    ) -> Result<Option<DataSource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM datasources WHERE type_id = $1 AND uri = $2");
        sqlx::query_as::<_, DataSource>(&query)
            .bind(type_id)
            .bind(uri)
            .fetch_optional(conn)
            .await
    }

    /// Delete a data source. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM datasources WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
