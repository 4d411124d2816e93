//! Repository for the `datasets` table.

use grove_core::types::DbId;
use sqlx::PgConnection;

use crate::models::dataset::DataSet;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, project_id, datasource_id, category, filters, \
    is_archived, archived_at, created_at, last_modified";

/// Provides CRUD operations for data sets.
pub struct DataSetRepo;

impl DataSetRepo {
    /// Insert a new data set, returning the created row.
    ///
    /// `filters` must already be canonical JSON text; the unique
    /// constraint on (project, datasource, category, filters) compares
    /// it byte for byte.
    pub async fn insert(
        conn: &mut PgConnection,
        project_id: DbId,
        datasource_id: DbId,
        category: &str,
        filters: &str,
    ) -> Result<DataSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO datasets (project_id, datasource_id, category, filters)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSet>(&query)
            .bind(project_id)
            .bind(datasource_id)
            .bind(category)
            .bind(filters)
            .fetch_one(conn)
            .await
    }

    /// Find a data set by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DataSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM datasets WHERE id = $1");
        sqlx::query_as::<_, DataSet>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List the data sets of one project ordered by id.
    pub async fn list_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<DataSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM datasets WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, DataSet>(&query)
            .bind(project_id)
            .fetch_all(conn)
            .await
    }

    /// Overwrite the updatable fields of a data set.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        category: &str,
        filters: &str,
    ) -> Result<DataSet, sqlx::Error> {
        let query = format!(
            "UPDATE datasets
             SET category = $2, filters = $3, last_modified = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSet>(&query)
            .bind(id)
            .bind(category)
            .bind(filters)
            .fetch_one(conn)
            .await
    }

    /// Flip the archive flag, stamping `archived_at` when archiving and
    /// clearing it when unarchiving.
    pub async fn set_archived(
        conn: &mut PgConnection,
        id: DbId,
        archived: bool,
    ) -> Result<DataSet, sqlx::Error> {
        let query = format!(
            "UPDATE datasets
             SET is_archived = $2,
                 archived_at = CASE WHEN $2 THEN NOW() ELSE NULL END,
                 last_modified = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSet>(&query)
            .bind(id)
            .bind(archived)
            .fetch_one(conn)
            .await
    }

    /// Move a data set to another project.
    pub async fn set_project(
        conn: &mut PgConnection,
        id: DbId,
        project_id: DbId,
    ) -> Result<DataSet, sqlx::Error> {
        let query = format!(
            "UPDATE datasets
             SET project_id = $2, last_modified = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSet>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_one(conn)
            .await
    }

    /// Count data sets referencing a data source. Used to detect
    /// orphaned data sources after a delete.
    pub async fn count_by_datasource(
        conn: &mut PgConnection,
        datasource_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM datasets WHERE datasource_id = $1",
        )
        .bind(datasource_id)
        .fetch_one(conn)
        .await
    }

    /// Delete a data set. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM datasets WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
