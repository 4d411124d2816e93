//! Repository for the `projects` table.

use grove_core::types::DbId;
use sqlx::PgConnection;

use crate::models::project::Project;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, title, ecosystem_id, parent_id, created_at, last_modified";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn insert(
        conn: &mut PgConnection,
        name: &str,
        title: Option<&str>,
        ecosystem_id: DbId,
        parent_id: Option<DbId>,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, title, ecosystem_id, parent_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(name)
            .bind(title)
            .bind(ecosystem_id)
            .bind(parent_id)
            .fetch_one(conn)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all projects ordered by name.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY name");
        sqlx::query_as::<_, Project>(&query).fetch_all(conn).await
    }

    /// List the projects of one ecosystem ordered by name.
    pub async fn list_by_ecosystem(
        conn: &mut PgConnection,
        ecosystem_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE ecosystem_id = $1 ORDER BY name");
        sqlx::query_as::<_, Project>(&query)
            .bind(ecosystem_id)
            .fetch_all(conn)
            .await
    }

    /// List the direct subprojects of a project.
    ///
    /// This is the adjacency relation the engine's descendant check
    /// traverses.
    pub async fn list_subprojects(
        conn: &mut PgConnection,
        parent_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE parent_id = $1 ORDER BY id");
        sqlx::query_as::<_, Project>(&query)
            .bind(parent_id)
            .fetch_all(conn)
            .await
    }

    /// Overwrite the updatable fields of a project.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        name: &str,
        title: Option<&str>,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "UPDATE projects
             SET name = $2, title = $3, last_modified = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(name)
            .bind(title)
            .fetch_one(conn)
            .await
    }

    /// Reassign a project's parent (or clear it with `None`).
    pub async fn set_parent(
        conn: &mut PgConnection,
        id: DbId,
        parent_id: Option<DbId>,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "UPDATE projects
             SET parent_id = $2, last_modified = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(parent_id)
            .fetch_one(conn)
            .await
    }

    /// Delete a project. The store cascades to its subprojects and
    /// datasets. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
