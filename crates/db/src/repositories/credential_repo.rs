//! Repository for the `credentials` table.

use grove_core::types::DbId;
use sqlx::PgConnection;

use crate::models::credential::Credential;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, datasource_type_id, token, created_at";

/// Provides CRUD operations for credentials.
pub struct CredentialRepo;

impl CredentialRepo {
    /// Insert a new credential with a sealed token, returning the
    /// created row.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: DbId,
        name: &str,
        datasource_type_id: DbId,
        token: &[u8],
    ) -> Result<Credential, sqlx::Error> {
        let query = format!(
            "INSERT INTO credentials (user_id, name, datasource_type_id, token)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Credential>(&query)
            .bind(user_id)
            .bind(name)
            .bind(datasource_type_id)
            .bind(token)
            .fetch_one(conn)
            .await
    }

    /// Find a credential by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Credential>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM credentials WHERE id = $1");
        sqlx::query_as::<_, Credential>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List the credentials of one user ordered by name.
    pub async fn list_by_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<Credential>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM credentials WHERE user_id = $1 ORDER BY name");
        sqlx::query_as::<_, Credential>(&query)
            .bind(user_id)
            .fetch_all(conn)
            .await
    }

    /// Delete a credential. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM credentials WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
