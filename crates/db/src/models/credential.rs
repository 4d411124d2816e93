//! Credential entity model.

use grove_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A credential row from the `credentials` table.
///
/// `token` holds the sealed (AES-GCM) bytes; the plaintext never
/// reaches the store and is skipped on serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Credential {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub datasource_type_id: DbId,
    #[serde(skip_serializing)]
    pub token: Vec<u8>,
    pub created_at: Timestamp,
}
