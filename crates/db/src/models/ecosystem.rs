//! Ecosystem entity model and DTOs.

use grove_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::field::Field;

/// An ecosystem row from the `ecosystems` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ecosystem {
    pub id: DbId,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}

/// Partial update for an ecosystem. Absent fields are left unchanged;
/// `title`/`description` may be cleared with an explicit null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EcosystemPatch {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub title: Field<String>,
    #[serde(default)]
    pub description: Field<String>,
}
