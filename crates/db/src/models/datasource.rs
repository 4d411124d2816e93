//! Data source type and data source entity models.

use grove_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A data source type row (`GitHub`, `GitLab`, ...).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DataSourceType {
    pub id: DbId,
    pub name: String,
}

/// A data source row: a (type, uri) pair identifying where data is
/// fetched from. Shared across data sets.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DataSource {
    pub id: DbId,
    pub type_id: DbId,
    pub uri: String,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}
