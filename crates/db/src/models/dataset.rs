//! Data set entity model and DTOs.

use grove_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::field::Field;

/// A data set row: a project's configured view (category + filters)
/// over a specific data source.
///
/// `filters` holds canonical JSON with sorted keys, so equality of
/// filter sets is string equality.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DataSet {
    pub id: DbId,
    pub project_id: DbId,
    pub datasource_id: DbId,
    pub category: String,
    pub filters: String,
    pub is_archived: bool,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}

/// Partial update for a data set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSetPatch {
    #[serde(default)]
    pub category: Field<String>,
    #[serde(default)]
    pub filters: Field<serde_json::Value>,
}

/// One item of a batch `add_datasets` call.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSetInput {
    pub uri: String,
    pub category: String,
    pub filters: serde_json::Value,
}
