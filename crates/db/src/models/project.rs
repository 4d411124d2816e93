//! Project entity model and DTOs.
//!
//! Projects belong to exactly one ecosystem and may nest under a
//! parent project from the same ecosystem.

use grove_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::field::Field;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub title: Option<String>,
    pub ecosystem_id: DbId,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}

/// Partial update for a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub title: Field<String>,
}
