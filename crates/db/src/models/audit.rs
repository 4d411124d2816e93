//! Audit trail entity models and query parameters.
//!
//! Transactions and operations are append-only and outlive the
//! entities they describe; neither table has an `updated_at`.

use grove_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The kind of state change an operation describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OpType {
    Add,
    Update,
    Delete,
    Link,
}

impl OpType {
    /// Wire value stored in the `op_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Add => "ADD",
            OpType::Update => "UPDATE",
            OpType::Delete => "DELETE",
            OpType::Link => "LINK",
        }
    }
}

/// A transaction row: the envelope grouping all operations produced by
/// one top-level registry call.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub tuid: String,
    pub name: String,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    pub is_closed: bool,
    pub authored_by: Option<String>,
}

/// An operation row: a single logged state change with a snapshot of
/// its input arguments.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Operation {
    pub ouid: String,
    pub tuid: String,
    pub op_type: OpType,
    pub entity_type: String,
    pub target: String,
    pub timestamp: Timestamp,
    pub args: serde_json::Value,
}

/// Filter parameters for querying transactions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionQuery {
    pub name: Option<String>,
    pub authored_by: Option<String>,
    pub is_closed: Option<bool>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Filter parameters for querying operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationQuery {
    pub tuid: Option<String>,
    pub op_type: Option<String>,
    pub entity_type: Option<String>,
    pub target: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
