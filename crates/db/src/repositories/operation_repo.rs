//! Repository for the `operations` table.
//!
//! Operations are strictly append-only. Replay order is
//! `(timestamp, ouid)`, which every listing query preserves.

use grove_core::types::Timestamp;
use sqlx::PgConnection;

use crate::models::audit::{OpType, Operation, OperationQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "ouid, tuid, op_type, entity_type, target, timestamp, args";

/// Provides insert and query operations for logged operations.
pub struct OperationRepo;

impl OperationRepo {
    /// Insert a new operation, returning the created row.
    pub async fn insert(
        conn: &mut PgConnection,
        ouid: &str,
        tuid: &str,
        op_type: OpType,
        entity_type: &str,
        target: &str,
        args: &serde_json::Value,
    ) -> Result<Operation, sqlx::Error> {
        let query = format!(
            "INSERT INTO operations (ouid, tuid, op_type, entity_type, target, args)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Operation>(&query)
            .bind(ouid)
            .bind(tuid)
            .bind(op_type)
            .bind(entity_type)
            .bind(target)
            .bind(args)
            .fetch_one(conn)
            .await
    }

    /// Find an operation by its unique ID.
    pub async fn find_by_ouid(
        conn: &mut PgConnection,
        ouid: &str,
    ) -> Result<Option<Operation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM operations WHERE ouid = $1");
        sqlx::query_as::<_, Operation>(&query)
            .bind(ouid)
            .fetch_optional(conn)
            .await
    }

    /// List the operations of one transaction in replay order.
    pub async fn list_by_transaction(
        conn: &mut PgConnection,
        tuid: &str,
    ) -> Result<Vec<Operation>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM operations WHERE tuid = $1 ORDER BY timestamp, ouid");
        sqlx::query_as::<_, Operation>(&query)
            .bind(tuid)
            .fetch_all(conn)
            .await
    }

    /// Query operations with filtering and pagination, in replay order.
    pub async fn query(
        conn: &mut PgConnection,
        params: &OperationQuery,
    ) -> Result<Vec<Operation>, sqlx::Error> {
        // Postgres rejects negative LIMIT/OFFSET values.
        let limit = params.limit.unwrap_or(50).clamp(0, 500);
        let offset = params.offset.unwrap_or(0).max(0);

        let (where_clause, bind_values, bind_idx) = build_operation_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM operations {where_clause} \
             ORDER BY timestamp, ouid \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_values_as(sqlx::query_as::<_, Operation>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(conn).await
    }

    /// Count operations matching the given filter.
    pub async fn count(
        conn: &mut PgConnection,
        params: &OperationQuery,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_operation_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM operations {where_clause}");

        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(conn).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built operation queries.
enum BindValue {
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `OperationQuery` filter
/// parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The
/// `where_clause` is empty if no filters are active, or starts with
/// `WHERE `.
fn build_operation_filter(params: &OperationQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref tuid) = params.tuid {
        conditions.push(format!("tuid = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(tuid.clone()));
    }

    if let Some(ref op_type) = params.op_type {
        conditions.push(format!("op_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(op_type.clone()));
    }

    if let Some(ref entity_type) = params.entity_type {
        conditions.push(format!("entity_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(entity_type.clone()));
    }

    if let Some(ref target) = params.target {
        conditions.push(format!("target = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(target.clone()));
    }

    if let Some(from) = params.from {
        conditions.push(format!("timestamp >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("timestamp <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values_as<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
