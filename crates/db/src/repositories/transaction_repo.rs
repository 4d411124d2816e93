//! Repository for the `transactions` table.
//!
//! Transactions are append-only apart from the close stamp; there is
//! no update or delete path.

use grove_core::types::Timestamp;
use sqlx::PgConnection;

use crate::models::audit::{Transaction, TransactionQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "tuid, name, created_at, closed_at, is_closed, authored_by";

/// Provides insert and query operations for transactions.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Insert a new open transaction, returning the created row.
    pub async fn insert(
        conn: &mut PgConnection,
        tuid: &str,
        name: &str,
        authored_by: Option<&str>,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions (tuid, name, authored_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(tuid)
            .bind(name)
            .bind(authored_by)
            .fetch_one(conn)
            .await
    }

    /// Close a transaction, stamping `closed_at`.
    pub async fn close(conn: &mut PgConnection, tuid: &str) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "UPDATE transactions
             SET is_closed = TRUE, closed_at = NOW()
             WHERE tuid = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(tuid)
            .fetch_one(conn)
            .await
    }

    /// Find a transaction by its unique ID.
    pub async fn find_by_tuid(
        conn: &mut PgConnection,
        tuid: &str,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE tuid = $1");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(tuid)
            .fetch_optional(conn)
            .await
    }

    /// Query transactions with filtering and pagination, newest first.
    pub async fn query(
        conn: &mut PgConnection,
        params: &TransactionQuery,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        // Postgres rejects negative LIMIT/OFFSET values.
        let limit = params.limit.unwrap_or(50).clamp(0, 500);
        let offset = params.offset.unwrap_or(0).max(0);

        let (where_clause, bind_values, bind_idx) = build_transaction_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM transactions {where_clause} \
             ORDER BY created_at DESC, tuid \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_values_as(sqlx::query_as::<_, Transaction>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(conn).await
    }

    /// Count transactions matching the given filter.
    pub async fn count(
        conn: &mut PgConnection,
        params: &TransactionQuery,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_transaction_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM transactions {where_clause}");

        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(conn).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built transaction queries.
enum BindValue {
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `TransactionQuery` filter
/// parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The
/// `where_clause` is empty if no filters are active, or starts with
/// `WHERE `.
fn build_transaction_filter(params: &TransactionQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref name) = params.name {
        conditions.push(format!("name = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(name.clone()));
    }

    if let Some(ref authored_by) = params.authored_by {
        conditions.push(format!("authored_by = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(authored_by.clone()));
    }

    if let Some(is_closed) = params.is_closed {
        conditions.push(format!("is_closed = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(is_closed));
    }

    if let Some(from) = params.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
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
            BindValue::Bool(v) => q = q.bind(*v),
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
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
