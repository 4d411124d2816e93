//! Handlers for audit trail query endpoints. Read-only.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use grove_core::error::CoreError;
use grove_db::models::audit::{OperationQuery, TransactionQuery};
use grove_db::repositories::{OperationRepo, TransactionRepo};

use crate::error::AppResult;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// GET /audit/transactions
///
/// Filter and paginate the transaction log, newest first.
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionQuery>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let data = TransactionRepo::query(&mut conn, &params).await?;
    let total = TransactionRepo::count(&mut conn, &params).await?;
    Ok(Json(PageResponse { data, total }))
}

/// GET /audit/transactions/{tuid}
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(tuid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let transaction = TransactionRepo::find_by_tuid(&mut conn, &tuid)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Transaction {tuid}")))?;
    Ok(Json(DataResponse { data: transaction }))
}

/// GET /audit/transactions/{tuid}/operations
///
/// The operations of one transaction in replay order.
pub async fn transaction_operations(
    State(state): State<AppState>,
    Path(tuid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    TransactionRepo::find_by_tuid(&mut conn, &tuid)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Transaction {tuid}")))?;
    let data = OperationRepo::list_by_transaction(&mut conn, &tuid).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /audit/operations
///
/// Filter and paginate the operation log in replay order.
pub async fn list_operations(
    State(state): State<AppState>,
    Query(params): Query<OperationQuery>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let data = OperationRepo::query(&mut conn, &params).await?;
    let total = OperationRepo::count(&mut conn, &params).await?;
    Ok(Json(PageResponse { data, total }))
}
