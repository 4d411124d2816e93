//! Handlers for credential endpoints.
//!
//! Listings never include token bytes; the model skips them on
//! serialization.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use grove_core::types::DbId;
use grove_db::repositories::CredentialRepo;
use grove_registry::engine::credentials;
use serde::Deserialize;

use crate::caller::Caller;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for storing a credential.
#[derive(Debug, Deserialize)]
pub struct CreateCredential {
    pub name: String,
    pub datasource_type: String,
    pub token: String,
}

/// GET /credentials -- the calling user's credentials.
pub async fn list(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let items = CredentialRepo::list_by_user(&mut conn, ctx.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /credentials
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(body): Json<CreateCredential>,
) -> AppResult<impl IntoResponse> {
    let credential = credentials::add_credential(
        &state.pool,
        &ctx,
        &state.cipher,
        &body.name,
        &body.datasource_type,
        &body.token,
    )
    .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: credential }),
    ))
}

/// DELETE /credentials/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let credential = credentials::delete_credential(&state.pool, &ctx, id).await?;
    Ok(Json(DataResponse { data: credential }))
}
