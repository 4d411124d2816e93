//! Handlers for ecosystem endpoints.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use grove_core::error::CoreError;
use grove_core::types::DbId;
use grove_db::models::ecosystem::EcosystemPatch;
use grove_db::repositories::EcosystemRepo;
use grove_registry::engine::ecosystems;
use serde::Deserialize;

use crate::caller::Caller;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating an ecosystem.
#[derive(Debug, Deserialize)]
pub struct CreateEcosystem {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// GET /ecosystems
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let items = EcosystemRepo::list(&mut conn).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /ecosystems/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let ecosystem = EcosystemRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Ecosystem ID {id}")))?;
    Ok(Json(DataResponse { data: ecosystem }))
}

/// POST /ecosystems
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(body): Json<CreateEcosystem>,
) -> AppResult<impl IntoResponse> {
    let ecosystem = ecosystems::add_ecosystem(
        &state.pool,
        &ctx,
        &body.name,
        body.title.as_deref(),
        body.description.as_deref(),
    )
    .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: ecosystem }),
    ))
}

/// PATCH /ecosystems/{id}
pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
    Json(patch): Json<EcosystemPatch>,
) -> AppResult<impl IntoResponse> {
    let ecosystem = ecosystems::update_ecosystem(&state.pool, &ctx, id, &patch).await?;
    Ok(Json(DataResponse { data: ecosystem }))
}

/// DELETE /ecosystems/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ecosystem = ecosystems::delete_ecosystem(&state.pool, &ctx, id).await?;
    Ok(Json(DataResponse { data: ecosystem }))
}
