//! Handlers for project endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use grove_core::error::CoreError;
use grove_core::types::DbId;
use grove_db::models::project::ProjectPatch;
use grove_db::repositories::ProjectRepo;
use grove_registry::engine::projects;
use serde::Deserialize;

use crate::caller::Caller;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a project.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub ecosystem_id: DbId,
    pub name: String,
    pub title: Option<String>,
    pub parent_id: Option<DbId>,
}

/// Request body for reparenting a project. A null or absent
/// `parent_id` detaches it.
#[derive(Debug, Deserialize)]
pub struct SetParent {
    pub parent_id: Option<DbId>,
}

/// Query parameters for project listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub ecosystem_id: Option<DbId>,
}

/// GET /projects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let items = match params.ecosystem_id {
        Some(eco_id) => ProjectRepo::list_by_ecosystem(&mut conn, eco_id).await?,
        None => ProjectRepo::list(&mut conn).await?,
    };
    Ok(Json(DataResponse { data: items }))
}

/// GET /projects/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let project = ProjectRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Project ID {id}")))?;
    Ok(Json(DataResponse { data: project }))
}

/// GET /projects/{id}/subprojects
pub async fn subprojects(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    ProjectRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Project ID {id}")))?;
    let items = ProjectRepo::list_subprojects(&mut conn, id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /projects
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(body): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    let project = projects::add_project(
        &state.pool,
        &ctx,
        body.ecosystem_id,
        &body.name,
        body.title.as_deref(),
        body.parent_id,
    )
    .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: project }),
    ))
}

/// PATCH /projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
    Json(patch): Json<ProjectPatch>,
) -> AppResult<impl IntoResponse> {
    let project = projects::update_project(&state.pool, &ctx, id, &patch).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /projects/{id}/parent
pub async fn set_parent(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
    Json(body): Json<SetParent>,
) -> AppResult<impl IntoResponse> {
    let project = projects::move_project(&state.pool, &ctx, id, body.parent_id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = projects::delete_project(&state.pool, &ctx, id).await?;
    Ok(Json(DataResponse { data: project }))
}
