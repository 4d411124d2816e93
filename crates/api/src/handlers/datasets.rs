//! Handlers for data set endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use grove_core::types::DbId;
use grove_db::models::dataset::{DataSetInput, DataSetPatch};
use grove_db::repositories::DataSetRepo;
use grove_registry::engine::datasets;
use serde::Deserialize;

use crate::caller::Caller;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for adding a single data set.
#[derive(Debug, Deserialize)]
pub struct CreateDataSet {
    pub project_id: DbId,
    pub datasource_type: String,
    pub uri: String,
    pub category: String,
    #[serde(default = "default_filters")]
    pub filters: serde_json::Value,
}

/// Request body for adding a batch of data sets of one type.
#[derive(Debug, Deserialize)]
pub struct CreateDataSetBatch {
    pub project_id: DbId,
    pub datasource_type: String,
    pub items: Vec<DataSetInput>,
}

/// Request body for moving a data set to another project.
#[derive(Debug, Deserialize)]
pub struct LinkProject {
    pub project_id: DbId,
}

/// Query parameters for data set listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub project_id: DbId,
}

fn default_filters() -> serde_json::Value {
    serde_json::json!({})
}

/// GET /datasets?project_id=N
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let items = DataSetRepo::list_by_project(&mut conn, params.project_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /datasets
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(body): Json<CreateDataSet>,
) -> AppResult<impl IntoResponse> {
    let dataset = datasets::add_dataset(
        &state.pool,
        &ctx,
        body.project_id,
        &body.datasource_type,
        &body.uri,
        &body.category,
        &body.filters,
    )
    .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: dataset }),
    ))
}

/// POST /datasets/batch
///
/// Items are attempted independently; when any of them fails, the
/// error of the last failing item is returned and the successful ones
/// stay committed.
pub async fn create_batch(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(body): Json<CreateDataSetBatch>,
) -> AppResult<impl IntoResponse> {
    let created = datasets::add_datasets(
        &state.pool,
        &ctx,
        body.project_id,
        &body.datasource_type,
        &body.items,
    )
    .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: created }),
    ))
}

/// PATCH /datasets/{id}
pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
    Json(patch): Json<DataSetPatch>,
) -> AppResult<impl IntoResponse> {
    let dataset = datasets::update_dataset(&state.pool, &ctx, id, &patch).await?;
    Ok(Json(DataResponse { data: dataset }))
}

/// POST /datasets/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let dataset = datasets::archive_dataset(&state.pool, &ctx, id).await?;
    Ok(Json(DataResponse { data: dataset }))
}

/// POST /datasets/{id}/unarchive
pub async fn unarchive(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let dataset = datasets::unarchive_dataset(&state.pool, &ctx, id).await?;
    Ok(Json(DataResponse { data: dataset }))
}

/// PUT /datasets/{id}/project
pub async fn link_project(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
    Json(body): Json<LinkProject>,
) -> AppResult<impl IntoResponse> {
    let dataset = datasets::link_dataset_project(&state.pool, &ctx, id, body.project_id).await?;
    Ok(Json(DataResponse { data: dataset }))
}

/// DELETE /datasets/{id}
pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let dataset = datasets::delete_dataset(&state.pool, &ctx, id).await?;
    Ok(Json(DataResponse { data: dataset }))
}
