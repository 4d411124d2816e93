//! Route definitions for data sets.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::datasets;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list (?project_id=N)
/// POST   /                  -> create
/// POST   /batch             -> create_batch
/// PATCH  /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/archive      -> archive
/// POST   /{id}/unarchive    -> unarchive
/// PUT    /{id}/project      -> link_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(datasets::list).post(datasets::create))
        .route("/batch", post(datasets::create_batch))
        .route("/{id}", patch(datasets::update).delete(datasets::delete))
        .route("/{id}/archive", post(datasets::archive))
        .route("/{id}/unarchive", post(datasets::unarchive))
        .route("/{id}/project", put(datasets::link_project))
}
