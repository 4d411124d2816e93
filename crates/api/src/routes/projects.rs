//! Route definitions for projects.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// ```text
/// GET    /                   -> list (optional ?ecosystem_id=N)
/// POST   /                   -> create
/// GET    /{id}               -> get
/// PATCH  /{id}               -> update
/// DELETE /{id}               -> delete
/// GET    /{id}/subprojects   -> subprojects
/// PUT    /{id}/parent        -> set_parent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/subprojects", get(projects::subprojects))
        .route("/{id}/parent", put(projects::set_parent))
}
