//! Route definitions for ecosystems.

use axum::routing::get;
use axum::Router;

use crate::handlers::ecosystems;
use crate::state::AppState;

/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get
/// PATCH  /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ecosystems::list).post(ecosystems::create))
        .route(
            "/{id}",
            get(ecosystems::get)
                .patch(ecosystems::update)
                .delete(ecosystems::delete),
        )
}
