//! Route definitions for credentials.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::credentials;
use crate::state::AppState;

/// ```text
/// GET    /       -> list (calling user's credentials)
/// POST   /       -> create
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(credentials::list).post(credentials::create))
        .route("/{id}", delete(credentials::delete))
}
