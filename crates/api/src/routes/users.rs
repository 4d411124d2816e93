//! Route definitions for user registration.

use axum::routing::post;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// POST / -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(users::create))
}
