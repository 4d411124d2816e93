//! Route definitions, one module per resource.

use axum::Router;

use crate::state::AppState;

pub mod audit;
pub mod credentials;
pub mod datasets;
pub mod ecosystems;
pub mod health;
pub mod projects;
pub mod users;

/// All API routes, mounted under `/api/v1` by the binary.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/ecosystems", ecosystems::router())
        .nest("/projects", projects::router())
        .nest("/datasets", datasets::router())
        .nest("/credentials", credentials::router())
        .nest("/audit", audit::router())
        .nest("/users", users::router())
}
