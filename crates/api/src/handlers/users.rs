//! Handlers for user registration and lookup.
//!
//! Users only exist as credential owners and audit authors; there is
//! no authentication here.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use grove_core::validation::validate_field;
use grove_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    validate_field("username", Some(&body.username), false)?;
    let mut conn = state.pool.acquire().await?;
    let user = UserRepo::insert(&mut conn, &body.username).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: user }),
    ))
}
