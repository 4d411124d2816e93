//! Caller resolution from the `X-Grove-User` header.
//!
//! Session mechanics live outside the registry; the API trusts the
//! header to carry the acting username and resolves it to a registered
//! user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use grove_core::error::CoreError;
use grove_db::repositories::UserRepo;
use grove_registry::RegistryContext;

use crate::error::AppError;
use crate::state::AppState;

/// Header naming the acting user.
pub const USER_HEADER: &str = "x-grove-user";

/// Extractor resolving the acting user into a [`RegistryContext`].
///
/// ```ignore
/// async fn handler(Caller(ctx): Caller) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct Caller(pub RegistryContext);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Missing X-Grove-User header".into()))?;

        let mut conn = state.pool.acquire().await?;
        let user = UserRepo::find_by_username(&mut conn, &username)
            .await?
            .ok_or_else(|| {
                AppError::from(CoreError::not_found(format!("User '{username}'")))
            })?;

        Ok(Caller(RegistryContext::new(user.id, username)))
    }
}
