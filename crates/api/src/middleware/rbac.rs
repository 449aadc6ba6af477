//! Admin authorization extractor.
//!
//! Admin status lives in the `admins` table, not in the access token, so a
//! revoked grant takes effect on the next request rather than at token expiry.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use smartqueue_core::error::CoreError;
use smartqueue_db::repositories::AdminRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an admin grant. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to hold an active admin grant here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let is_admin = AdminRepo::is_admin(&state.pool, user.user_id).await?;
        if !is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
