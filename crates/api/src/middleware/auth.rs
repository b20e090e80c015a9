//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vision_auth::provider::UserProfile;
use vision_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// The currently signed-in user, rejected with 401 when nobody is.
///
/// Use this as an extractor parameter in any handler that requires an
/// authenticated session:
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(uid = %user.profile.uid, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub profile: UserProfile,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let profile = state.sessions.current_profile().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Sign in to generate videos".into(),
            ))
        })?;

        Ok(CurrentUser { profile })
    }
}
