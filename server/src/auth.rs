use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use platform_api::ApiError;
use platform_authn::decode_token;
use platform_authz::Principal;
use tracing::debug;

use crate::http::AppState;

/// Caller identity taken from the `Authorization: Bearer` token.
///
/// Missing or invalid tokens are rejected with 401. A valid token whose
/// role claim is not a known role is rejected with 403.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized)?;
        let claims = decode_token(token, &state.config.auth).map_err(|err| {
            debug!(error = %err, "rejected bearer token");
            ApiError::Unauthorized
        })?;
        let principal = claims.principal().ok_or_else(|| {
            debug!(user_id = claims.sub, role = %claims.role, "token carries unrecognized role");
            ApiError::Forbidden
        })?;
        Ok(CurrentUser(principal))
    }
}
