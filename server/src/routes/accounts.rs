use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use platform_api::ApiResult;
use products_hr::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};

use crate::{auth::CurrentUser, http::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/profile", get(profile))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    Ok(Json(state.hr.login(request, &state.config.auth).await?))
}

async fn register(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state.hr.register(principal, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.hr.profile(principal).await?))
}
