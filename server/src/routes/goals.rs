use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use entity::goals;
use platform_api::ApiResult;
use products_hr::GoalInput;

use crate::{auth::CurrentUser, http::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list).post(create))
        .route("/goals/{id}", get(show).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<goals::Model>>> {
    Ok(Json(state.hr.list_goals(principal).await?))
}

async fn show(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<goals::Model>> {
    Ok(Json(state.hr.get_goal(principal, id).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(input): Json<GoalInput>,
) -> ApiResult<(StatusCode, Json<goals::Model>)> {
    let created = state.hr.create_goal(principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<GoalInput>,
) -> ApiResult<Json<goals::Model>> {
    Ok(Json(state.hr.update_goal(principal, id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.hr.delete_goal(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
