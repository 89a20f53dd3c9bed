use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use entity::{employees, skills};
use platform_api::ApiResult;
use products_hr::SkillInput;

use crate::{auth::CurrentUser, http::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/skills", get(list).post(create))
        .route("/skills/{id}", get(show).put(update).delete(remove))
        .route("/skills/{id}/employees", get(holders))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<skills::Model>>> {
    Ok(Json(state.hr.list_skills(principal).await?))
}

async fn show(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<skills::Model>> {
    Ok(Json(state.hr.get_skill(principal, id).await?))
}

async fn holders(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<employees::Model>>> {
    Ok(Json(state.hr.skill_employees(principal, id).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(input): Json<SkillInput>,
) -> ApiResult<(StatusCode, Json<skills::Model>)> {
    let created = state.hr.create_skill(principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<SkillInput>,
) -> ApiResult<Json<skills::Model>> {
    Ok(Json(state.hr.update_skill(principal, id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.hr.delete_skill(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
