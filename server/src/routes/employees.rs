use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use entity::{employees, goals};
use platform_api::ApiResult;
use products_hr::{EmployeeInput, EmployeeSkillView};

use crate::{auth::CurrentUser, http::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list).post(create))
        .route("/employees/{id}", get(show).put(update).delete(remove))
        .route("/employees/{id}/goals", get(goals_of))
        .route("/employees/{id}/skills", get(skills_of))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<employees::Model>>> {
    Ok(Json(state.hr.list_employees(principal).await?))
}

async fn show(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<employees::Model>> {
    Ok(Json(state.hr.get_employee(principal, id).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<(StatusCode, Json<employees::Model>)> {
    let created = state.hr.create_employee(principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<Json<employees::Model>> {
    Ok(Json(state.hr.update_employee(principal, id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.hr.delete_employee(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn goals_of(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<goals::Model>>> {
    Ok(Json(state.hr.employee_goals(principal, id).await?))
}

async fn skills_of(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<EmployeeSkillView>>> {
    Ok(Json(state.hr.employee_skills(principal, id).await?))
}
