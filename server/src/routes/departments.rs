use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use entity::{departments, employees};
use platform_api::ApiResult;
use products_hr::DepartmentInput;

use crate::{auth::CurrentUser, http::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list).post(create))
        .route("/departments/{id}", get(show).put(update).delete(remove))
        .route("/departments/{id}/employees", get(members))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<departments::Model>>> {
    Ok(Json(state.hr.list_departments(principal).await?))
}

async fn show(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<departments::Model>> {
    Ok(Json(state.hr.get_department(principal, id).await?))
}

async fn members(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<employees::Model>>> {
    Ok(Json(state.hr.department_employees(principal, id).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(input): Json<DepartmentInput>,
) -> ApiResult<(StatusCode, Json<departments::Model>)> {
    let created = state.hr.create_department(principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<DepartmentInput>,
) -> ApiResult<Json<departments::Model>> {
    Ok(Json(state.hr.update_department(principal, id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.hr.delete_department(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
