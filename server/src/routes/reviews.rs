use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use entity::{review_cycles, review_templates, reviews};
use platform_api::ApiResult;
use platform_authz::Principal;
use products_hr::{ReviewFilter, ReviewInput, ReviewView};

use crate::{auth::CurrentUser, http::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list).post(create))
        .route("/reviews/{id}", get(show).put(update).delete(remove))
        .route("/reviews/{id}/lock", patch(lock))
        .route("/reviews/{id}/unlock", patch(unlock))
        .route("/reviews/cycle/{id}", get(by_cycle))
        .route("/reviews/reviewee/{id}", get(by_reviewee))
        .route("/reviews/reviewer/{id}", get(by_reviewer))
        .route("/review-cycles", get(cycles))
        .route("/review-templates", get(templates))
}

async fn filtered(
    state: &AppState,
    principal: Principal,
    filter: ReviewFilter,
) -> ApiResult<Json<Vec<ReviewView>>> {
    Ok(Json(state.hr.list_reviews(principal, filter).await?))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<ReviewView>>> {
    filtered(&state, principal, ReviewFilter::All).await
}

async fn by_cycle(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    filtered(&state, principal, ReviewFilter::Cycle(id)).await
}

async fn by_reviewee(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    filtered(&state, principal, ReviewFilter::Reviewee(id)).await
}

async fn by_reviewer(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    filtered(&state, principal, ReviewFilter::Reviewer(id)).await
}

async fn cycles(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<review_cycles::Model>>> {
    Ok(Json(state.hr.list_review_cycles(principal).await?))
}

async fn templates(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<review_templates::Model>>> {
    Ok(Json(state.hr.list_review_templates(principal).await?))
}

async fn show(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<ReviewView>> {
    Ok(Json(state.hr.get_review(principal, id).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(input): Json<ReviewInput>,
) -> ApiResult<(StatusCode, Json<reviews::Model>)> {
    let created = state.hr.create_review(principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<ReviewInput>,
) -> ApiResult<Json<reviews::Model>> {
    Ok(Json(state.hr.update_review(principal, id, input).await?))
}

async fn lock(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<reviews::Model>> {
    Ok(Json(state.hr.lock_review(principal, id).await?))
}

async fn unlock(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<reviews::Model>> {
    Ok(Json(state.hr.unlock_review(principal, id).await?))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.hr.delete_review(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
