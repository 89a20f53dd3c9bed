use axum::{Json, Router, extract::State, routing::get};
use platform_api::ApiResult;
use products_hr::{AnalyticsSummary, DepartmentHeadcount};

use crate::{auth::CurrentUser, http::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(summary))
        .route("/analytics/departments", get(departments))
}

async fn summary(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<AnalyticsSummary>> {
    Ok(Json(state.hr.analytics_summary(principal).await?))
}

async fn departments(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<Vec<DepartmentHeadcount>>> {
    Ok(Json(state.hr.department_breakdown(principal).await?))
}
