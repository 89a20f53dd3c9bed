//! REST handlers under `/api`. Each one extracts the caller and delegates
//! to [`products_hr::HrModule`], which applies the access rules.

mod accounts;
mod analytics;
mod departments;
mod employees;
mod goals;
mod reviews;
mod skills;

use axum::Router;

use crate::http::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(employees::routes())
        .merge(goals::routes())
        .merge(reviews::routes())
        .merge(departments::routes())
        .merge(skills::routes())
        .merge(analytics::routes())
}
