//! HTTP surface of the HR performance service.

pub mod auth;
pub mod config;
pub mod http;
mod routes;

pub use auth::CurrentUser;
pub use config::AppConfig;
pub use http::{AppState, ServeConfig, build_router, serve};
