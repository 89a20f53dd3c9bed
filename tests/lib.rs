//! Shared harness for end-to-end tests: a migrated, seeded in-memory
//! database behind the real router.

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use platform_authn::{AuthConfig, SessionClaims};
use platform_db::DatabaseSettings;
use products_hr::{HrModule, SeededOrg, seed_demo};
use sea_orm::Database;
use serde_json::Value;
use server::{AppConfig, AppState, build_router};
use tower::ServiceExt;

pub use products_hr::seed::DEMO_PASSWORD;

pub struct TestApp {
    pub router: Router,
    pub auth: AuthConfig,
    pub org: SeededOrg,
}

impl TestApp {
    pub async fn seeded() -> Result<Self> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await?;
        let org = seed_demo(&db)
            .await?
            .context("in-memory database already seeded")?;
        let auth = AuthConfig {
            jwt_secret: b"integration-tests-secret-0123456789".to_vec(),
            issuer: "hr-tests".into(),
            session_ttl_minutes: 15,
        };
        let config = AppConfig {
            database: DatabaseSettings::new("sqlite::memory:"),
            auth: auth.clone(),
            cors_allowed_origins: vec!["http://localhost:4200".into()],
        };
        let router = build_router(AppState::new(HrModule::new(db), config));
        Ok(Self { router, auth, org })
    }

    /// Log in through the API and return the bearer token.
    pub async fn login(&self, username: &str) -> Result<String> {
        let body = serde_json::json!({ "username": username, "password": DEMO_PASSWORD });
        let (status, json) = self
            .send(Method::POST, "/api/auth/login", None, Some(body))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login for {username} failed: {status}");
        json["token"]
            .as_str()
            .map(str::to_string)
            .context("login response without token")
    }

    /// Sign claims directly, bypassing the login endpoint.
    pub fn forge_token(&self, user_id: i32, employee_id: i32, role: &str) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id,
            role: role.to_string(),
            employee_id,
            iss: self.auth.issuer.clone(),
            exp: (now + Duration::minutes(5)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Ok(jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &self.auth.encoding_key(),
        )?)
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Ok((status, json))
    }
}

/// Ids of the objects in a JSON array response, in response order.
pub fn ids(json: &Value) -> Vec<i64> {
    json.as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}
