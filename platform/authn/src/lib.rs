//! Platform authentication helpers: signed session tokens carrying the
//! caller's role and employee id, and password hashing for local logins.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use platform_authz::{Principal, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ISSUER: &str = "hr-performance";

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub issuer: String,
    pub session_ttl_minutes: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .finish()
    }
}

impl AuthConfig {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.jwt_secret)
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.jwt_secret)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i32,
    pub role: String,
    #[serde(rename = "employeeId")]
    pub employee_id: i32,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    /// `None` when the role claim is not a recognized role.
    pub fn principal(&self) -> Option<Principal> {
        let role = Role::parse(&self.role)?;
        Some(Principal::new(self.sub, self.employee_id, role))
    }
}

pub fn issue_token(principal: &Principal, config: &AuthConfig) -> Result<String, AuthnError> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::minutes(config.session_ttl_minutes))
        .unwrap_or(now)
        .timestamp() as usize;
    let claims = SessionClaims {
        sub: principal.user_id,
        role: principal.role.as_str().to_string(),
        employee_id: principal.employee_id,
        iss: config.issuer.clone(),
        exp,
        iat: now.timestamp() as usize,
    };
    Ok(jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &config.encoding_key(),
    )?)
}

pub fn decode_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AuthnError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[config.issuer.as_str()]);
    let data = jsonwebtoken::decode::<SessionClaims>(token, &config.decoding_key(), &validation)?;
    Ok(data.claims)
}

pub fn hash_password(password: &str) -> Result<String, AuthnError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthnError::Hash(err.to_string()))
}

/// False for a wrong password and for a malformed stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: b"an-hr-secret-that-is-long-enough!!".to_vec(),
            issuer: DEFAULT_ISSUER.into(),
            session_ttl_minutes: 30,
        }
    }

    #[test]
    fn token_carries_role_and_employee_id() {
        let principal = Principal::new(2, 2, Role::Manager);
        let token = issue_token(&principal, &config()).unwrap();
        let claims = decode_token(&token, &config()).unwrap();
        assert_eq!(claims.role, "Manager");
        assert_eq!(claims.principal(), Some(principal));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let mut other = config();
        other.issuer = "someone-else".into();
        let token = issue_token(&Principal::new(1, 1, Role::Employee), &other).unwrap();
        assert!(decode_token(&token, &config()).is_err());
    }

    #[test]
    fn unknown_role_claim_yields_no_principal() {
        let claims = SessionClaims {
            sub: 1,
            role: "Superuser".into(),
            employee_id: 1,
            iss: DEFAULT_ISSUER.into(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.principal(), None);
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
        assert!(!verify_password("password123", "not-a-hash"));
    }
}
