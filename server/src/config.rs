use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use platform_authn::{AuthConfig, DEFAULT_ISSUER};
use platform_db::DatabaseSettings;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 480;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:4200";
const MIN_SECRET_BYTES: usize = 32;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let secret =
            std::env::var("JWT_SECRET_BASE64").context("JWT_SECRET_BASE64 missing")?;
        let jwt_secret = decode_secret(&secret)?;
        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.into());
        let session_ttl_minutes = match std::env::var("TOKEN_TTL_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .context("TOKEN_TTL_MINUTES must be a whole number of minutes")?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };
        if session_ttl_minutes <= 0 {
            return Err(anyhow!("TOKEN_TTL_MINUTES must be positive"));
        }
        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
        );

        Ok(Self {
            database: DatabaseSettings::from_env(),
            auth: AuthConfig {
                jwt_secret,
                issuer,
                session_ttl_minutes,
            },
            cors_allowed_origins,
        })
    }
}

fn decode_secret(encoded: &str) -> Result<Vec<u8>> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .context("invalid JWT_SECRET_BASE64")?;
    if bytes.len() < MIN_SECRET_BYTES {
        return Err(anyhow!(
            "JWT_SECRET_BASE64 must decode to at least {MIN_SECRET_BYTES} bytes"
        ));
    }
    Ok(bytes)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
