use std::env;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret checked by POST /login (and by write endpoints when
    /// `require_auth_for_writes` is on).
    pub admin_password: String,
    pub cors_origins: Vec<String>,
    /// Gate POST/PUT/DELETE on /properties behind the shared secret.
    /// Defaults to false to match the original deployment, where only
    /// /login was gated; enabling it is a deliberate operator choice.
    pub require_auth_for_writes: bool,
}

impl AppConfig {
    /// Build configuration from the process environment. `DATABASE_URL` and
    /// `ADMIN_PASSWORD` are required; everything else has defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let admin_password =
            env::var("ADMIN_PASSWORD").map_err(|_| ConfigError::Missing("ADMIN_PASSWORD"))?;

        Ok(Self {
            server: ServerConfig {
                port: parse_var("PORT", 8000)?,
            },
            database: DatabaseConfig {
                url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
                connect_timeout_secs: parse_var("DATABASE_CONNECT_TIMEOUT_SECS", 30)?,
            },
            security: SecurityConfig {
                admin_password,
                cors_origins: parse_origins(env::var("CORS_ALLOWED_ORIGINS").ok()),
                require_auth_for_writes: parse_var("AUTH_REQUIRE_FOR_WRITES", false)?,
            },
        })
    }
}

impl SecurityConfig {
    /// CORS layer restricted to the configured origins. Origins that fail to
    /// parse as header values are skipped with a warning rather than taking
    /// the server down.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring unparseable CORS origin: {}", o);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

fn parse_origins(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(v) if !v.trim().is_empty() => v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => vec!["http://localhost:3000".to_string()],
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}
