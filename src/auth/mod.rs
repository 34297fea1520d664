//! Shared-secret checks.
//!
//! There is exactly one credential in the whole system: the admin password
//! from configuration. No sessions or tokens are issued; /login is a yes/no
//! check, and (optionally) the same secret gates write endpoints.

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use crate::config::SecurityConfig;
use crate::error::ApiError;

/// Compare a submitted secret against the configured one without leaking
/// where the first mismatching byte is: both sides are hashed to fixed-width
/// digests first, so the comparison cost is independent of the input.
pub fn secrets_match(submitted: &str, expected: &str) -> bool {
    let a = Sha256::digest(submitted.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a == b
}

/// Enforce the optional write gate. When `require_auth_for_writes` is off
/// (the default, matching the original deployment) this is a no-op; when on,
/// mutating requests must carry `Authorization: Bearer <secret>`.
pub fn require_write_access(
    security: &SecurityConfig,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    if !security.require_auth_for_writes {
        return Ok(());
    }

    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    if secrets_match(token, &security.admin_password) {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Invalid password"))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn security(require_auth_for_writes: bool) -> SecurityConfig {
        SecurityConfig {
            admin_password: "hunter2".to_string(),
            cors_origins: vec![],
            require_auth_for_writes,
        }
    }

    #[test]
    fn matches_only_the_exact_secret() {
        assert!(secrets_match("hunter2", "hunter2"));
        assert!(!secrets_match("hunter", "hunter2"));
        assert!(!secrets_match("", "hunter2"));
    }

    #[test]
    fn gate_is_a_noop_when_disabled() {
        let headers = HeaderMap::new();
        assert!(require_write_access(&security(false), &headers).is_ok());
    }

    #[test]
    fn gate_rejects_missing_and_wrong_tokens() {
        let sec = security(true);

        let headers = HeaderMap::new();
        assert!(require_write_access(&sec, &headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer wrong"),
        );
        assert!(require_write_access(&sec, &headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer hunter2"),
        );
        assert!(require_write_access(&sec, &headers).is_ok());
    }
}
