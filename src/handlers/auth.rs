use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::secrets_match;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Accepted for interface compatibility; nothing reads it.
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
}

/// POST /login - Check the shared admin secret
///
/// Returns a plain acknowledgment on success. No session or token is issued;
/// the frontend only wants to know whether the password was right.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if secrets_match(&payload.password, &state.config.security.admin_password) {
        tracing::debug!("Login succeeded");
        Ok(Json(json!({ "message": "Login successful" })))
    } else {
        tracing::warn!("Login failed: wrong password");
        Err(ApiError::unauthorized("Invalid password"))
    }
}
