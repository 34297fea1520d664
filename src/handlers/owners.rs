use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::store::Owner;
use crate::AppState;

/// GET /owners - The full owner roster, id ascending
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Owner>>, ApiError> {
    let owners = state.store.list_owners().await?;
    Ok(Json(owners))
}
