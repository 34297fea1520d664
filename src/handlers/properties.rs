use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::require_write_access;
use crate::error::ApiError;
use crate::store::{Property, PropertyUpdate};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict the listing to properties linked to this owner.
    pub owner_id: Option<i64>,
}

/// GET /properties?owner_id= - List properties, asset number ascending
///
/// An unmatched filter returns an empty list, not an error.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let properties = state.store.list_properties(query.owner_id).await?;
    Ok(Json(properties))
}

/// POST /properties - Add a property
///
/// `asset_num` is caller-supplied and must be unique; a duplicate fails with
/// 409 and nothing is persisted. Ownership rows are derived here, once, from
/// the `owned_by` text.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Property>,
) -> Result<Json<Value>, ApiError> {
    require_write_access(&state.config.security, &headers)?;

    let asset_num = state.store.insert_property(&payload).await?;
    Ok(Json(json!({
        "message": "Property added",
        "property_id": asset_num
    })))
}

/// PUT /properties/:asset_num - Update the editable fields of a property
///
/// Only legal_description, location, owned_by, management_notes and status
/// are written; other submitted fields are accepted and ignored. Ownership
/// links are intentionally left as they were derived at creation time.
pub async fn update(
    State(state): State<AppState>,
    Path(asset_num): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<PropertyUpdate>,
) -> Result<Json<Property>, ApiError> {
    require_write_access(&state.config.security, &headers)?;

    let updated = state.store.update_property(asset_num, &payload).await?;
    Ok(Json(updated))
}

/// DELETE /properties/:asset_num - Remove a property and its ownership rows
///
/// Responds with the same success body whether or not the property existed.
pub async fn remove(
    State(state): State<AppState>,
    Path(asset_num): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_write_access(&state.config.security, &headers)?;

    state.store.delete_property(asset_num).await?;
    Ok(Json(json!({ "message": "Property deleted" })))
}
