pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ownership;
pub mod store;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::store::PropertyStore;

/// Shared application state passed to every handler.
///
/// The store and config are constructed once in `main` and handed in
/// explicitly rather than living in process-wide statics, so tests can run
/// against an isolated store.
#[derive(Clone)]
pub struct AppState {
    pub store: PropertyStore,
    pub config: Arc<AppConfig>,
}

pub fn app(state: AppState) -> Router {
    let cors = state.config.security.cors_layer();

    Router::new()
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(owner_routes())
        .merge(property_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new().route("/login", post(handlers::auth::login))
}

fn owner_routes() -> Router<AppState> {
    Router::new().route("/owners", get(handlers::owners::list))
}

fn property_routes() -> Router<AppState> {
    use axum::routing::put;

    Router::new()
        .route(
            "/properties",
            get(handlers::properties::list).post(handlers::properties::create),
        )
        .route(
            "/properties/:asset_num",
            put(handlers::properties::update).delete(handlers::properties::remove),
        )
}
