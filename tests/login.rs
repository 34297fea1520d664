//! Router-level tests for the auth paths. These never need a live database:
//! the pool is built lazily and auth rejections happen before any query.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use parcel_api::config::{AppConfig, DatabaseConfig, SecurityConfig, ServerConfig};
use parcel_api::store::PropertyStore;
use parcel_api::AppState;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

fn test_state(require_auth_for_writes: bool) -> AppState {
    let config = AppConfig {
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            url: "postgres://localhost/parcel_test_unused".to_string(),
            max_connections: 1,
            connect_timeout_secs: 1,
        },
        security: SecurityConfig {
            admin_password: "hunter2".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            require_auth_for_writes,
        },
    };
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    AppState {
        store: PropertyStore::from_pool(pool),
        config: Arc::new(config),
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn login_accepts_the_shared_secret() {
    let app = parcel_api::app(test_state(false));

    let response = app
        .oneshot(json_request(
            "POST",
            "/login",
            json!({"username": "user", "password": "hunter2"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Login successful");
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let app = parcel_api::app(test_state(false));

    let response = app
        .oneshot(json_request(
            "POST",
            "/login",
            json!({"username": "user", "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_ignores_the_username() {
    let app = parcel_api::app(test_state(false));

    let response = app
        .oneshot(json_request("POST", "/login", json!({"password": "hunter2"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_requires_a_password_field() {
    let app = parcel_api::app(test_state(false));

    let response = app
        .oneshot(json_request("POST", "/login", json!({"username": "user"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn write_gate_rejects_unauthenticated_mutations() {
    let app = parcel_api::app(test_state(true));

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/properties/101")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn write_gate_rejects_a_wrong_bearer_secret() {
    let app = parcel_api::app(test_state(true));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/properties")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"asset_num": 101}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
