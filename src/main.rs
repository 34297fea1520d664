use std::sync::Arc;

use parcel_api::config::AppConfig;
use parcel_api::store::PropertyStore;
use parcel_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parcel_api=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = PropertyStore::connect(&config.database).await?;

    let port = config.server.port;
    let state = AppState {
        store,
        config: Arc::new(config),
    };
    let app = parcel_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("parcel-api listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
