mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doctext_common::config::{AppConfig, StorageBackend};
use doctext_store::{FsStore, HttpStore, ObjectStore};

pub struct AppState {
    pub config: AppConfig,
    pub store: Box<dyn ObjectStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "doctext_server=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/doctext/server.toml".into());

    let config_str = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading config: {config_path}"))?;
    let config: AppConfig = toml::from_str(&config_str)
        .context("parsing server config")?;

    let store: Box<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::Fs => Box::new(FsStore::new(&config.storage.root)),
        StorageBackend::Http => Box::new(HttpStore::new(
            &config.storage.base_url,
            &config.storage.token,
        )),
    };

    let bind = config.server.bind.clone();
    let state = Arc::new(AppState { config, store });

    let app = Router::new()
        .route("/healthz",         get(routes::healthz))
        .route("/api/v1/extract",  post(routes::extract))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding to {bind}"))?;

    tracing::info!("listening on {bind}");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
