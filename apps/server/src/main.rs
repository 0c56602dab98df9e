// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gunsmith Server - HTTP front end of the firearm configurator.
//!
//! Stores uploaded models and their admin part tags, and runs the
//! classification and material pipeline on request.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/taxonomy` - Part type categories (`?q=` filters)
//! - `GET|POST /api/v1/models` - Model library listing, upload (multipart)
//! - `GET|DELETE /api/v1/models/:id` - Mesh ids and classifications, removal
//! - `GET|PUT /api/v1/models/:id/parts` - Persisted part tags
//! - `POST /api/v1/models/:id/render` - Per-mesh material state
//! - `GET /api/v1/catalog`, `POST /api/v1/price` - Catalog and quotes
//! - `POST /api/v1/configs`, `GET /api/v1/configs/:id` - Saved builds

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::{AssetCache, ModelStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ModelStore>,
    pub assets: Arc<AssetCache>,
    pub config: Arc<Config>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        .route("/api/v1/health", get(routes::health::check))
        // Taxonomy
        .route("/api/v1/taxonomy", get(routes::taxonomy::list))
        .route("/api/v1/taxonomy/:part_type", get(routes::taxonomy::lookup))
        // Models
        .route(
            "/api/v1/models",
            get(routes::models::list).post(routes::models::upload),
        )
        .route(
            "/api/v1/models/:id",
            get(routes::models::get_model).delete(routes::models::delete_model),
        )
        .route(
            "/api/v1/models/:id/parts",
            get(routes::parts::get_parts).put(routes::parts::put_parts),
        )
        .route("/api/v1/models/:id/render", post(routes::render::render))
        // Catalog, pricing and saved builds
        .route("/api/v1/catalog", get(routes::pricing::catalog))
        .route("/api/v1/price", post(routes::pricing::price))
        .route("/api/v1/configs", post(routes::pricing::save_config))
        .route("/api/v1/configs/:id", get(routes::pricing::get_config))
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_file_size_bytes()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,gunsmith_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir,
        max_file_size_mb = config.max_file_size_mb,
        request_timeout_secs = config.request_timeout_secs,
        "Starting Gunsmith Server"
    );

    let state = AppState {
        store: Arc::new(ModelStore::new(&config.data_dir).await),
        assets: Arc::new(AssetCache::new(config.asset_cache_size)),
        config: Arc::new(config.clone()),
    };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
