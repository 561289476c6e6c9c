//! FloodSense API Server
//!
//! Flood-risk predictions over HTTP for the monitored South Sudan locations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     FLOODSENSE API                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────────┐   ┌──────────────────┐  │
//! │  │  Routes   │──►│ ValidatedJson  │──►│ floodsense-core  │  │
//! │  │  (Axum)   │   │  (validator)   │   │  predict / batch │  │
//! │  └───────────┘   └────────────────┘   └────────┬─────────┘  │
//! │                                                ▼            │
//! │                                   ┌────────────────────┐    │
//! │                                   │ Arc<ModelStore>    │    │
//! │                                   │ (read-only)        │    │
//! │                                   └────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod extract;
mod handlers;
mod models;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use floodsense_core::{ArtifactPaths, ModelSource, ModelStore};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(config.log_json);

    tracing::info!("FloodSense API starting ({})...", config.environment);
    tracing::info!("Model directory: {}", config.model_dir.display());

    // Load the model before accepting connections
    let paths = ArtifactPaths::in_dir(&config.model_dir);
    let allow_mock = config.allow_mock_model;
    let store = tokio::task::spawn_blocking(move || ModelStore::initialize(&paths, allow_mock))
        .await
        .context("model initialization task panicked")?;

    match store.source() {
        Some(source) => tracing::info!(
            "Model ready: source={}, features={}",
            source.as_str(),
            store.feature_count()
        ),
        None => tracing::warn!("No model loaded; prediction endpoints will return 503"),
    }
    if config.is_production() && store.source() == Some(ModelSource::Mock) {
        tracing::warn!("Serving the placeholder mock model in production");
    }

    // Build application state
    let state = AppState {
        store: Arc::new(store),
        config: config.clone(),
        started_at: Utc::now(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "floodsense_api=debug,floodsense_core=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ModelStore>,
    pub config: config::Config,
    pub started_at: DateTime<Utc>,
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/locations", get(handlers::locations::list))
        .route("/locations/:id/predict", post(handlers::locations::predict))
        .route("/predict", post(handlers::predict::predict))
        .route("/predict-batch", post(handlers::predict::predict_batch))
        .route("/model-info", get(handlers::model_info::get))
        .route("/regions", get(handlers::regions::regions))
        .route("/alerts", get(handlers::regions::alerts))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the main router; every route is also served under `/api/v1`
fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(api_routes())
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
