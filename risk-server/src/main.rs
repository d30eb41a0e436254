//! Diabetes Risk Screening Server
//!
//! Serves the health questionnaire, encodes each submission into the
//! classifier's feature vector and renders the risk verdict.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  RISK SCREENING SERVER                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐    ┌───────────────┐    ┌──────────────┐  │
//! │  │  Form /   │───▶│ FeatureEncoder│───▶│  RiskModel   │  │
//! │  │  JSON API │    │  (profile)    │    │  (ONNX)      │  │
//! │  │  (Axum)   │    └───────────────┘    └──────────────┘  │
//! │  └───────────┘                                           │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod views;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use risk_core::{FeatureEncoder, OnnxRiskModel, RiskModel};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env().context("Invalid configuration")?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "risk_server=debug,risk_core=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(config.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Diabetes Risk Screening Server starting...");
    tracing::info!("Encoder profile: {}", config.profile);

    // Model is required: no model, no listener
    let model = OnnxRiskModel::load(&config.model_path, config.model_sha256.as_deref())
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;
    tracing::info!(
        "Model loaded: {} (sha256 {})",
        model.info().name,
        model.info().sha256.unwrap_or_default()
    );

    let state = AppState::new(Arc::new(model), config.clone());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, read-only afterwards
    pub model: Arc<dyn RiskModel>,
    pub encoder: FeatureEncoder,
    pub config: config::Config,
}

impl AppState {
    pub fn new(model: Arc<dyn RiskModel>, config: config::Config) -> Self {
        Self {
            model,
            encoder: FeatureEncoder::new(config.profile),
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(handlers::pages::form))
        .route("/predict", post(handlers::pages::submit));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/encode", post(handlers::predict::encode))
        .route("/api/v1/model", get(handlers::model::status));

    let cors = if state.config.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
