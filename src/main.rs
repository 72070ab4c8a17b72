//! BreatheWise - a personal air-quality dashboard service.
//!
//! # API Endpoints
//!
//! - `POST /check` - Record an air-quality check-in for a city
//! - `GET /trend` - Classify the AQI trend over the stored history
//! - `GET /predictions` - Synthetic hourly and weekly forecasts
//! - `POST /insights` - Personalized health insights for the latest reading
//! - `GET /progress` - Gamification state (points, level, streak, achievements)
//! - `POST /export` - Export profile plus history as a JSON bundle
//! - `GET /health` - Health check

use std::env;
use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use breathewise::api::{
    AppState, get_predictions, get_progress, get_trend, health_check, post_check, post_export,
    post_insights,
};
use breathewise::data_sources::OpenWeatherClient;
use breathewise::storage::Storage;

/// Default port if not specified via environment variable.
const DEFAULT_PORT: u16 = 3000;

/// Default database path if not specified via environment variable.
const DEFAULT_DB_PATH: &str = "sqlite:breathewise.db?mode=rwc";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("breathewise=info".parse()?))
        .init();

    // Load configuration from environment
    let port: u16 = env::var("BREATHEWISE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let db_url =
        env::var("BREATHEWISE_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    // Without an API key the service still serves history-derived
    // endpoints; /check responds 503.
    let weather = match env::var("OPENWEATHER_API_KEY") {
        Ok(key) if !key.is_empty() => Some(OpenWeatherClient::new(&key)),
        _ => {
            warn!("OPENWEATHER_API_KEY not set; check-ins disabled");
            None
        }
    };

    info!(port, db_url = %db_url, "Starting BreatheWise server");

    // Initialize storage
    let storage = Storage::new(&db_url).await?;
    info!("Database initialized");

    // Create application state
    let state = AppState { storage, weather };

    // Build router
    let app = Router::new()
        .route("/check", post(post_check))
        .route("/trend", get(get_trend))
        .route("/predictions", get(get_predictions))
        .route("/insights", post(post_insights))
        .route("/progress", get(get_progress))
        .route("/export", post(post_export))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "BreatheWise is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
