//! HTTP API handlers for BreatheWise.
//!
//! The handlers are the orchestrator: they wire fetched data and the
//! stored history into the scoring engines and forward plain structured
//! results. The user profile travels in request bodies and is never
//! stored server-side; the only persisted state is the check-in history.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::data_sources::OpenWeatherClient;
use crate::data_sources::openweather::WeatherSnapshot;
use crate::gamification::{self, Challenge, GamificationState, ProgressPoint};
use crate::model::{AqiCategory, HistoryEntry, PollutantReading, UserProfile};
use crate::recommend::{self, Recommendation};
use crate::risk::{self, HealthInsights, RiskAssessment};
use crate::scoring;
use crate::trend::{self, DailyPrediction, HourlyPrediction, TrendAnalysis};
use crate::{export, persona};

/// Cap on the forecast horizon a caller may request.
const MAX_FORECAST_HOURS: u32 = 72;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: crate::storage::Storage,
    pub weather: Option<OpenWeatherClient>,
}

/// Request body for POST /check.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// City name to look up.
    pub city: String,

    /// Profile used for the personalized parts of the response.
    #[serde(default)]
    pub profile: UserProfile,
}

/// Response for POST /check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub city: String,
    pub country: String,
    pub aqi: AqiCategory,
    pub level: &'static str,
    pub mood: &'static str,
    pub pollutants: PollutantReading,
    pub composite_score: f64,
    pub weather: Option<WeatherSnapshot>,
    pub health_score: u8,
    pub risk: RiskAssessment,
    pub persona_message: &'static str,
    pub community_tip: &'static str,
}

/// POST /check - Record an air-quality check-in for a city.
///
/// Geocodes the city, fetches the current air pollution and weather,
/// appends the reading to the history, and returns the scored dashboard
/// bundle.
///
/// # Errors
///
/// - `404` when the city cannot be geocoded
/// - `502` when the upstream air-quality data is unavailable or invalid
/// - `503` when no API client is configured
#[instrument(skip(state, request), fields(city = %request.city))]
pub async fn post_check(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, StatusCode> {
    let weather_client = state.weather.as_ref().ok_or_else(|| {
        warn!("Weather API client not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let location = match weather_client.geocode(&request.city).await {
        Ok(Some(location)) => location,
        Ok(None) => {
            info!(city = %request.city, "City not found");
            return Err(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            warn!(city = %request.city, error = %e, "Geocoding failed");
            return Err(StatusCode::BAD_GATEWAY);
        }
    };

    let snapshot = match weather_client
        .fetch_air_quality(location.lat, location.lon)
        .await
    {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            warn!(city = %location.name, "Air quality data unavailable");
            return Err(StatusCode::BAD_GATEWAY);
        }
        Err(e) => {
            warn!(city = %location.name, error = %e, "Air quality fetch failed");
            return Err(StatusCode::BAD_GATEWAY);
        }
    };

    // Weather is decoration; a miss here does not fail the check-in.
    let weather = match weather_client
        .fetch_weather(location.lat, location.lon)
        .await
    {
        Ok(weather) => weather,
        Err(e) => {
            warn!(city = %location.name, error = %e, "Weather fetch failed");
            None
        }
    };

    let entry = HistoryEntry {
        timestamp: Utc::now(),
        city: location.name.clone(),
        aqi: snapshot.aqi,
        pollutants: snapshot.pollutants.clone(),
    };

    if let Err(e) = state.storage.insert_check_in(&entry).await {
        warn!(city = %entry.city, error = %e, "Failed to record check-in");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut rng = rand::thread_rng();
    let response = CheckResponse {
        city: location.name,
        country: location.country,
        aqi: snapshot.aqi,
        level: snapshot.aqi.name(),
        mood: snapshot.aqi.mood(),
        composite_score: scoring::composite_score(&snapshot.pollutants),
        weather,
        health_score: risk::health_score(snapshot.aqi, &snapshot.pollutants, &request.profile),
        risk: risk::risk_assessment(snapshot.aqi, &request.profile),
        persona_message: persona::conditions_message(snapshot.aqi, &mut rng),
        community_tip: persona::community_tip(snapshot.aqi, &mut rng),
        pollutants: snapshot.pollutants,
    };

    info!(
        city = %response.city,
        aqi = response.aqi.value(),
        health_score = response.health_score,
        "Check-in recorded"
    );

    Ok(Json(response))
}

/// GET /trend - Classify the AQI trend over the stored history.
///
/// Fewer than three check-ins yields the defined `insufficient_data`
/// result, not an error.
#[instrument(skip(state))]
pub async fn get_trend(
    State(state): State<AppState>,
) -> Result<Json<TrendAnalysis>, StatusCode> {
    match state.storage.history().await {
        Ok(history) => {
            let analysis = trend::analyze_trend(&history);
            info!(
                entries = history.len(),
                trend = analysis.trend,
                "Trend analyzed"
            );
            Ok(Json(analysis))
        }
        Err(e) => {
            warn!(error = %e, "Failed to load history for trend analysis");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Query parameters for GET /predictions.
#[derive(Debug, Deserialize)]
pub struct PredictionsQuery {
    /// Current AQI category to forecast from.
    pub aqi: i64,

    /// Forecast horizon in hours (default: 24).
    #[serde(default = "default_forecast_hours")]
    pub hours: u32,
}

fn default_forecast_hours() -> u32 {
    24
}

/// Response for GET /predictions.
#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub hourly: Vec<HourlyPrediction>,
    pub weekly: Vec<DailyPrediction>,
}

/// GET /predictions - Synthetic hourly and weekly AQI forecasts.
///
/// # Query Parameters
///
/// - `aqi` (required): current AQI category, 1..=5
/// - `hours` (optional): horizon in hours, default 24, capped at 72
#[instrument]
pub async fn get_predictions(
    Query(query): Query<PredictionsQuery>,
) -> Result<Json<PredictionsResponse>, StatusCode> {
    let current = AqiCategory::new(query.aqi).map_err(|e| {
        warn!(aqi = query.aqi, error = %e, "Invalid AQI for predictions");
        StatusCode::BAD_REQUEST
    })?;

    let hours = query.hours.min(MAX_FORECAST_HOURS);
    let mut rng = rand::thread_rng();

    let response = PredictionsResponse {
        hourly: trend::predict_next_hours(current, hours, &mut rng),
        weekly: trend::predict_weekly(current, Utc::now(), &mut rng),
    };

    info!(aqi = current.value(), hours, "Predictions generated");
    Ok(Json(response))
}

/// Request body for POST /insights and POST /export.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub profile: UserProfile,
}

/// Response for POST /insights.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub city: String,
    pub aqi: AqiCategory,
    pub health_score: u8,
    pub risk: RiskAssessment,
    pub insights: HealthInsights,
    pub recommendations: Vec<Recommendation>,
}

/// POST /insights - Personalized health insights for the latest reading.
///
/// Returns `404` when no check-in has been recorded yet.
#[instrument(skip(state, request))]
pub async fn post_insights(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<InsightsResponse>, StatusCode> {
    let history = match state.storage.history().await {
        Ok(history) => history,
        Err(e) => {
            warn!(error = %e, "Failed to load history for insights");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let Some(latest) = history.last().cloned() else {
        info!("Insights requested with no recorded check-ins");
        return Err(StatusCode::NOT_FOUND);
    };

    let profile = &request.profile;
    let response = InsightsResponse {
        aqi: latest.aqi,
        health_score: risk::health_score(latest.aqi, &latest.pollutants, profile),
        risk: risk::risk_assessment(latest.aqi, profile),
        insights: risk::personalized_risk(latest.aqi, &latest.pollutants, profile, &history),
        recommendations: recommend::recommendations(latest.aqi, profile),
        city: latest.city,
    };

    info!(
        city = %response.city,
        aqi = response.aqi.value(),
        risk_level = response.risk.risk_level.label(),
        "Insights generated"
    );

    Ok(Json(response))
}

/// Response for GET /progress.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub state: GamificationState,
    pub timeline: Vec<ProgressPoint>,
    pub daily_challenge: Option<Challenge>,
}

/// GET /progress - Gamification state derived from the stored history.
///
/// An empty history yields zeroed defaults, never an error. The daily
/// challenge is present once at least one check-in exists.
#[instrument(skip(state))]
pub async fn get_progress(
    State(state): State<AppState>,
) -> Result<Json<ProgressResponse>, StatusCode> {
    match state.storage.history().await {
        Ok(history) => {
            let derived = GamificationState::from_history(&history);
            let daily_challenge = history
                .last()
                .map(|entry| gamification::daily_challenge(entry.aqi));

            info!(
                points = derived.points,
                level = derived.level,
                streak = derived.streak,
                "Progress queried"
            );

            Ok(Json(ProgressResponse {
                state: derived,
                timeline: gamification::progress(&history),
                daily_challenge,
            }))
        }
        Err(e) => {
            warn!(error = %e, "Failed to load history for progress");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /export - Export the profile plus full history as a JSON bundle.
#[instrument(skip(state, request))]
pub async fn post_export(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match state.storage.history().await {
        Ok(history) => {
            let bundle = export::export_user_data(&request.profile, &history, Utc::now());
            info!(entries = history.len(), "Export generated");
            Ok(Json(bundle))
        }
        Err(e) => {
            warn!(error = %e, "Failed to load history for export");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
