//! BreatheWise - a personal air-quality dashboard service.
//!
//! # Overview
//!
//! BreatheWise fetches location-based pollution and weather data, scores it
//! against a user health profile, and surfaces trend analysis and gamified
//! progress. All scoring is pure computation over caller-supplied inputs:
//! the profile arrives with each request, the check-in history is the only
//! persisted state, and every derived value (scores, streaks, achievements)
//! is recomputed fresh from that history on each call.
//!
//! # Modules
//!
//! - [`model`]: Core data types: pollutant readings, AQI categories, profiles, history
//! - [`scoring`]: Weighted composite pollutant score
//! - [`risk`]: Personalized health scores and tiered risk assessment
//! - [`trend`]: Trend classification and synthetic forecasts
//! - [`gamification`]: Points, levels, streaks, achievements, challenges
//! - [`recommend`]: Activity recommendations per AQI category
//! - [`persona`]: Flavor-text templates keyed by AQI category
//! - [`export`]: JSON export of profile, history, and summary stats
//! - [`data_sources`]: OpenWeatherMap API client
//! - [`storage`]: SQLite check-in history
//! - [`api`]: HTTP API handlers

pub mod api;
pub mod data_sources;
pub mod export;
pub mod gamification;
pub mod model;
pub mod persona;
pub mod recommend;
pub mod risk;
pub mod scoring;
pub mod storage;
pub mod trend;
