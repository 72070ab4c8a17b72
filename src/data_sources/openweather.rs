//! OpenWeatherMap client.
//!
//! Covers the three lookups the dashboard needs: forward geocoding of a
//! city name, the current air pollution reading (AQI category plus
//! pollutant components), and the current weather.
//!
//! # API Reference
//!
//! See: <https://openweathermap.org/api/air-pollution> and
//! <https://openweathermap.org/api/geocoding-api>
//!
//! AQI categories on the wire use OpenWeatherMap's 1..=5 scale; values
//! outside that range fail validation here at the boundary instead of
//! leaking into the scoring pipeline.

use serde::Deserialize;

use crate::model::{AqiCategory, PollutantReading};

/// Base URL for the OpenWeatherMap API.
const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";

/// Client for the OpenWeatherMap geocoding, air pollution, and weather APIs.
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new client with default settings.
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: OPENWEATHER_API_BASE.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a new client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Resolve a city name to coordinates.
    ///
    /// Returns `None` when the geocoder knows no city by that name.
    pub async fn geocode(&self, city: &str) -> anyhow::Result<Option<GeoLocation>> {
        let url = format!(
            "{}/geo/1.0/direct?q={}&limit=1&appid={}",
            self.base_url,
            urlencoding::encode(city),
            self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let mut matches = response.json::<Vec<GeoLocation>>().await?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }

    /// Fetch the current air pollution reading for a coordinate.
    ///
    /// Returns `None` when the API has no data for the location. An AQI
    /// outside 1..=5 is a contract violation and surfaces as an error.
    pub async fn fetch_air_quality(
        &self,
        lat: f64,
        lon: f64,
    ) -> anyhow::Result<Option<AirQualitySnapshot>> {
        let url = format!(
            "{}/data/2.5/air_pollution?lat={}&lon={}&appid={}",
            self.base_url, lat, lon, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let data = response.json::<AirPollutionResponse>().await?;
        data.into_snapshot()
    }

    /// Fetch the current weather (metric units) for a coordinate.
    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> anyhow::Result<Option<WeatherSnapshot>> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&units=metric&appid={}",
            self.base_url, lat, lon, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let data = response.json::<WeatherResponse>().await?;
        Ok(Some(WeatherSnapshot {
            temperature: data.main.temp,
            humidity: data.main.humidity,
        }))
    }
}

/// A geocoding match.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// A validated air pollution reading.
#[derive(Debug, Clone)]
pub struct AirQualitySnapshot {
    pub aqi: AqiCategory,
    pub pollutants: PollutantReading,
}

/// Wire format of the air pollution endpoint.
#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AirPollutionMain,
    components: PollutantReading,
}

#[derive(Debug, Deserialize)]
struct AirPollutionMain {
    aqi: i64,
}

impl AirPollutionResponse {
    fn into_snapshot(mut self) -> anyhow::Result<Option<AirQualitySnapshot>> {
        if self.list.is_empty() {
            return Ok(None);
        }

        let entry = self.list.swap_remove(0);
        let aqi = AqiCategory::new(entry.main.aqi)?;

        Ok(Some(AirQualitySnapshot {
            aqi,
            pollutants: entry.components,
        }))
    }
}

/// Wire format of the weather endpoint.
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: WeatherMain,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    humidity: f64,
}

/// Current weather conditions relevant to the dashboard.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct WeatherSnapshot {
    /// Temperature in °C.
    pub temperature: f64,

    /// Relative humidity in percent.
    pub humidity: f64,
}
