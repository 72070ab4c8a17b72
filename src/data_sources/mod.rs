//! External data sources for location-based air quality and weather.
//!
//! One provider backs all three lookups the dashboard needs:
//!
//! - [`openweather`]: OpenWeatherMap geocoding, air pollution, and weather

pub mod openweather;

pub use openweather::OpenWeatherClient;
