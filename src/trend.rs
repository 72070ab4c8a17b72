//! Trend classification and short-horizon synthetic forecasts.
//!
//! `analyze_trend` compares the mean AQI of the newest three check-ins to
//! the oldest three and classifies the direction of change. The hourly and
//! weekly predictors are deterministic-shape synthetic signals (a diurnal
//! sinusoid plus bounded noise), not fitted models; the noise source is
//! injected so tests can seed it.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Duration, Utc};
use rand::Rng;
use serde::Serialize;

use crate::model::{AqiCategory, HistoryEntry};

/// Minimum history length for a meaningful trend comparison.
const MIN_TREND_ENTRIES: usize = 3;

/// Threshold on the average-AQI change before the trend leaves "stable".
const TREND_CHANGE_THRESHOLD: f64 = 0.5;

/// Result of [`analyze_trend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    /// "improving", "stable", "worsening", or "insufficient_data".
    pub trend: &'static str,

    /// Recent average AQI minus older average, rounded to 2 decimals.
    pub change: f64,

    /// Forecast label mirroring the trend, or "unknown".
    pub forecast: &'static str,

    /// Grows linearly with history length, capped at 1.0.
    pub confidence: f64,
}

/// One hour of the synthetic forecast.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyPrediction {
    /// Hours from now, starting at 1.
    pub hour: u32,

    /// Predicted AQI, clamped to [1.0, 5.0], 1 decimal.
    pub predicted_aqi: f64,

    /// Per-hour confidence, drawn independently from [0.7, 0.95).
    pub confidence: f64,
}

/// One day of the weekly outlook.
#[derive(Debug, Clone, Serialize)]
pub struct DailyPrediction {
    /// ISO date (YYYY-MM-DD).
    pub date: String,

    /// Weekday abbreviation (Mon, Tue, ...).
    pub day: String,

    /// Predicted AQI, clamped to [1.0, 5.0], 1 decimal.
    pub predicted_aqi: f64,
}

/// Classify the AQI trend over the check-in history.
///
/// The history is sorted by timestamp internally; callers may pass entries
/// in any order. Fewer than three entries yields the defined
/// `insufficient_data` result, not an error. When the history holds between
/// three and six entries the "recent" and "older" windows overlap; that
/// overlap is intentional.
pub fn analyze_trend(history: &[HistoryEntry]) -> TrendAnalysis {
    if history.len() < MIN_TREND_ENTRIES {
        return TrendAnalysis {
            trend: "insufficient_data",
            change: 0.0,
            forecast: "unknown",
            confidence: 0.0,
        };
    }

    let mut sorted: Vec<&HistoryEntry> = history.iter().collect();
    sorted.sort_by_key(|entry| entry.timestamp);

    let mean_aqi = |entries: &[&HistoryEntry]| {
        entries
            .iter()
            .map(|entry| f64::from(entry.aqi.value()))
            .sum::<f64>()
            / entries.len() as f64
    };

    let recent_avg = mean_aqi(&sorted[sorted.len() - MIN_TREND_ENTRIES..]);
    let older_avg = mean_aqi(&sorted[..MIN_TREND_ENTRIES]);
    let change = recent_avg - older_avg;

    let (trend, forecast) = if change > TREND_CHANGE_THRESHOLD {
        ("worsening", "may_worsen")
    } else if change < -TREND_CHANGE_THRESHOLD {
        ("improving", "likely_to_improve")
    } else {
        ("stable", "stable_conditions")
    };

    TrendAnalysis {
        trend,
        change: (change * 100.0).round() / 100.0,
        forecast,
        confidence: (history.len() as f64 / 10.0).min(1.0),
    }
}

/// Predict AQI for the next `hours` hours from the current category.
///
/// Shape: a 24-hour sinusoid (diurnal variation) at half amplitude, a fixed
/// ±0.1 step assuming evening improvement, and uniform noise in ±0.3.
/// Results are clamped to the valid category range before rounding.
pub fn predict_next_hours<R: Rng>(
    current: AqiCategory,
    hours: u32,
    rng: &mut R,
) -> Vec<HourlyPrediction> {
    let base = f64::from(current.value());

    (1..=hours)
        .map(|hour| {
            let time_factor = (f64::from(hour) * PI / 12.0).sin();
            let trend_term = if hour > 12 { -0.1 } else { 0.1 };
            let noise = rng.gen_range(-0.3..0.3);

            let predicted = (base + time_factor * 0.5 + trend_term + noise).clamp(1.0, 5.0);

            HourlyPrediction {
                hour,
                predicted_aqi: (predicted * 10.0).round() / 10.0,
                confidence: rng.gen_range(0.7..0.95),
            }
        })
        .collect()
}

/// Predict the weekly AQI outlook starting from `start`.
///
/// Day offsets 5 and 6 carry a fixed weekend adjustment; every day adds
/// uniform weather noise in ±0.5.
pub fn predict_weekly<R: Rng>(
    current: AqiCategory,
    start: DateTime<Utc>,
    rng: &mut R,
) -> Vec<DailyPrediction> {
    let base = f64::from(current.value());

    (0..7)
        .map(|offset| {
            let weekend_factor = if offset == 5 || offset == 6 { 0.3 } else { 0.0 };
            let weather_factor = rng.gen_range(-0.5..0.5);

            let predicted = (base + weekend_factor + weather_factor).clamp(1.0, 5.0);
            let date = start + Duration::days(offset);

            DailyPrediction {
                date: date.format("%Y-%m-%d").to_string(),
                day: date.weekday().to_string(),
                predicted_aqi: (predicted * 10.0).round() / 10.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PollutantReading;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(day: i64, aqi: i64) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::days(day),
            city: "Testville".to_string(),
            aqi: AqiCategory::new(aqi).unwrap(),
            pollutants: PollutantReading::default(),
        }
    }

    #[test]
    fn short_history_is_insufficient_data() {
        for len in 0..3 {
            let history: Vec<_> = (0..len).map(|d| entry(d, 2)).collect();
            let analysis = analyze_trend(&history);

            assert_eq!(analysis.trend, "insufficient_data");
            assert_eq!(analysis.change, 0.0);
            assert_eq!(analysis.forecast, "unknown");
        }
    }

    #[test]
    fn flat_history_is_stable() {
        let history: Vec<_> = (0..6).map(|d| entry(d, 3)).collect();
        let analysis = analyze_trend(&history);

        assert_eq!(analysis.trend, "stable");
        assert_eq!(analysis.change, 0.0);
        assert_eq!(analysis.forecast, "stable_conditions");
    }

    #[test]
    fn rising_aqi_is_worsening() {
        let values = [1, 1, 1, 4, 4, 4];
        let history: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(d, &aqi)| entry(d as i64, aqi))
            .collect();

        let analysis = analyze_trend(&history);
        assert_eq!(analysis.trend, "worsening");
        assert_eq!(analysis.change, 3.0);
        assert_eq!(analysis.forecast, "may_worsen");
    }

    #[test]
    fn falling_aqi_is_improving() {
        let values = [5, 5, 4, 2, 1, 1];
        let history: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(d, &aqi)| entry(d as i64, aqi))
            .collect();

        let analysis = analyze_trend(&history);
        assert_eq!(analysis.trend, "improving");
        assert_eq!(analysis.forecast, "likely_to_improve");
    }

    #[test]
    fn caller_order_does_not_matter() {
        // Newest entries first; analyze_trend must sort internally.
        let values = [4, 4, 4, 1, 1, 1]; // days 5..0 descending
        let history: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &aqi)| entry(5 - i as i64, aqi))
            .collect();

        let analysis = analyze_trend(&history);
        assert_eq!(analysis.trend, "worsening");
    }

    #[test]
    fn confidence_grows_with_history_and_caps() {
        let history: Vec<_> = (0..4).map(|d| entry(d, 2)).collect();
        assert_eq!(analyze_trend(&history).confidence, 0.4);

        let history: Vec<_> = (0..25).map(|d| entry(d, 2)).collect();
        assert_eq!(analyze_trend(&history).confidence, 1.0);
    }

    #[test]
    fn hourly_predictions_stay_in_category_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let predictions = predict_next_hours(AqiCategory::new(5).unwrap(), 24, &mut rng);

        assert_eq!(predictions.len(), 24);
        for (index, prediction) in predictions.iter().enumerate() {
            assert_eq!(prediction.hour, index as u32 + 1);
            assert!((1.0..=5.0).contains(&prediction.predicted_aqi));
            assert!((0.7..0.95).contains(&prediction.confidence));
        }
    }

    #[test]
    fn hourly_predictions_are_deterministic_under_a_seed() {
        let current = AqiCategory::new(3).unwrap();

        let mut first_rng = StdRng::seed_from_u64(42);
        let mut second_rng = StdRng::seed_from_u64(42);

        let first = predict_next_hours(current, 12, &mut first_rng);
        let second = predict_next_hours(current, 12, &mut second_rng);

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.predicted_aqi, b.predicted_aqi);
            assert_eq!(a.confidence, b.confidence);
        }
    }

    #[test]
    fn weekly_outlook_covers_seven_consecutive_days() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap(); // a Monday
        let mut rng = StdRng::seed_from_u64(1);

        let outlook = predict_weekly(AqiCategory::new(2).unwrap(), start, &mut rng);

        assert_eq!(outlook.len(), 7);
        assert_eq!(outlook[0].date, "2024-03-04");
        assert_eq!(outlook[0].day, "Mon");
        assert_eq!(outlook[6].date, "2024-03-10");
        assert_eq!(outlook[6].day, "Sun");

        for day in &outlook {
            assert!((1.0..=5.0).contains(&day.predicted_aqi));
        }
    }
}
