//! User data export.
//!
//! Bundles the profile, the full check-in history, and summary statistics
//! into a single JSON document for download. The engines' outputs are the
//! fields serialized here; nothing is persisted.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::model::{HistoryEntry, UserProfile};

/// Build the export bundle for a profile and its history.
///
/// Summary stats: total check-ins, mean AQI (0 for an empty history), and
/// the number of distinct cities monitored.
pub fn export_user_data(
    profile: &UserProfile,
    history: &[HistoryEntry],
    exported_at: DateTime<Utc>,
) -> Value {
    let average_aqi = if history.is_empty() {
        0.0
    } else {
        history
            .iter()
            .map(|entry| f64::from(entry.aqi.value()))
            .sum::<f64>()
            / history.len() as f64
    };

    let cities: BTreeSet<&str> = history.iter().map(|entry| entry.city.as_str()).collect();

    let entries: Vec<Value> = history
        .iter()
        .map(|entry| {
            json!({
                "timestamp": entry.timestamp.to_rfc3339(),
                "city": entry.city,
                "aqi": entry.aqi,
                "pollutants": entry.pollutants,
            })
        })
        .collect();

    json!({
        "user_profile": profile,
        "air_quality_history": entries,
        "export_timestamp": exported_at.to_rfc3339(),
        "summary": {
            "total_checks": history.len(),
            "average_aqi": average_aqi,
            "cities_monitored": cities.len(),
        },
    })
}
