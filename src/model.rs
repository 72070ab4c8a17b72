//! Data models for BreatheWise.
//!
//! Everything the scoring pipeline consumes is plain data owned by the
//! caller: a pollutant snapshot, a validated AQI category, a user profile,
//! and an ordered check-in history. Engines never mutate these inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised at the data boundary.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The upstream API handed us an AQI outside the documented 1..=5 range.
    #[error("air quality category {0} is outside the valid range 1-5")]
    InvalidCategory(i64),
}

/// Air Quality Index category: 1 (best) through 5 (worst).
///
/// Wire values are validated on construction; anything outside [1,5] is a
/// caller contract violation and fails fast with [`ModelError::InvalidCategory`]
/// rather than being silently clamped into a misleading score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AqiCategory(u8);

impl AqiCategory {
    /// Construct a category from a raw integer, validating the range.
    pub fn new(value: i64) -> Result<Self, ModelError> {
        if (1..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ModelError::InvalidCategory(value))
        }
    }

    /// The raw category value, guaranteed to be in 1..=5.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Human-readable level name for this category.
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Excellent",
            2 => "Good",
            3 => "Moderate",
            4 => "Poor",
            _ => "Hazardous",
        }
    }

    /// One-word mood descriptor used by the persona layer.
    pub fn mood(self) -> &'static str {
        match self.0 {
            1 => "Energetic",
            2 => "Positive",
            3 => "Cautious",
            4 => "Concerned",
            _ => "Alert",
        }
    }
}

impl TryFrom<u8> for AqiCategory {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<AqiCategory> for u8 {
    fn from(category: AqiCategory) -> Self {
        category.0
    }
}

/// A snapshot of pollutant concentrations in µg/m³, keyed by pollutant code
/// (`pm2_5`, `pm10`, `o3`, `no2`, `so2`, `co`).
///
/// The map is string-keyed on purpose: upstream APIs include extra
/// components (e.g. `no`, `nh3`) which the scoring weight table silently
/// ignores. A missing pollutant is treated as absent, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollutantReading(BTreeMap<String, f64>);

impl PollutantReading {
    /// Concentration for a pollutant code, or `None` if absent.
    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    /// Iterate over all (code, concentration) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(code, value)| (code.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for PollutantReading {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, f64); N]> for PollutantReading {
    fn from(entries: [(&str, f64); N]) -> Self {
        entries
            .into_iter()
            .map(|(code, value)| (code.to_string(), value))
            .collect()
    }
}

/// Age bracket of the user, used for risk adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    Teen,
    #[default]
    Adult,
    Senior,
}

impl AgeGroup {
    /// Flat health-score adjustment for this age bracket.
    pub fn score_adjustment(self) -> f64 {
        match self {
            AgeGroup::Child => -10.0,
            AgeGroup::Teen => -5.0,
            AgeGroup::Adult => 0.0,
            AgeGroup::Senior => -15.0,
        }
    }

    /// Multiplicative risk factor for the personalized risk score.
    pub fn risk_factor(self) -> f64 {
        match self {
            AgeGroup::Child => 1.2,
            AgeGroup::Teen | AgeGroup::Adult => 1.0,
            AgeGroup::Senior => 1.3,
        }
    }
}

/// A health condition tag from the profile vocabulary.
///
/// `None` is a no-op tag: it counts neither toward score penalties nor
/// toward sensitive-group membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthCondition {
    None,
    Asthma,
    Allergies,
    #[serde(rename = "Heart Condition")]
    HeartCondition,
    #[serde(rename = "Respiratory Issues")]
    RespiratoryIssues,
    Pregnancy,
}

impl HealthCondition {
    /// Whether this condition places the user in the sensitive group.
    pub fn is_sensitive(self) -> bool {
        !matches!(self, HealthCondition::None)
    }

    /// Whether this condition is aggravated by airborne particulates,
    /// for outdoor-activity confidence penalties.
    pub fn is_respiratory(self) -> bool {
        matches!(
            self,
            HealthCondition::Asthma | HealthCondition::RespiratoryIssues
        )
    }
}

/// Self-reported activity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
    Athlete,
}

/// User health profile. Owned by the caller and passed by reference into
/// every engine call; the server never stores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub age_group: AgeGroup,

    #[serde(default)]
    pub health_conditions: Vec<HealthCondition>,

    #[serde(default)]
    pub activity_level: ActivityLevel,
}

impl UserProfile {
    /// Whether any of the profile's conditions places it in the fixed
    /// sensitive set (everything except the `None` tag).
    pub fn is_sensitive_group(&self) -> bool {
        self.health_conditions.iter().any(|c| c.is_sensitive())
    }

    /// Number of real (non-`None`) health condition tags.
    pub fn condition_count(&self) -> usize {
        self.health_conditions
            .iter()
            .filter(|c| c.is_sensitive())
            .count()
    }

    /// Whether the profile carries a respiratory condition.
    pub fn has_respiratory_condition(&self) -> bool {
        self.health_conditions.iter().any(|c| c.is_respiratory())
    }
}

/// A single recorded air-quality check-in.
///
/// The history is an append-only sequence owned by the orchestrator;
/// engines receive a read-only slice. Timestamps are informative but not
/// strictly increasing: two check-ins on the same calendar day are legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the check-in was recorded (UTC, server-assigned).
    pub timestamp: DateTime<Utc>,

    /// Resolved city name for the check-in.
    pub city: String,

    /// The AQI category observed.
    pub aqi: AqiCategory,

    /// Pollutant snapshot at the time of the check-in.
    pub pollutants: PollutantReading,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_accepts_valid_range() {
        for value in 1..=5 {
            let category = AqiCategory::new(value).unwrap();
            assert_eq!(i64::from(category.value()), value);
        }
    }

    #[test]
    fn category_rejects_out_of_range() {
        assert!(AqiCategory::new(0).is_err());
        assert!(AqiCategory::new(6).is_err());
        assert!(AqiCategory::new(-3).is_err());
    }

    #[test]
    fn category_deserialization_validates() {
        let category: AqiCategory = serde_json::from_str("3").unwrap();
        assert_eq!(category.value(), 3);

        assert!(serde_json::from_str::<AqiCategory>("0").is_err());
        assert!(serde_json::from_str::<AqiCategory>("9").is_err());
    }

    #[test]
    fn level_names_cover_all_categories() {
        let names: Vec<_> = (1..=5)
            .map(|v| AqiCategory::new(v).unwrap().name())
            .collect();
        assert_eq!(
            names,
            ["Excellent", "Good", "Moderate", "Poor", "Hazardous"]
        );
    }

    #[test]
    fn condition_names_use_wire_spelling() {
        let condition: HealthCondition = serde_json::from_str("\"Heart Condition\"").unwrap();
        assert_eq!(condition, HealthCondition::HeartCondition);

        let condition: HealthCondition = serde_json::from_str("\"Respiratory Issues\"").unwrap();
        assert_eq!(condition, HealthCondition::RespiratoryIssues);
    }

    #[test]
    fn none_tag_is_not_sensitive() {
        let profile = UserProfile {
            health_conditions: vec![HealthCondition::None],
            ..UserProfile::default()
        };
        assert!(!profile.is_sensitive_group());
        assert_eq!(profile.condition_count(), 0);
    }

    #[test]
    fn any_real_condition_is_sensitive() {
        for condition in [
            HealthCondition::Asthma,
            HealthCondition::Allergies,
            HealthCondition::HeartCondition,
            HealthCondition::RespiratoryIssues,
            HealthCondition::Pregnancy,
        ] {
            let profile = UserProfile {
                health_conditions: vec![HealthCondition::None, condition],
                ..UserProfile::default()
            };
            assert!(profile.is_sensitive_group());
            assert_eq!(profile.condition_count(), 1);
        }
    }

    #[test]
    fn missing_pollutant_is_absent_not_zero() {
        let reading = PollutantReading::from([("pm2_5", 12.0)]);
        assert_eq!(reading.get("pm2_5"), Some(12.0));
        assert_eq!(reading.get("o3"), None);
    }
}
