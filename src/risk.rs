//! Personalized health-risk analysis.
//!
//! Converts an AQI category, a pollutant snapshot, and a user profile into
//! a 0-100 health score, a tiered risk assessment, and a personalized
//! insight bundle. Sensitive-group users (asthma, allergies, respiratory
//! issues, heart condition, pregnancy) get an escalated risk tier once the
//! AQI reaches Moderate.

use serde::Serialize;

use crate::model::{AgeGroup, AqiCategory, HealthCondition, HistoryEntry, PollutantReading, UserProfile};

/// Ordinal risk tier. The base scale runs Very Low..Very High; `Extreme`
/// is only reachable through the sensitive-group escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
    Extreme,
}

impl RiskLevel {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
            RiskLevel::Extreme => "Extreme",
        }
    }

    /// Fixed guidance lines for this tier.
    fn recommendations(self) -> &'static [&'static str] {
        match self {
            RiskLevel::VeryLow => &[
                "Enjoy outdoor activities",
                "Perfect time for exercise",
                "Open windows for fresh air",
            ],
            RiskLevel::Low => &[
                "Good for most outdoor activities",
                "Monitor if sensitive",
                "Stay hydrated",
            ],
            RiskLevel::Moderate => &[
                "Limit prolonged outdoor exercise",
                "Consider indoor alternatives",
                "Wear mask if sensitive",
            ],
            RiskLevel::High => &[
                "Avoid outdoor exercise",
                "Stay indoors when possible",
                "Use air purifier",
            ],
            RiskLevel::VeryHigh => &[
                "Mandatory indoor stay",
                "Seal windows",
                "Seek medical advice if symptomatic",
            ],
            RiskLevel::Extreme => &[
                "Emergency protocols",
                "Immediate shelter",
                "Contact healthcare provider",
            ],
        }
    }
}

/// Base risk tiers indexed by AQI category (1..=5).
const BASE_TIERS: [RiskLevel; 5] = [
    RiskLevel::VeryLow,
    RiskLevel::Low,
    RiskLevel::Moderate,
    RiskLevel::High,
    RiskLevel::VeryHigh,
];

/// Escalated tiers for sensitive users, indexed by aqi - 1 (capped at 4).
/// The one-step offset against [`BASE_TIERS`] is the deliberate severity
/// bump for vulnerable users.
const SENSITIVE_TIERS: [RiskLevel; 5] = [
    RiskLevel::Low,
    RiskLevel::Moderate,
    RiskLevel::High,
    RiskLevel::VeryHigh,
    RiskLevel::Extreme,
];

/// Result of [`risk_assessment`].
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub is_sensitive_group: bool,
    pub recommendations: Vec<&'static str>,
}

/// Result of [`personalized_risk`].
#[derive(Debug, Clone, Serialize)]
pub struct HealthInsights {
    /// AQI scaled by age and health factors, capped at 5, 1 decimal.
    pub adjusted_risk_score: f64,

    /// Exposure trend from the mean historical AQI:
    /// "high" / "moderate" / "low", or "unknown" with no history.
    pub exposure_history: &'static str,

    /// Pollutants currently above their concern thresholds.
    pub concerning_pollutants: Vec<&'static str>,

    /// Advice lines assembled from tier, age, and condition rules.
    pub personalized_advice: Vec<&'static str>,

    /// Required protection level derived from the adjusted risk.
    pub protection_level: &'static str,
}

/// Compute the personalized health score in [0, 100].
///
/// Starts from `100 - (aqi - 1) * 20`, applies the age-group adjustment,
/// subtracts 5 per real health condition and `pm2_5 / 10` as a
/// fine-particle penalty, then clamps and rounds.
pub fn health_score(
    aqi: AqiCategory,
    pollutants: &PollutantReading,
    profile: &UserProfile,
) -> u8 {
    let base = 100.0 - f64::from(aqi.value() - 1) * 20.0;

    let age_adjustment = profile.age_group.score_adjustment();
    let condition_adjustment = -5.0 * profile.condition_count() as f64;
    let pm25_penalty = -pollutants.get("pm2_5").unwrap_or(0.0) / 10.0;

    let score = (base + age_adjustment + condition_adjustment + pm25_penalty).clamp(0.0, 100.0);
    score.round() as u8
}

/// Tiered risk assessment for the given AQI and profile.
pub fn risk_assessment(aqi: AqiCategory, profile: &UserProfile) -> RiskAssessment {
    let is_sensitive = profile.is_sensitive_group();
    let index = usize::from(aqi.value() - 1);

    let risk_level = if is_sensitive && aqi.value() >= 3 {
        SENSITIVE_TIERS[index.min(4)]
    } else {
        BASE_TIERS[index]
    };

    let mut recommendations: Vec<&'static str> = risk_level.recommendations().to_vec();
    if is_sensitive {
        recommendations.push("Extra precautions for sensitive individuals");
    }

    RiskAssessment {
        risk_level,
        is_sensitive_group: is_sensitive,
        recommendations,
    }
}

/// Personalized risk bundle combining the profile, the current reading,
/// and the user's exposure history.
pub fn personalized_risk(
    aqi: AqiCategory,
    pollutants: &PollutantReading,
    profile: &UserProfile,
    history: &[HistoryEntry],
) -> HealthInsights {
    let age_factor = profile.age_group.risk_factor();
    let health_factor = if profile.is_sensitive_group() { 1.4 } else { 1.0 };
    let adjusted_risk = (f64::from(aqi.value()) * age_factor * health_factor).min(5.0);

    let exposure_history = if history.is_empty() {
        "unknown"
    } else {
        let mean_aqi = history
            .iter()
            .map(|entry| f64::from(entry.aqi.value()))
            .sum::<f64>()
            / history.len() as f64;
        if mean_aqi > 3.0 {
            "high"
        } else if mean_aqi > 2.0 {
            "moderate"
        } else {
            "low"
        }
    };

    HealthInsights {
        adjusted_risk_score: (adjusted_risk * 10.0).round() / 10.0,
        exposure_history,
        concerning_pollutants: concerning_pollutants(pollutants),
        personalized_advice: personalized_advice(adjusted_risk, profile),
        protection_level: protection_level(adjusted_risk),
    }
}

/// Pollutants above their fixed concern thresholds.
fn concerning_pollutants(pollutants: &PollutantReading) -> Vec<&'static str> {
    let mut concerning = Vec::new();

    if pollutants.get("pm2_5").unwrap_or(0.0) > 35.0 {
        concerning.push("PM2.5 (fine particles)");
    }
    if pollutants.get("o3").unwrap_or(0.0) > 100.0 {
        concerning.push("Ozone");
    }
    if pollutants.get("no2").unwrap_or(0.0) > 40.0 {
        concerning.push("Nitrogen Dioxide");
    }

    concerning
}

/// Advice lines assembled from the risk tier plus age and condition rules.
fn personalized_advice(risk_score: f64, profile: &UserProfile) -> Vec<&'static str> {
    let mut advice: Vec<&'static str> = if risk_score >= 4.0 {
        vec![
            "Stay indoors as much as possible",
            "Use air purifiers if available",
            "Avoid all outdoor exercise",
        ]
    } else if risk_score >= 3.0 {
        vec![
            "Limit outdoor activities",
            "Wear N95 mask when outside",
            "Consider indoor alternatives for exercise",
        ]
    } else {
        vec![
            "Normal activities are generally safe",
            "Stay hydrated",
            "Monitor air quality regularly",
        ]
    };

    if matches!(profile.age_group, AgeGroup::Child | AgeGroup::Senior) {
        advice.push("Extra caution recommended due to age sensitivity");
    }

    if profile.health_conditions.contains(&HealthCondition::Asthma) {
        advice.push("Keep rescue inhaler readily available");
    }
    if profile.health_conditions.contains(&HealthCondition::Allergies) {
        advice.push("Consider antihistamines as directed by healthcare provider");
    }
    if profile
        .health_conditions
        .contains(&HealthCondition::HeartCondition)
    {
        advice.push("Monitor for chest discomfort or unusual fatigue");
    }

    advice
}

/// Protection level from fixed thresholds on the adjusted risk score.
fn protection_level(risk_score: f64) -> &'static str {
    if risk_score >= 4.5 {
        "Maximum Protection"
    } else if risk_score >= 3.5 {
        "High Protection"
    } else if risk_score >= 2.5 {
        "Moderate Protection"
    } else {
        "Basic Awareness"
    }
}
