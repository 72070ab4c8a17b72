//! Activity recommendations ranked per AQI category.
//!
//! Each category carries a fixed list of suggested activities with base
//! confidence values; the profile nudges those confidences up or down.
//! Adjusted confidences are intentionally not re-clamped to [0, 100].

use serde::Serialize;

use crate::model::{ActivityLevel, AqiCategory, UserProfile};

/// Number of recommendations returned.
const TOP_N: usize = 3;

/// Confidence boost for profiles whose activity level matches conditions.
const ACTIVITY_MATCH_BOOST: i32 = 5;

/// Confidence penalty on outdoor activities for respiratory profiles in
/// degraded air.
const RESPIRATORY_OUTDOOR_PENALTY: i32 = 20;

/// A recommended activity with its adjusted confidence.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub activity: &'static str,
    pub description: &'static str,
    pub confidence: i32,
    pub outdoor: bool,
}

struct ActivityTemplate {
    activity: &'static str,
    description: &'static str,
    confidence: i32,
    outdoor: bool,
}

const EXCELLENT_AIR: [ActivityTemplate; 3] = [
    ActivityTemplate {
        activity: "Outdoor Running",
        description: "Perfect conditions for a morning jog",
        confidence: 95,
        outdoor: true,
    },
    ActivityTemplate {
        activity: "Cycling",
        description: "Great day for bike rides",
        confidence: 90,
        outdoor: true,
    },
    ActivityTemplate {
        activity: "Outdoor Yoga",
        description: "Practice yoga in the fresh air",
        confidence: 85,
        outdoor: true,
    },
];

const GOOD_AIR: [ActivityTemplate; 3] = [
    ActivityTemplate {
        activity: "Walking",
        description: "Nice day for a pleasant walk",
        confidence: 85,
        outdoor: true,
    },
    ActivityTemplate {
        activity: "Sports",
        description: "Good for outdoor sports",
        confidence: 80,
        outdoor: true,
    },
    ActivityTemplate {
        activity: "Nature Photography",
        description: "Clear skies for photography",
        confidence: 75,
        outdoor: true,
    },
];

const MODERATE_AIR: [ActivityTemplate; 3] = [
    ActivityTemplate {
        activity: "Indoor Exercise",
        description: "Consider gym workouts",
        confidence: 80,
        outdoor: false,
    },
    ActivityTemplate {
        activity: "Shopping",
        description: "Indoor shopping activities",
        confidence: 75,
        outdoor: false,
    },
    ActivityTemplate {
        activity: "Reading",
        description: "Great time for indoor reading",
        confidence: 70,
        outdoor: false,
    },
];

const POOR_AIR: [ActivityTemplate; 3] = [
    ActivityTemplate {
        activity: "Stay Indoors",
        description: "Indoor activities recommended",
        confidence: 90,
        outdoor: false,
    },
    ActivityTemplate {
        activity: "Movie Time",
        description: "Perfect for watching movies",
        confidence: 85,
        outdoor: false,
    },
    ActivityTemplate {
        activity: "Cooking",
        description: "Try new indoor recipes",
        confidence: 80,
        outdoor: false,
    },
];

const HAZARDOUS_AIR: [ActivityTemplate; 3] = [
    ActivityTemplate {
        activity: "Stay Inside",
        description: "Mandatory indoor stay",
        confidence: 95,
        outdoor: false,
    },
    ActivityTemplate {
        activity: "Meditation",
        description: "Practice indoor meditation",
        confidence: 90,
        outdoor: false,
    },
    ActivityTemplate {
        activity: "Creative Arts",
        description: "Indoor creative activities",
        confidence: 85,
        outdoor: false,
    },
];

/// Fixed per-category activity tables, best air first.
fn activities_for(aqi: AqiCategory) -> &'static [ActivityTemplate; 3] {
    match aqi.value() {
        1 => &EXCELLENT_AIR,
        2 => &GOOD_AIR,
        3 => &MODERATE_AIR,
        4 => &POOR_AIR,
        _ => &HAZARDOUS_AIR,
    }
}

/// Top activity recommendations for the AQI category, with confidences
/// adjusted to the profile.
///
/// Active profiles get a boost in clean air, sedentary profiles in
/// degraded air, and respiratory profiles lose confidence in outdoor
/// activities once the AQI reaches Moderate. The adjusted value is not
/// clamped back into [0, 100].
pub fn recommendations(aqi: AqiCategory, profile: &UserProfile) -> Vec<Recommendation> {
    activities_for(aqi)
        .iter()
        .map(|template| {
            let mut confidence = template.confidence;

            if profile.activity_level == ActivityLevel::High && aqi.value() <= 2 {
                confidence += ACTIVITY_MATCH_BOOST;
            } else if profile.activity_level == ActivityLevel::Low && aqi.value() >= 3 {
                confidence += ACTIVITY_MATCH_BOOST;
            }

            if profile.has_respiratory_condition() && template.outdoor && aqi.value() >= 3 {
                confidence -= RESPIRATORY_OUTDOOR_PENALTY;
            }

            Recommendation {
                activity: template.activity,
                description: template.description,
                confidence,
                outdoor: template.outdoor,
            }
        })
        .take(TOP_N)
        .collect()
}
