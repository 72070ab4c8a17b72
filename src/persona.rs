//! Persona flavor text for the dashboard.
//!
//! Pure template lookup keyed by AQI category with a uniform random pick,
//! isolated behind an injected RNG. No logic lives here beyond total
//! coverage of the five categories.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::AqiCategory;

const WELCOME: [&str; 3] = [
    "Welcome to your personal air quality journey! Here to help you breathe smarter and live healthier.",
    "Ready to discover what the air around you is telling you? Let's explore together.",
    "Your air quality companion is here. Let's make breathing an adventure.",
];

const EXCELLENT: [&str; 3] = [
    "Fantastic! The air is absolutely pristine today, perfect for all your outdoor plans.",
    "This is air quality gold. Time to step outside and enjoy it.",
    "The atmosphere is at its cleanest today. What outdoor adventure calls to you?",
];

const GOOD: [&str; 3] = [
    "The air quality is looking great! A wonderful day to be active outside.",
    "Good air today. Perfect timing for that outdoor activity you've been planning.",
    "The air is welcoming you outside. Enjoy the fresh atmosphere.",
];

const MODERATE: [&str; 3] = [
    "The air has some personality today. Maybe balance indoor and outdoor activities?",
    "It's a middling air day, a good time for mindful choices about your activities.",
    "Air quality is moderate. A great time to be aware and make smart decisions.",
];

const POOR: [&str; 3] = [
    "The air needs some love today. Focus on indoor wellness and protection.",
    "Time for cozy indoor activities while the air recovers outside.",
    "Your health comes first. Make today about indoor comfort and care.",
];

const HAZARDOUS: [&str; 3] = [
    "The air needs serious attention today. Stay protected indoors.",
    "This is a day for maximum protection and indoor shelter.",
    "Severe air quality. Time for complete indoor protection.",
];

const COMMUNITY_TIPS: [[&str; 3]; 5] = [
    [
        "Perfect day for outdoor photography. Share your clear sky photos!",
        "Runners in your area recommend early morning jogs today.",
        "Garden enthusiasts say it's ideal for planting and outdoor garden work.",
    ],
    [
        "Local cyclists suggest scenic route rides today.",
        "Yoga groups are meeting in parks, great air for outdoor practice.",
        "Walking groups report excellent conditions for nature walks.",
    ],
    [
        "Community suggests limiting outdoor workout duration to 30-45 minutes.",
        "Indoor fitness enthusiasts recommend trying new workout videos.",
        "Plant lovers suggest checking on indoor air-purifying plants today.",
    ],
    [
        "Community recommends N95 masks for essential outdoor activities.",
        "Indoor cooking enthusiasts share healthy immune-boosting recipes.",
        "Air purifier users suggest running them on high today.",
    ],
    [
        "Emergency tip: stay indoors and seal windows if needed.",
        "Health groups recommend monitoring symptoms and seeking help if needed.",
        "Essential workers in your area recommend maximum protection gear.",
    ],
];

fn pick<R: Rng>(templates: &[&'static str], rng: &mut R) -> &'static str {
    // Tables are non-empty by construction.
    templates.choose(rng).copied().unwrap_or("")
}

/// A welcome message for first contact.
pub fn welcome_message<R: Rng>(rng: &mut R) -> &'static str {
    pick(&WELCOME, rng)
}

/// A persona message describing the current conditions.
pub fn conditions_message<R: Rng>(aqi: AqiCategory, rng: &mut R) -> &'static str {
    let templates: &[&'static str] = match aqi.value() {
        1 => &EXCELLENT,
        2 => &GOOD,
        3 => &MODERATE,
        4 => &POOR,
        _ => &HAZARDOUS,
    };
    pick(templates, rng)
}

/// A community tip matching the current conditions.
pub fn community_tip<R: Rng>(aqi: AqiCategory, rng: &mut R) -> &'static str {
    pick(&COMMUNITY_TIPS[usize::from(aqi.value() - 1)], rng)
}
