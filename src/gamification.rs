//! Gamification: points, levels, streaks, achievements, and challenges.
//!
//! All state here is derived. Points, streaks, and achievements are
//! recomputed from the full history on every call, never mutated
//! incrementally, so the values can never drift from the history that
//! produced them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{AqiCategory, HistoryEntry};

/// Points awarded per check-in.
const POINTS_PER_CHECK_IN: u32 = 5;

/// Flat bonus once the history reaches a week of check-ins.
const WEEK_BONUS: u32 = 50;

/// Bonus per check-in recorded at the best AQI category.
const EXCELLENT_BONUS: u32 = 10;

/// Level thresholds: points below each value map to levels 1..=4,
/// everything above the last to level 5.
const LEVEL_THRESHOLDS: [u32; 4] = [50, 150, 300, 500];

/// Maximum number of achievements returned (newest unlocks win).
const MAX_ACHIEVEMENTS: usize = 3;

/// An unlocked achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points: u32,
}

const FIRST_CHECK: Achievement = Achievement {
    id: "first_check",
    title: "Air Quality Explorer",
    description: "First air quality check!",
    points: 10,
};

const WEEK_STREAK: Achievement = Achievement {
    id: "week_streak",
    title: "Consistency Champion",
    description: "7 days of checking air quality",
    points: 50,
};

const FRESH_AIR_LOVER: Achievement = Achievement {
    id: "fresh_air_lover",
    title: "Fresh Air Enthusiast",
    description: "Enjoyed 5 excellent air quality days",
    points: 40,
};

/// A challenge offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Challenge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub reward: u32,
    pub kind: &'static str,
}

const DAILY_MONITOR: Challenge = Challenge {
    id: "daily_monitor",
    title: "Daily Air Quality Detective",
    description: "Check air quality at least once today",
    reward: 15,
    kind: "daily",
};

const INDOOR_MASTER: Challenge = Challenge {
    id: "indoor_master",
    title: "Indoor Wellness Master",
    description: "Complete 3 indoor activities during poor air quality",
    reward: 75,
    kind: "situational",
};

/// Derived gamification state for a history.
#[derive(Debug, Clone, Serialize)]
pub struct GamificationState {
    pub points: u32,
    pub level: u8,
    pub streak: u32,
    pub achievements: Vec<Achievement>,
}

impl GamificationState {
    /// Recompute the full state from the history.
    pub fn from_history(history: &[HistoryEntry]) -> Self {
        let points = points(history);
        Self {
            points,
            level: level(points),
            streak: streak(history),
            achievements: achievements(history),
        }
    }
}

/// One row of the cumulative progress timeline.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressPoint {
    pub date: String,
    pub points: u32,
    pub level: u8,
}

fn excellent_count(history: &[HistoryEntry]) -> u32 {
    history.iter().filter(|entry| entry.aqi.value() == 1).count() as u32
}

/// Total points for a history: 5 per check-in, a flat 50 once the history
/// holds a week of entries, and 10 per check-in at the best category.
///
/// Monotonically non-decreasing as the history grows, since every term is
/// a non-negative function of history content.
pub fn points(history: &[HistoryEntry]) -> u32 {
    let mut total = history.len() as u32 * POINTS_PER_CHECK_IN;

    if history.len() >= 7 {
        total += WEEK_BONUS;
    }

    total + excellent_count(history) * EXCELLENT_BONUS
}

/// User level in 1..=5 from fixed point thresholds.
pub fn level(points: u32) -> u8 {
    for (index, threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if points < *threshold {
            return index as u8 + 1;
        }
    }
    5
}

/// Count of consecutive calendar days with a check-in, ending at the most
/// recent entry.
///
/// The walk requires each older entry to fall exactly one day before the
/// running date. A repeated check-in on the same calendar day therefore
/// stops the count; same-day entries are not collapsed first.
pub fn streak(history: &[HistoryEntry]) -> u32 {
    let Some(newest) = history.iter().max_by_key(|entry| entry.timestamp) else {
        return 0;
    };

    let mut sorted: Vec<&HistoryEntry> = history.iter().collect();
    sorted.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp));

    let mut streak = 1;
    let mut current_date: NaiveDate = newest.timestamp.date_naive();

    for entry in &sorted[1..] {
        let entry_date = entry.timestamp.date_naive();
        if (current_date - entry_date).num_days() == 1 {
            streak += 1;
            current_date = entry_date;
        } else {
            break;
        }
    }

    streak
}

/// Unlocked achievements, newest-eligible last, capped at the final three.
///
/// Evaluation order is fixed: first check-in, week streak, fresh-air
/// count. The cap is a tail truncation over that order, not a priority
/// selection.
pub fn achievements(history: &[HistoryEntry]) -> Vec<Achievement> {
    let mut unlocked = Vec::new();

    if !history.is_empty() {
        unlocked.push(FIRST_CHECK);
    }
    if streak(history) >= 7 {
        unlocked.push(WEEK_STREAK);
    }
    if excellent_count(history) >= 5 {
        unlocked.push(FRESH_AIR_LOVER);
    }

    let start = unlocked.len().saturating_sub(MAX_ACHIEVEMENTS);
    unlocked.split_off(start)
}

/// Today's challenge: the indoor-focused one when the air is poor,
/// otherwise the generic daily check.
pub fn daily_challenge(current_aqi: AqiCategory) -> Challenge {
    if current_aqi.value() >= 4 {
        INDOOR_MASTER
    } else {
        DAILY_MONITOR
    }
}

/// Cumulative points timeline for charting, one row per check-in in
/// chronological order. The week bonus is excluded here; the timeline only
/// tracks per-entry earnings.
pub fn progress(history: &[HistoryEntry]) -> Vec<ProgressPoint> {
    let mut sorted: Vec<&HistoryEntry> = history.iter().collect();
    sorted.sort_by_key(|entry| entry.timestamp);

    let mut cumulative = 0;
    sorted
        .iter()
        .map(|entry| {
            cumulative += POINTS_PER_CHECK_IN;
            if entry.aqi.value() == 1 {
                cumulative += EXCELLENT_BONUS;
            }

            ProgressPoint {
                date: entry.timestamp.format("%Y-%m-%d").to_string(),
                points: cumulative,
                level: level(cumulative),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PollutantReading;
    use chrono::{Duration, TimeZone, Utc};

    fn entry_on_day(day: i64, aqi: i64) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap() + Duration::days(day),
            city: "Testville".to_string(),
            aqi: AqiCategory::new(aqi).unwrap(),
            pollutants: PollutantReading::default(),
        }
    }

    fn consecutive_days(count: i64, aqi: i64) -> Vec<HistoryEntry> {
        (0..count).map(|day| entry_on_day(day, aqi)).collect()
    }

    #[test]
    fn empty_history_yields_zero_defaults() {
        assert_eq!(points(&[]), 0);
        assert_eq!(streak(&[]), 0);
        assert!(achievements(&[]).is_empty());
        assert!(progress(&[]).is_empty());
    }

    #[test]
    fn points_add_week_and_excellent_bonuses() {
        let history = consecutive_days(7, 1);
        // 7 * 5 + 50 week bonus + 7 * 10 excellent bonus
        assert_eq!(points(&history), 155);

        let history = consecutive_days(6, 2);
        assert_eq!(points(&history), 30);
    }

    #[test]
    fn points_never_decrease_as_history_grows() {
        let mut history = Vec::new();
        let mut previous = 0;

        for day in 0..12 {
            history.push(entry_on_day(day, 1 + (day % 5)));
            let current = points(&history);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn level_boundaries_are_exact() {
        assert_eq!(level(0), 1);
        assert_eq!(level(49), 1);
        assert_eq!(level(50), 2);
        assert_eq!(level(149), 2);
        assert_eq!(level(150), 3);
        assert_eq!(level(299), 3);
        assert_eq!(level(300), 4);
        assert_eq!(level(499), 4);
        assert_eq!(level(500), 5);
        assert_eq!(level(10_000), 5);
    }

    #[test]
    fn consecutive_days_count_toward_streak() {
        let history = consecutive_days(3, 2);
        assert_eq!(streak(&history), 3);
    }

    #[test]
    fn streak_breaks_at_a_gap() {
        let mut history = vec![entry_on_day(0, 2), entry_on_day(1, 2)];
        // two-day gap, then two more consecutive days
        history.push(entry_on_day(4, 2));
        history.push(entry_on_day(5, 2));

        // Walking back from day 5: day 4 counts, day 1 is a gap.
        assert_eq!(streak(&history), 2);
    }

    #[test]
    fn streak_stops_on_same_day_repeat() {
        // Known quirk, preserved deliberately: a second check-in on the
        // same calendar day fails the strict one-day step and stops the
        // walk even though older consecutive days exist.
        let mut history = consecutive_days(3, 2);
        history.push(entry_on_day(2, 3)); // second check-in on the newest day

        assert_eq!(streak(&history), 1);
    }

    #[test]
    fn single_entry_has_streak_of_one() {
        let history = consecutive_days(1, 4);
        assert_eq!(streak(&history), 1);
    }

    #[test]
    fn achievements_unlock_in_fixed_order() {
        let history = consecutive_days(1, 2);
        let unlocked = achievements(&history);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "first_check");

        let history = consecutive_days(7, 2);
        let unlocked = achievements(&history);
        assert_eq!(unlocked.len(), 2);
        assert_eq!(unlocked[1].id, "week_streak");
    }

    #[test]
    fn week_of_excellent_days_unlocks_everything() {
        let history = consecutive_days(7, 1);
        let unlocked = achievements(&history);

        let ids: Vec<_> = unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, ["first_check", "week_streak", "fresh_air_lover"]);
    }

    #[test]
    fn excellent_days_unlock_fresh_air_without_a_streak() {
        // 5 excellent check-ins spread out with gaps: no week streak.
        let history: Vec<_> = (0..5).map(|i| entry_on_day(i * 3, 1)).collect();
        let unlocked = achievements(&history);

        let ids: Vec<_> = unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, ["first_check", "fresh_air_lover"]);
    }

    #[test]
    fn poor_air_selects_the_indoor_challenge() {
        assert_eq!(
            daily_challenge(AqiCategory::new(4).unwrap()).id,
            "indoor_master"
        );
        assert_eq!(
            daily_challenge(AqiCategory::new(5).unwrap()).id,
            "indoor_master"
        );
        assert_eq!(
            daily_challenge(AqiCategory::new(3).unwrap()).id,
            "daily_monitor"
        );
    }

    #[test]
    fn progress_accumulates_in_chronological_order() {
        let history = vec![entry_on_day(1, 2), entry_on_day(0, 1), entry_on_day(2, 1)];
        let timeline = progress(&history);

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[0].points, 15); // excellent day first
        assert_eq!(timeline[1].points, 20);
        assert_eq!(timeline[2].points, 35);
        assert_eq!(timeline[0].date, "2024-06-01");
    }

    #[test]
    fn full_week_scenario_matches_expected_state() {
        let history = consecutive_days(7, 1);
        let state = GamificationState::from_history(&history);

        assert_eq!(state.points, 155);
        assert_eq!(state.level, 3);
        assert_eq!(state.streak, 7);
        assert_eq!(state.achievements.len(), 3);
    }
}
