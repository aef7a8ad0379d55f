//! Points, levels and daily streaks.
//!
//! Streak transitions depend only on the calendar-day distance between the
//! last award and `now`:
//! - no history -> 1
//! - same day   -> unchanged
//! - next day   -> +1
//! - gap > 1    -> reset to 1
//!
//! Streaks are evaluated lazily on the next award; nothing expires in the
//! background.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GamificationState, POINTS_PER_LEVEL};

/// Streak view of a ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakState {
    NoHistory,
    Active(u32),
}

impl GamificationState {
    pub fn streak_state(&self) -> StreakState {
        match self.last_activity_date {
            None => StreakState::NoHistory,
            Some(_) => StreakState::Active(self.streak_days.max(1)),
        }
    }

    /// Points still needed for the next level
    pub fn points_to_next_level(&self) -> u64 {
        POINTS_PER_LEVEL - self.total_points % POINTS_PER_LEVEL
    }
}

/// `floor(total_points / 100) + 1`, saturating at `u32::MAX`
pub fn level_for_points(total_points: u64) -> u32 {
    let level = total_points / POINTS_PER_LEVEL + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Calendar days between two dates; `None` when there is no previous date
pub fn days_since(last: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    last.map(|date| (today - date).num_days())
}

fn next_streak(state: &GamificationState, today: NaiveDate) -> u32 {
    match days_since(state.last_activity_date, today) {
        None => 1,
        // Clock skew (now earlier than the last award) is treated as same-day
        Some(days) if days <= 0 => state.streak_days.max(1),
        Some(1) => state.streak_days.saturating_add(1),
        Some(_) => 1,
    }
}

/// Apply one award. The input is untouched; the returned state is the whole
/// transition.
pub fn award_points(state: &GamificationState, points: u32, now: DateTime<Utc>) -> GamificationState {
    let today = now.date_naive();
    let total_points = state.total_points.saturating_add(u64::from(points));
    let level = level_for_points(total_points).max(state.level);
    let streak_days = next_streak(state, today);
    let last_activity_date = match state.last_activity_date {
        Some(last) if last > today => Some(last),
        _ => Some(today),
    };

    let next = GamificationState {
        total_points,
        level,
        streak_days,
        last_activity_date,
    };

    if next.level > state.level {
        tracing::info!(
            from = state.level,
            to = next.level,
            total_points = next.total_points,
            "level up"
        );
    }
    tracing::debug!(
        points,
        streak_days = next.streak_days,
        total_points = next.total_points,
        "points awarded"
    );

    next
}

/// Levels crossed by a transition
pub fn levels_gained(before: &GamificationState, after: &GamificationState) -> u32 {
    after.level.saturating_sub(before.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_first_award_starts_streak() {
        let state = award_points(&GamificationState::default(), 10, at(2024, 3, 1, 9));
        assert_eq!(state.streak_days, 1);
        assert_eq!(state.total_points, 10);
        assert_eq!(state.level, 1);
        assert_eq!(state.last_activity_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_same_day_award_keeps_streak() {
        let first = award_points(&GamificationState::default(), 10, at(2024, 3, 1, 9));
        let second = award_points(&first, 10, at(2024, 3, 1, 23));
        assert_eq!(second.streak_days, 1);
        assert_eq!(second.total_points, 20);
    }

    #[test]
    fn test_consecutive_day_increments() {
        let first = award_points(&GamificationState::default(), 10, at(2024, 3, 1, 23));
        let second = award_points(&first, 10, at(2024, 3, 2, 0));
        let third = award_points(&second, 10, at(2024, 3, 3, 12));
        assert_eq!(second.streak_days, 2);
        assert_eq!(third.streak_days, 3);
    }

    #[test]
    fn test_gap_resets_streak() {
        let mut state = GamificationState::default();
        for day in 1..=4 {
            state = award_points(&state, 5, at(2024, 3, day, 10));
        }
        assert_eq!(state.streak_days, 4);
        let after_gap = award_points(&state, 5, at(2024, 3, 6, 10));
        assert_eq!(after_gap.streak_days, 1);
    }

    #[test]
    fn test_month_boundary_is_consecutive() {
        let first = award_points(&GamificationState::default(), 1, at(2024, 2, 29, 8));
        let second = award_points(&first, 1, at(2024, 3, 1, 8));
        assert_eq!(second.streak_days, 2);
    }

    #[test]
    fn test_backwards_clock_keeps_streak_and_date() {
        let first = award_points(&GamificationState::default(), 1, at(2024, 3, 5, 8));
        let skewed = award_points(&first, 1, at(2024, 3, 4, 8));
        assert_eq!(skewed.streak_days, 1);
        assert_eq!(skewed.last_activity_date, first.last_activity_date);
    }

    #[test]
    fn test_level_crossings() {
        let start = GamificationState::default();
        let a = award_points(&start, 99, at(2024, 1, 1, 0));
        assert_eq!(a.level, 1);
        let b = award_points(&a, 1, at(2024, 1, 1, 1));
        assert_eq!(b.level, 2);
        assert_eq!(levels_gained(&a, &b), 1);
        let c = award_points(&b, 250, at(2024, 1, 1, 2));
        assert_eq!(c.total_points, 350);
        assert_eq!(c.level, 4);
        assert_eq!(levels_gained(&b, &c), 2);
    }

    #[test]
    fn test_level_never_decreases() {
        let inflated = GamificationState {
            total_points: 10,
            level: 7,
            streak_days: 3,
            last_activity_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        let next = award_points(&inflated, 0, at(2024, 1, 2, 0));
        assert_eq!(next.level, 7);
    }

    #[test]
    fn test_input_state_untouched() {
        let start = GamificationState::default();
        let _ = award_points(&start, 500, at(2024, 1, 1, 0));
        assert_eq!(start, GamificationState::default());
    }

    #[test]
    fn test_streak_state_and_helpers() {
        let start = GamificationState::default();
        assert_eq!(start.streak_state(), StreakState::NoHistory);
        let next = award_points(&start, 30, at(2024, 1, 1, 0));
        assert_eq!(next.streak_state(), StreakState::Active(1));
        assert_eq!(next.points_to_next_level(), 70);
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(u64::MAX), u32::MAX);
        assert_eq!(days_since(None, NaiveDate::MIN), None);
    }
}
