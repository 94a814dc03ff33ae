//! Plant growth as a pure function of session age.
//!
//! An in-progress session's plant advances SEED → SPROUT → YOUNG → FULL on
//! a fixed wall-clock timetable. Completed entries ignore elapsed time: a
//! saved day is always a full tree, a spent day is always withered. The
//! stage is recomputed from the session's absolute start timestamp on every
//! read, so polling is side-effect free and survives process suspension.

use serde::{Deserialize, Serialize};

use crate::session::DayEntry;
use chrono::{DateTime, Utc};

/// Seconds at which the next stage begins.
const SPROUT_AT: u64 = 5;
const YOUNG_AT: u64 = 15;
const FULL_AT: u64 = 30;

/// Growth stage of a day's plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Seed,
    Sprout,
    Young,
    Full,
    /// Terminal stage for a spent day; never produced by elapsed time.
    Withered,
}

impl GrowthStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            GrowthStage::Seed => "Seed",
            GrowthStage::Sprout => "Sprout",
            GrowthStage::Young => "Young Plant",
            GrowthStage::Full => "Full Tree",
            GrowthStage::Withered => "Withered",
        }
    }
}

/// Stage for an in-progress session of the given age.
pub fn stage_for_elapsed(elapsed_secs: u64) -> GrowthStage {
    if elapsed_secs < SPROUT_AT {
        GrowthStage::Seed
    } else if elapsed_secs < YOUNG_AT {
        GrowthStage::Sprout
    } else if elapsed_secs < FULL_AT {
        GrowthStage::Young
    } else {
        GrowthStage::Full
    }
}

/// 0.0..=1.0 progress within the current stage; exactly 1.0 once full.
pub fn progress_for_elapsed(elapsed_secs: u64) -> f32 {
    if elapsed_secs < SPROUT_AT {
        elapsed_secs as f32 / SPROUT_AT as f32
    } else if elapsed_secs < YOUNG_AT {
        (elapsed_secs - SPROUT_AT) as f32 / (YOUNG_AT - SPROUT_AT) as f32
    } else if elapsed_secs < FULL_AT {
        (elapsed_secs - YOUNG_AT) as f32 / (FULL_AT - YOUNG_AT) as f32
    } else {
        1.0
    }
}

/// Seconds until the next stage boundary; 0 once full.
pub fn seconds_to_next_stage(elapsed_secs: u64) -> u64 {
    if elapsed_secs < SPROUT_AT {
        SPROUT_AT - elapsed_secs
    } else if elapsed_secs < YOUNG_AT {
        YOUNG_AT - elapsed_secs
    } else if elapsed_secs < FULL_AT {
        FULL_AT - elapsed_secs
    } else {
        0
    }
}

/// Stage for an entry: completed entries map to their terminal stage,
/// in-progress sessions grow with wall-clock age.
pub fn stage_for_entry(entry: &DayEntry, now: DateTime<Utc>) -> GrowthStage {
    if entry.is_completed() {
        if entry.saved == Some(true) {
            GrowthStage::Full
        } else {
            GrowthStage::Withered
        }
    } else {
        let elapsed = (now - entry.started_at).num_seconds().max(0) as u64;
        stage_for_elapsed(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    #[test]
    fn stage_boundaries() {
        assert_eq!(stage_for_elapsed(0), GrowthStage::Seed);
        assert_eq!(stage_for_elapsed(4), GrowthStage::Seed);
        assert_eq!(stage_for_elapsed(5), GrowthStage::Sprout);
        assert_eq!(stage_for_elapsed(14), GrowthStage::Sprout);
        assert_eq!(stage_for_elapsed(15), GrowthStage::Young);
        assert_eq!(stage_for_elapsed(29), GrowthStage::Young);
        assert_eq!(stage_for_elapsed(30), GrowthStage::Full);
        assert_eq!(stage_for_elapsed(3600), GrowthStage::Full);
    }

    #[test]
    fn progress_within_stages() {
        assert_eq!(progress_for_elapsed(0), 0.0);
        assert_eq!(progress_for_elapsed(4), 4.0 / 5.0);
        assert_eq!(progress_for_elapsed(5), 0.0);
        assert_eq!(progress_for_elapsed(10), 0.5);
        assert_eq!(progress_for_elapsed(15), 0.0);
        assert_eq!(progress_for_elapsed(30), 1.0);
        assert_eq!(progress_for_elapsed(1000), 1.0);
    }

    #[test]
    fn countdown_to_next_stage() {
        assert_eq!(seconds_to_next_stage(0), 5);
        assert_eq!(seconds_to_next_stage(4), 1);
        assert_eq!(seconds_to_next_stage(5), 10);
        assert_eq!(seconds_to_next_stage(29), 1);
        assert_eq!(seconds_to_next_stage(30), 0);
        assert_eq!(seconds_to_next_stage(999), 0);
    }

    fn entry(completed: bool, saved: Option<bool>, age_secs: i64, now: DateTime<Utc>) -> DayEntry {
        DayEntry {
            id: "g".into(),
            date: "2024-01-10".parse().unwrap(),
            started_at: now - Duration::seconds(age_secs),
            completed_at: completed.then_some(now),
            saved,
            spent_amount: None,
            spent_category: None,
            spent_description: None,
            xp_earned: 0,
        }
    }

    #[test]
    fn completed_entries_ignore_elapsed_time() {
        let now = Utc::now();
        assert_eq!(
            stage_for_entry(&entry(true, Some(true), 2, now), now),
            GrowthStage::Full
        );
        assert_eq!(
            stage_for_entry(&entry(true, Some(false), 3600, now), now),
            GrowthStage::Withered
        );
    }

    #[test]
    fn in_progress_entries_grow_with_age() {
        let now = Utc::now();
        assert_eq!(stage_for_entry(&entry(false, None, 0, now), now), GrowthStage::Seed);
        assert_eq!(stage_for_entry(&entry(false, None, 16, now), now), GrowthStage::Young);
        assert_eq!(stage_for_entry(&entry(false, None, 45, now), now), GrowthStage::Full);
    }

    proptest! {
        #[test]
        fn progress_is_always_a_fraction(elapsed in 0u64..100_000) {
            let p = progress_for_elapsed(elapsed);
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn elapsed_never_produces_withered(elapsed in 0u64..100_000) {
            prop_assert_ne!(stage_for_elapsed(elapsed), GrowthStage::Withered);
        }
    }
}
