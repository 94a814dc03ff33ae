//! User progression: XP totals, streaks, and day counters.
//!
//! [`UserProgress`] is the singleton aggregate, one per installation. It is
//! never mutated in place by callers; [`ProgressEngine`] reads the stored
//! state, computes the successor, and writes it back in one operation.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Store;
use crate::xp;

/// Default monthly budget for a fresh installation.
const DEFAULT_MONTHLY_BUDGET: f64 = 10_000.0;

/// Singleton progression aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_xp: u32,
    pub current_streak: u32,
    /// Highest `current_streak` ever observed; never decreases.
    pub longest_streak: u32,
    pub total_saved_days: u32,
    pub total_spent_days: u32,
    pub monthly_budget: f64,
    /// Date of the most recent streak-relevant completion.
    #[serde(default)]
    pub last_entry_date: Option<NaiveDate>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            total_xp: 0,
            current_streak: 0,
            longest_streak: 0,
            total_saved_days: 0,
            total_spent_days: 0,
            monthly_budget: DEFAULT_MONTHLY_BUDGET,
            last_entry_date: None,
        }
    }
}

impl UserProgress {
    /// Current level, derived from the XP total.
    pub fn level(&self) -> u32 {
        xp::level(self.total_xp)
    }

    pub fn xp_in_current_level(&self) -> u32 {
        xp::xp_in_current_level(self.total_xp)
    }

    pub fn xp_to_next_level(&self) -> u32 {
        xp::xp_to_next_level(self.total_xp)
    }

    pub fn total_days(&self) -> u32 {
        self.total_saved_days + self.total_spent_days
    }
}

/// Streak transition for one completion.
///
/// Spending resets the streak to zero and leaves the longest streak alone.
/// A save extends the streak only when it lands exactly one day after the
/// previous completion; a same-day completion is a defensive no-op, and any
/// other gap starts a new one-day streak.
fn next_streak(current: &UserProgress, date: NaiveDate, saved: bool) -> (u32, u32) {
    if !saved {
        return (0, current.longest_streak);
    }

    let Some(last) = current.last_entry_date else {
        // First entry ever.
        return (1, 1);
    };

    let gap = (date - last).num_days();
    if gap == 1 {
        let streak = current.current_streak + 1;
        (streak, current.longest_streak.max(streak))
    } else if gap == 0 {
        (current.current_streak, current.longest_streak)
    } else {
        (1, current.longest_streak)
    }
}

/// Read-compute-write operations over [`UserProgress`].
pub struct ProgressEngine<'a> {
    store: &'a dyn Store,
}

impl<'a> ProgressEngine<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Current stored progress.
    pub fn current(&self) -> Result<UserProgress> {
        Ok(self.store.load_progress()?)
    }

    /// Apply a day completion: add XP, advance the streak, bump the
    /// saved/spent counter, and record the completion date.
    pub fn add_xp(&self, xp: u32, date: NaiveDate, saved: bool) -> Result<UserProgress> {
        let current = self.store.load_progress()?;
        let (current_streak, longest) = next_streak(&current, date, saved);

        let updated = UserProgress {
            total_xp: current.total_xp + xp,
            current_streak,
            longest_streak: current.longest_streak.max(longest),
            total_saved_days: current.total_saved_days + u32::from(saved),
            total_spent_days: current.total_spent_days + u32::from(!saved),
            monthly_budget: current.monthly_budget,
            last_entry_date: Some(date),
        };

        self.store.save_progress(&updated)?;
        debug!(
            "progress: +{xp} xp on {date} (saved={saved}), streak {} -> {}",
            current.current_streak, updated.current_streak
        );
        Ok(updated)
    }

    /// Add XP without touching streaks, day counters, or the last entry
    /// date. Used by the impulse-check path.
    pub fn grant_xp(&self, xp: u32) -> Result<UserProgress> {
        let mut progress = self.store.load_progress()?;
        progress.total_xp += xp;
        self.store.save_progress(&progress)?;
        debug!("progress: +{xp} xp (flat), total {}", progress.total_xp);
        Ok(progress)
    }

    /// Overwrite the monthly budget. Validation is the caller's concern.
    pub fn update_budget(&self, budget: f64) -> Result<UserProgress> {
        let mut progress = self.store.load_progress()?;
        progress.monthly_budget = budget;
        self.store.save_progress(&progress)?;
        Ok(progress)
    }
}
