//! Day-entry lifecycle: one active session, an append-only history.
//!
//! Starting a session creates the in-progress entry and seeds its XP with
//! the start award. Completing it is the only place historical entries are
//! created; the entry is stamped, appended to the history, and the active
//! slot is cleared in the same operation. History entries are never edited
//! afterwards.

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use uuid::Uuid;

use super::{DayEntry, DayOutcome};
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::progress::ProgressEngine;
use crate::storage::Store;
use crate::xp;

/// Combined result of completing a day: the terminal entry plus the
/// progression changes it caused. Level-up is detected here by comparing
/// the level before and after the XP award.
#[derive(Debug, Clone)]
pub struct DayCompletion {
    pub entry: DayEntry,
    /// Total XP on the entry (start award + completion award).
    pub xp_earned: u32,
    pub new_total_xp: u32,
    pub leveled_up: bool,
    pub new_level: u32,
    pub new_streak: u32,
}

/// Start/complete day sessions and query the history.
pub struct EntryLifecycle<'a> {
    store: &'a dyn Store,
    clock: &'a dyn Clock,
}

impl<'a> EntryLifecycle<'a> {
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Start today's session.
    ///
    /// Fails with [`CoreError::AlreadyHasEntryForToday`] when today already
    /// has a completed entry or an active session; nothing is mutated in
    /// that case. A stale session from a previous day must be reconciled
    /// before this is called (see
    /// [`StaleSessionReconciler::start_day`](super::StaleSessionReconciler::start_day)).
    pub fn start_session(&self) -> Result<DayEntry> {
        let today = self.clock.today();
        if self.has_entry_for_today()? {
            return Err(CoreError::AlreadyHasEntryForToday { date: today });
        }

        let entry = DayEntry {
            id: Uuid::new_v4().to_string(),
            date: today,
            started_at: self.clock.now(),
            completed_at: None,
            saved: None,
            spent_amount: None,
            spent_category: None,
            spent_description: None,
            xp_earned: xp::START_SESSION_XP,
        };
        self.store.save_active_session(&entry)?;
        info!("session started for {today}");
        Ok(entry)
    }

    /// Complete the active session into its terminal state.
    ///
    /// Stamps the completion time and outcome, adds `completion_xp` to the
    /// entry's XP, appends it to the history, and clears the active slot.
    /// Fails with [`CoreError::NoActiveSession`] when no session is active.
    pub fn complete_session(
        &self,
        entry: &DayEntry,
        outcome: &DayOutcome,
        completion_xp: u32,
    ) -> Result<DayEntry> {
        if self.store.load_active_session()?.is_none() {
            return Err(CoreError::NoActiveSession);
        }

        let mut completed = entry.clone();
        completed.completed_at = Some(self.clock.now());
        completed.xp_earned = entry.xp_earned + completion_xp;
        match outcome {
            DayOutcome::Saved => {
                completed.saved = Some(true);
            }
            DayOutcome::Spent(details) => {
                completed.saved = Some(false);
                if let Some(details) = details {
                    completed.spent_amount = Some(details.amount);
                    completed.spent_category = Some(details.category);
                    completed.spent_description = details.description.clone();
                }
            }
        }

        let mut entries = self.store.load_entries()?;
        entries.push(completed.clone());
        self.store.save_entries(&entries)?;
        self.store.clear_active_session()?;

        debug!(
            "session for {} completed (saved={})",
            completed.date,
            outcome.saved()
        );
        Ok(completed)
    }

    /// Complete the active session and apply the progression updates.
    ///
    /// The completion XP is derived from the outcome. The day's full XP --
    /// the start award seeded on the entry plus the completion award --
    /// lands on the progress total here; the streak, day counters, and
    /// level-up flag come back in the [`DayCompletion`].
    pub fn complete_day(
        &self,
        progress: &ProgressEngine<'_>,
        entry: &DayEntry,
        outcome: &DayOutcome,
    ) -> Result<DayCompletion> {
        let previous_level = progress.current()?.level();
        let completion_xp = xp::completion_xp(outcome.saved());

        let completed = self.complete_session(entry, outcome, completion_xp)?;
        let updated = progress.add_xp(completed.xp_earned, completed.date, outcome.saved())?;

        let new_level = updated.level();
        Ok(DayCompletion {
            xp_earned: completed.xp_earned,
            entry: completed,
            new_total_xp: updated.total_xp,
            leveled_up: new_level > previous_level,
            new_level,
            new_streak: updated.current_streak,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The in-progress session, if any.
    pub fn active_session(&self) -> Result<Option<DayEntry>> {
        Ok(self.store.load_active_session()?)
    }

    /// True when today has a completed entry or an active session.
    pub fn has_entry_for_today(&self) -> Result<bool> {
        let today = self.clock.today();
        if self.store.load_entries()?.iter().any(|e| e.date == today) {
            return Ok(true);
        }
        Ok(self
            .store
            .load_active_session()?
            .is_some_and(|s| s.date == today))
    }

    /// Full completed history.
    pub fn entries(&self) -> Result<Vec<DayEntry>> {
        Ok(self.store.load_entries()?)
    }

    /// Entries within the given calendar month.
    pub fn entries_for_month(&self, year: i32, month: u32) -> Result<Vec<DayEntry>> {
        let mut entries = self.store.load_entries()?;
        entries.retain(|e| e.date.year() == year && e.date.month() == month);
        Ok(entries)
    }

    /// Entries within `start..=end`, inclusive on both ends.
    pub fn entries_for_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayEntry>> {
        let mut entries = self.store.load_entries()?;
        entries.retain(|e| e.date >= start && e.date <= end);
        Ok(entries)
    }

    /// The completed entry for a date, if any.
    pub fn entry_for_date(&self, date: NaiveDate) -> Result<Option<DayEntry>> {
        Ok(self
            .store
            .load_entries()?
            .into_iter()
            .find(|e| e.date == date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::FixedClock;
    use crate::session::{SpendDetails, SpendingCategory};
    use crate::storage::Database;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn starting_a_session_seeds_the_start_award() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);

        let entry = lifecycle.start_session().unwrap();
        assert_eq!(entry.date, date("2024-01-01"));
        assert_eq!(entry.xp_earned, 5);
        assert!(entry.is_in_progress());
        assert_eq!(db.load_active_session().unwrap(), Some(entry));
    }

    #[test]
    fn starting_twice_on_one_day_fails_without_mutating() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);

        let first = lifecycle.start_session().unwrap();
        let err = lifecycle.start_session().unwrap_err();
        assert!(matches!(err, CoreError::AlreadyHasEntryForToday { .. }));
        assert_eq!(db.load_active_session().unwrap(), Some(first));
    }

    #[test]
    fn starting_after_completing_today_fails() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);

        let entry = lifecycle.start_session().unwrap();
        lifecycle
            .complete_session(&entry, &DayOutcome::Saved, 50)
            .unwrap();

        let err = lifecycle.start_session().unwrap_err();
        assert!(matches!(err, CoreError::AlreadyHasEntryForToday { .. }));
    }

    #[test]
    fn completing_appends_history_and_clears_the_slot() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);

        let entry = lifecycle.start_session().unwrap();
        let completed = lifecycle
            .complete_session(&entry, &DayOutcome::Saved, 50)
            .unwrap();

        assert!(completed.is_completed());
        assert_eq!(completed.saved, Some(true));
        assert_eq!(completed.xp_earned, 55);
        assert_eq!(db.load_entries().unwrap(), vec![completed]);
        assert!(db.load_active_session().unwrap().is_none());
    }

    #[test]
    fn completing_without_a_session_fails() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);

        let entry = DayEntry {
            id: "ghost".into(),
            date: date("2024-01-01"),
            started_at: clock.now(),
            completed_at: None,
            saved: None,
            spent_amount: None,
            spent_category: None,
            spent_description: None,
            xp_earned: 5,
        };
        let err = lifecycle
            .complete_session(&entry, &DayOutcome::Saved, 50)
            .unwrap_err();
        assert!(matches!(err, CoreError::NoActiveSession));
    }

    #[test]
    fn spend_details_land_on_the_entry() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);

        let entry = lifecycle.start_session().unwrap();
        let outcome = DayOutcome::Spent(Some(SpendDetails {
            amount: 500.0,
            category: SpendingCategory::Food,
            description: Some("pizza night".into()),
        }));
        let completed = lifecycle.complete_session(&entry, &outcome, 10).unwrap();

        assert_eq!(completed.saved, Some(false));
        assert_eq!(completed.spent_amount, Some(500.0));
        assert_eq!(completed.spent_category, Some(SpendingCategory::Food));
        assert_eq!(completed.spent_description.as_deref(), Some("pizza night"));
        assert_eq!(completed.xp_earned, 15);
    }

    #[test]
    fn complete_day_reports_progression_changes() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);
        let progress = ProgressEngine::new(&db);

        let entry = lifecycle.start_session().unwrap();
        let completion = lifecycle
            .complete_day(&progress, &entry, &DayOutcome::Saved)
            .unwrap();

        assert_eq!(completion.xp_earned, 55);
        assert_eq!(completion.new_total_xp, 55);
        assert_eq!(completion.new_streak, 1);
        assert!(!completion.leveled_up);
        assert_eq!(completion.new_level, 1);
    }

    #[test]
    fn complete_day_detects_a_level_up() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);
        let progress = ProgressEngine::new(&db);

        // 160 XP banked: the 55-XP saved day crosses the 200-XP line.
        progress.grant_xp(160).unwrap();
        let entry = lifecycle.start_session().unwrap();
        let completion = lifecycle
            .complete_day(&progress, &entry, &DayOutcome::Saved)
            .unwrap();

        assert!(completion.leveled_up);
        assert_eq!(completion.new_level, 2);
        assert_eq!(completion.new_total_xp, 215);
    }

    #[test]
    fn three_day_progression_scenario() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);
        let progress = ProgressEngine::new(&db);

        // Day 1: saved.
        let entry = lifecycle.start_session().unwrap();
        let day1 = lifecycle
            .complete_day(&progress, &entry, &DayOutcome::Saved)
            .unwrap();
        assert_eq!(day1.new_streak, 1);
        assert_eq!(day1.entry.xp_earned, 55);

        // Day 2: saved.
        clock.advance(chrono::Duration::days(1));
        let entry = lifecycle.start_session().unwrap();
        let day2 = lifecycle
            .complete_day(&progress, &entry, &DayOutcome::Saved)
            .unwrap();
        assert_eq!(day2.new_streak, 2);

        // Day 3: spent ₹500 on food.
        clock.advance(chrono::Duration::days(1));
        let entry = lifecycle.start_session().unwrap();
        let outcome = DayOutcome::Spent(Some(SpendDetails {
            amount: 500.0,
            category: SpendingCategory::Food,
            description: None,
        }));
        let day3 = lifecycle.complete_day(&progress, &entry, &outcome).unwrap();
        assert_eq!(day3.new_streak, 0);
        assert_eq!(day3.entry.xp_earned, 15);

        let p = progress.current().unwrap();
        assert_eq!(p.longest_streak, 2);
        assert_eq!(p.total_saved_days, 2);
        assert_eq!(p.total_spent_days, 1);
        // 55 + 55 + 15: each day's start and completion awards.
        assert_eq!(p.total_xp, 125);
    }

    #[test]
    fn month_and_range_queries_are_inclusive() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);
        let progress = ProgressEngine::new(&db);

        for day in ["2024-01-01", "2024-01-15", "2024-01-31", "2024-02-01"] {
            clock.set(
                date(day)
                    .and_hms_opt(9, 0, 0)
                    .unwrap()
                    .and_utc(),
            );
            let entry = lifecycle.start_session().unwrap();
            lifecycle
                .complete_day(&progress, &entry, &DayOutcome::Saved)
                .unwrap();
        }

        let january = lifecycle.entries_for_month(2024, 1).unwrap();
        assert_eq!(january.len(), 3);

        let range = lifecycle
            .entries_for_range(date("2024-01-15"), date("2024-02-01"))
            .unwrap();
        assert_eq!(range.len(), 3);
        assert!(range.iter().any(|e| e.date == date("2024-01-15")));
        assert!(range.iter().any(|e| e.date == date("2024-02-01")));

        assert_eq!(
            lifecycle
                .entry_for_date(date("2024-01-15"))
                .unwrap()
                .unwrap()
                .date,
            date("2024-01-15")
        );
        assert!(lifecycle.entry_for_date(date("2024-03-01")).unwrap().is_none());
    }

    #[test]
    fn has_entry_for_today_sees_both_views() {
        let db = Database::open_memory().unwrap();
        let clock = FixedClock::on_date("2024-01-01");
        let lifecycle = EntryLifecycle::new(&db, &clock);

        assert!(!lifecycle.has_entry_for_today().unwrap());

        let entry = lifecycle.start_session().unwrap();
        assert!(lifecycle.has_entry_for_today().unwrap());

        lifecycle
            .complete_session(&entry, &DayOutcome::Saved, 50)
            .unwrap();
        assert!(lifecycle.has_entry_for_today().unwrap());

        // Yesterday's history doesn't cover today.
        clock.advance(chrono::Duration::days(1));
        assert!(!lifecycle.has_entry_for_today().unwrap());
    }
}
