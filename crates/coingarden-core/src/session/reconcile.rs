//! Stale-session reconciliation.
//!
//! A session that silently spans midnight would let yesterday's plant keep
//! growing into today. On app resume, [`StaleSessionReconciler::reconcile`]
//! auto-completes any session opened on a prior day as a spent day before
//! any screen trusts the active-session state.

use log::info;

use super::lifecycle::EntryLifecycle;
use super::{DayEntry, DayOutcome};
use crate::clock::Clock;
use crate::error::Result;
use crate::progress::ProgressEngine;
use crate::storage::Store;
use crate::xp;

/// What reconciliation found.
#[derive(Debug, Clone)]
pub enum Reconciliation {
    /// No session is open.
    NoSession,
    /// Today's session is open and untouched.
    ActiveSession(DayEntry),
    /// A prior day's session was auto-completed as spent.
    AutoCompleted(DayEntry),
}

/// Detects and closes sessions left open past midnight.
pub struct StaleSessionReconciler<'a> {
    store: &'a dyn Store,
    clock: &'a dyn Clock,
}

impl<'a> StaleSessionReconciler<'a> {
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Reconcile the active session against today's date.
    ///
    /// A session dated before today is completed as spent with the spent-day
    /// award credited to both the entry and the progress total; the streak
    /// resets through the normal spent-day rule. Today's session is returned
    /// unchanged.
    pub fn reconcile(&self) -> Result<Reconciliation> {
        let Some(session) = self.store.load_active_session()? else {
            return Ok(Reconciliation::NoSession);
        };

        if session.date >= self.clock.today() {
            return Ok(Reconciliation::ActiveSession(session));
        }

        let lifecycle = EntryLifecycle::new(self.store, self.clock);
        let progress = ProgressEngine::new(self.store);

        let completed =
            lifecycle.complete_session(&session, &DayOutcome::Spent(None), xp::SPENT_DAY_XP)?;
        progress.add_xp(xp::SPENT_DAY_XP, completed.date, false)?;

        info!("stale session for {} auto-completed as spent", completed.date);
        Ok(Reconciliation::AutoCompleted(completed))
    }

    /// Reconcile, then start today's session.
    ///
    /// Starting a day depends on reconciliation having run first; this
    /// makes the ordering explicit instead of a call-order convention.
    pub fn start_day(&self) -> Result<DayEntry> {
        self.reconcile()?;
        EntryLifecycle::new(self.store, self.clock).start_session()
    }
}
