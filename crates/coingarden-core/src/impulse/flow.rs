//! Impulse-check flow state machine.
//!
//! The flow is wall-clock based with no internal threads: the breathing
//! countdown is recomputed from the absolute start timestamp on every
//! read, so a suspended process resumes with the correct remaining time.
//! Reaching zero does not advance the flow by itself; it only unlocks the
//! explicit continue command.
//!
//! ## State Transitions
//!
//! ```text
//! Breathing -> FirstCheck -> Questions -> Feedback -> FinalCheck -> Complete
//!                  |                                                   ^
//!                  +-------------- resisted early --------------------+
//! ```
//!
//! Transitions are forward-only. Commands that don't apply to the current
//! step return `false`/`None` and leave the flow unchanged.

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use super::score;
use super::{ImpulseEntry, ImpulseResult, ImpulseStats, ImpulseVerdict};
use crate::clock::Clock;
use crate::error::Result;
use crate::progress::{ProgressEngine, UserProgress};
use crate::storage::Store;
use crate::xp;

/// Length of the breathing countdown.
pub const BREATHING_SECS: u32 = 30;

/// Steps of the impulse check, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseStep {
    /// 30-second breathing countdown.
    Breathing,
    /// "Do you still want to buy?"
    FirstCheck,
    /// The three questions, shown only when still considering.
    Questions,
    /// Verdict-derived message, no score shown.
    Feedback,
    /// "I resisted" / "I still spent".
    FinalCheck,
    Complete,
}

/// Snapshot of a finished check, ready to be recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedImpulseCheck {
    pub is_essential: bool,
    pub owns_similar: bool,
    pub can_wait: bool,
    pub score: u8,
    pub verdict: ImpulseVerdict,
    pub result: ImpulseResult,
}

/// The impulse-check state machine.
#[derive(Debug, Clone)]
pub struct ImpulseCheckFlow {
    step: ImpulseStep,
    breathing_started_at: DateTime<Utc>,
    is_essential: Option<bool>,
    owns_similar: Option<bool>,
    can_wait: Option<bool>,
    score: u8,
    verdict: ImpulseVerdict,
    result: Option<ImpulseResult>,
}

impl ImpulseCheckFlow {
    /// Begin a check; the breathing countdown starts at `now`.
    pub fn begin(now: DateTime<Utc>) -> Self {
        Self {
            step: ImpulseStep::Breathing,
            breathing_started_at: now,
            is_essential: None,
            owns_similar: None,
            can_wait: None,
            score: 0,
            verdict: ImpulseVerdict::MaybeWait,
            result: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn step(&self) -> ImpulseStep {
        self.step
    }

    /// Seconds left on the breathing countdown at `now`.
    pub fn remaining_breathing_secs(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = (now - self.breathing_started_at).num_seconds().max(0) as u64;
        (BREATHING_SECS as u64).saturating_sub(elapsed) as u32
    }

    /// Whether the countdown has reached zero and continue is unlocked.
    pub fn breathing_complete(&self, now: DateTime<Utc>) -> bool {
        self.remaining_breathing_secs(now) == 0
    }

    pub fn all_questions_answered(&self) -> bool {
        self.is_essential.is_some() && self.owns_similar.is_some() && self.can_wait.is_some()
    }

    /// Score computed on question submission; 0 until then.
    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn verdict(&self) -> ImpulseVerdict {
        self.verdict
    }

    pub fn feedback_message(&self) -> &'static str {
        score::feedback_message(self.verdict)
    }

    pub fn result(&self) -> Option<ImpulseResult> {
        self.result
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Explicit continue out of the breathing step. Refused until the
    /// countdown reaches zero.
    pub fn continue_to_first_check(&mut self, now: DateTime<Utc>) -> bool {
        if self.step != ImpulseStep::Breathing || !self.breathing_complete(now) {
            return false;
        }
        self.step = ImpulseStep::FirstCheck;
        true
    }

    /// "I don't want it anymore" on the first check: finish immediately as
    /// resisted, skipping the questions.
    pub fn resist_early(&mut self) -> Option<CompletedImpulseCheck> {
        if self.step != ImpulseStep::FirstCheck {
            return None;
        }
        Some(self.finish(ImpulseResult::Resisted))
    }

    /// "Still considering" on the first check.
    pub fn still_considering(&mut self) -> bool {
        if self.step != ImpulseStep::FirstCheck {
            return false;
        }
        self.step = ImpulseStep::Questions;
        true
    }

    pub fn set_essential(&mut self, value: bool) {
        if self.step == ImpulseStep::Questions {
            self.is_essential = Some(value);
        }
    }

    pub fn set_owns_similar(&mut self, value: bool) {
        if self.step == ImpulseStep::Questions {
            self.owns_similar = Some(value);
        }
    }

    pub fn set_can_wait(&mut self, value: bool) {
        if self.step == ImpulseStep::Questions {
            self.can_wait = Some(value);
        }
    }

    /// Score the answers and advance to feedback. Refused until all three
    /// questions are answered.
    pub fn submit_answers(&mut self) -> bool {
        if self.step != ImpulseStep::Questions || !self.all_questions_answered() {
            return false;
        }
        self.score = score::calculate_score(
            self.is_essential.unwrap_or(false),
            self.owns_similar.unwrap_or(false),
            false,
            self.can_wait.unwrap_or(true),
        );
        self.verdict = score::verdict_for_score(self.score);
        self.step = ImpulseStep::Feedback;
        true
    }

    /// Leave the feedback step.
    pub fn acknowledge_feedback(&mut self) -> bool {
        if self.step != ImpulseStep::Feedback {
            return false;
        }
        self.step = ImpulseStep::FinalCheck;
        true
    }

    pub fn finish_resisted(&mut self) -> Option<CompletedImpulseCheck> {
        if self.step != ImpulseStep::FinalCheck {
            return None;
        }
        Some(self.finish(ImpulseResult::Resisted))
    }

    pub fn finish_spent(&mut self) -> Option<CompletedImpulseCheck> {
        if self.step != ImpulseStep::FinalCheck {
            return None;
        }
        Some(self.finish(ImpulseResult::Bought))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish(&mut self, result: ImpulseResult) -> CompletedImpulseCheck {
        self.step = ImpulseStep::Complete;
        self.result = Some(result);
        CompletedImpulseCheck {
            is_essential: self.is_essential.unwrap_or(false),
            owns_similar: self.owns_similar.unwrap_or(false),
            can_wait: self.can_wait.unwrap_or(true),
            score: self.score,
            verdict: self.verdict,
            result,
        }
    }
}

/// Outcome of recording a finished check.
#[derive(Debug, Clone)]
pub struct ImpulseRecordOutcome {
    pub entry: ImpulseEntry,
    pub stats: ImpulseStats,
    pub progress: UserProgress,
}

/// Persists finished checks: appends the entry, folds the stats forward,
/// and grants the XP award. This path never touches streaks.
pub struct ImpulseCheckService<'a> {
    store: &'a dyn Store,
    clock: &'a dyn Clock,
}

impl<'a> ImpulseCheckService<'a> {
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Record a completed check.
    pub fn record(&self, check: &CompletedImpulseCheck) -> Result<ImpulseRecordOutcome> {
        let resisted = check.result == ImpulseResult::Resisted;
        let xp_earned = xp::impulse_xp(resisted);

        let entry = ImpulseEntry {
            id: Uuid::new_v4().to_string(),
            item_name: String::new(),
            amount: 0.0,
            category: None,
            timestamp: self.clock.now(),
            is_essential: check.is_essential,
            owns_similar: check.owns_similar,
            current_broken: false,
            can_wait: check.can_wait,
            impulse_score: check.score,
            verdict: check.verdict,
            result: check.result,
            xp_earned,
        };

        let mut entries = self.store.load_impulse_entries()?;
        entries.push(entry.clone());
        self.store.save_impulse_entries(&entries)?;

        let stats = self.store.load_impulse_stats()?.record(&entry);
        self.store.save_impulse_stats(&stats)?;

        let progress = ProgressEngine::new(self.store).grant_xp(xp_earned)?;

        debug!(
            "impulse: recorded {:?} (score {}, +{xp_earned} xp)",
            check.result, check.score
        );
        Ok(ImpulseRecordOutcome {
            entry,
            stats,
            progress,
        })
    }

    /// Newest-first slice of the impulse log.
    pub fn recent_entries(&self, limit: usize) -> Result<Vec<ImpulseEntry>> {
        let mut entries = self.store.load_impulse_entries()?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    pub fn stats(&self) -> Result<ImpulseStats> {
        Ok(self.store.load_impulse_stats()?)
    }
}
