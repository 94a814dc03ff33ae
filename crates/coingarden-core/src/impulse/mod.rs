//! Impulse-purchase checks.
//!
//! A check walks the user through a breathing pause and a short
//! questionnaire, scores the impulse, and logs how it ended. Entries are
//! append-only; [`ImpulseStats`] is the rolling aggregate folded forward on
//! each new entry.

mod flow;
mod score;

pub use flow::{
    CompletedImpulseCheck, ImpulseCheckFlow, ImpulseCheckService, ImpulseRecordOutcome,
    ImpulseStep, BREATHING_SECS,
};
pub use score::{calculate_score, feedback_message, motivational_message, verdict_for_score};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SpendingCategory;

/// Three-way reading of an impulse score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpulseVerdict {
    GoAhead,
    MaybeWait,
    StrongNo,
}

impl ImpulseVerdict {
    pub fn display_message(&self) -> &'static str {
        match self {
            ImpulseVerdict::GoAhead => "Valid purchase, go ahead!",
            ImpulseVerdict::MaybeWait => "Consider waiting a few days",
            ImpulseVerdict::StrongNo => "Strong impulse! You don't need this",
        }
    }
}

/// How a check ended.
///
/// `Abandoned` is reserved for a check discarded midway; no current flow
/// path produces it, and stats ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpulseResult {
    Resisted,
    Bought,
    Abandoned,
}

/// One finished impulse check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpulseEntry {
    pub id: String,
    /// What the user considered buying; no longer collected by the flow.
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub category: Option<SpendingCategory>,
    pub timestamp: DateTime<Utc>,
    pub is_essential: bool,
    pub owns_similar: bool,
    /// Vestigial question, always false; kept in the scoring signature.
    pub current_broken: bool,
    pub can_wait: bool,
    pub impulse_score: u8,
    pub verdict: ImpulseVerdict,
    pub result: ImpulseResult,
    #[serde(default)]
    pub xp_earned: u32,
}

/// Rolling aggregate over the impulse log.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpulseStats {
    pub total_impulses_resisted: u32,
    pub total_impulses_bought: u32,
    pub total_money_saved_by_resisting: f64,
}

impl ImpulseStats {
    pub fn total_checks(&self) -> u32 {
        self.total_impulses_resisted + self.total_impulses_bought
    }

    pub fn success_rate(&self) -> f32 {
        let total = self.total_checks();
        if total > 0 {
            self.total_impulses_resisted as f32 / total as f32
        } else {
            0.0
        }
    }

    /// Fold one new entry into the aggregate. Abandoned checks change
    /// nothing.
    pub fn record(&self, entry: &ImpulseEntry) -> ImpulseStats {
        match entry.result {
            ImpulseResult::Resisted => ImpulseStats {
                total_impulses_resisted: self.total_impulses_resisted + 1,
                total_money_saved_by_resisting: self.total_money_saved_by_resisting + entry.amount,
                ..*self
            },
            ImpulseResult::Bought => ImpulseStats {
                total_impulses_bought: self.total_impulses_bought + 1,
                ..*self
            },
            ImpulseResult::Abandoned => *self,
        }
    }
}
