//! Day sessions: one save-or-spend record per calendar day.
//!
//! A [`DayEntry`] is created in progress when a session starts, completed
//! exactly once into a terminal saved or spent state, and immutable
//! afterwards. The calendar date is the natural key within the history.

mod lifecycle;
mod reconcile;

pub use lifecycle::{DayCompletion, EntryLifecycle};
pub use reconcile::{Reconciliation, StaleSessionReconciler};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where spent money went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingCategory {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Other,
}

impl SpendingCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            SpendingCategory::Food => "Food & Dining",
            SpendingCategory::Transport => "Transport",
            SpendingCategory::Shopping => "Shopping",
            SpendingCategory::Entertainment => "Entertainment",
            SpendingCategory::Bills => "Bills & Utilities",
            SpendingCategory::Health => "Health",
            SpendingCategory::Other => "Other",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SpendingCategory::Food => "🍔",
            SpendingCategory::Transport => "🚗",
            SpendingCategory::Shopping => "🛍️",
            SpendingCategory::Entertainment => "🎬",
            SpendingCategory::Bills => "📱",
            SpendingCategory::Health => "💊",
            SpendingCategory::Other => "📦",
        }
    }
}

/// One calendar day's save-or-spend record.
///
/// `completed_at == None` marks the in-progress session; at most one such
/// entry exists process-wide, held in the active-session slot rather than
/// the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub id: String,
    /// Calendar date, one entry per date.
    pub date: NaiveDate,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// None = in progress, Some(true) = saved, Some(false) = spent.
    #[serde(default)]
    pub saved: Option<bool>,
    #[serde(default)]
    pub spent_amount: Option<f64>,
    #[serde(default)]
    pub spent_category: Option<SpendingCategory>,
    #[serde(default)]
    pub spent_description: Option<String>,
    /// Accumulates the start award and the completion award.
    #[serde(default)]
    pub xp_earned: u32,
}

impl DayEntry {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_in_progress(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// Details captured when a day is completed as spent.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendDetails {
    pub amount: f64,
    pub category: SpendingCategory,
    pub description: Option<String>,
}

/// Terminal outcome of a day session.
///
/// Spend details are absent when a stale session is auto-completed without
/// user input.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Saved,
    Spent(Option<SpendDetails>),
}

impl DayOutcome {
    pub fn saved(&self) -> bool {
        matches!(self, DayOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_progress_is_derived_from_completed_at() {
        let entry = DayEntry {
            id: "e1".into(),
            date: "2024-01-15".parse().unwrap(),
            started_at: Utc::now(),
            completed_at: None,
            saved: None,
            spent_amount: None,
            spent_category: None,
            spent_description: None,
            xp_earned: 5,
        };
        assert!(entry.is_in_progress());
        assert!(!entry.is_completed());

        let done = DayEntry {
            completed_at: Some(Utc::now()),
            saved: Some(true),
            ..entry
        };
        assert!(done.is_completed());
    }

    #[test]
    fn category_display_data() {
        assert_eq!(SpendingCategory::Food.display_name(), "Food & Dining");
        assert_eq!(SpendingCategory::Bills.emoji(), "📱");
    }

    #[test]
    fn entry_round_trips_through_json() {
        let entry = DayEntry {
            id: "e2".into(),
            date: "2024-02-01".parse().unwrap(),
            started_at: Utc::now(),
            completed_at: Some(Utc::now()),
            saved: Some(false),
            spent_amount: Some(250.0),
            spent_category: Some(SpendingCategory::Transport),
            spent_description: Some("cab home".into()),
            xp_earned: 15,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: DayEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
