//! Monthly spending summary.
//!
//! A pure aggregation over one month's entries against the user's budget.
//! Callers fetch the month's entries through
//! [`EntryLifecycle::entries_for_month`](crate::session::EntryLifecycle::entries_for_month)
//! and hand them in together with the budget from [`crate::UserProgress`].

use std::collections::BTreeMap;

use crate::session::{DayEntry, SpendingCategory};

/// One month's spending picture.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySpending {
    pub total_spent: f64,
    pub budget: f64,
    pub remaining_budget: f64,
    pub over_budget: bool,
    /// Fraction of the budget used, clamped to 0.0..=1.5 for display.
    pub budget_used: f32,
    pub by_category: BTreeMap<SpendingCategory, f64>,
    pub saved_days: usize,
    pub spent_days: usize,
}

/// Summarize a month's entries against a budget.
pub fn monthly_spending(entries: &[DayEntry], budget: f64) -> MonthlySpending {
    let spent_entries = entries.iter().filter(|e| e.saved == Some(false));

    let total_spent: f64 = spent_entries
        .clone()
        .filter_map(|e| e.spent_amount)
        .sum();

    let mut by_category: BTreeMap<SpendingCategory, f64> = BTreeMap::new();
    for entry in spent_entries.clone() {
        if let (Some(category), Some(amount)) = (entry.spent_category, entry.spent_amount) {
            *by_category.entry(category).or_insert(0.0) += amount;
        }
    }

    let saved_days = entries.iter().filter(|e| e.saved == Some(true)).count();
    let spent_days = spent_entries.count();

    let budget_used = if budget > 0.0 {
        ((total_spent / budget) as f32).clamp(0.0, 1.5)
    } else {
        0.0
    };

    MonthlySpending {
        total_spent,
        budget,
        remaining_budget: budget - total_spent,
        over_budget: total_spent > budget,
        budget_used,
        by_category,
        saved_days,
        spent_days,
    }
}
