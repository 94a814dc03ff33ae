//! Achievement catalog and unlocking.
//!
//! The catalog is a fixed table of 16 achievements. The persisted
//! collection holds only unlocked records; [`AchievementEngine::all_with_status`]
//! merges it with the catalog for display. Unlocking is idempotent: a
//! second scan against unchanged progress unlocks nothing.

use chrono::{DateTime, Datelike, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::Result;
use crate::progress::UserProgress;
use crate::storage::Store;

/// An achievement, unlocked or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub emoji: String,
    /// None = locked.
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// The fixed set of achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstSave,
    WeekWarrior,
    MonthMaster,
    CenturySaver,
    Level5,
    Level10,
    Level25,
    Level50,
    Saved10,
    Saved50,
    Saved100,
    FirstTree,
    FullGarden,
    Xp1000,
    Xp5000,
    Xp10000,
}

/// Catalog row: constant display data for one achievement.
pub struct AchievementDef {
    pub kind: AchievementKind,
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
}

impl AchievementDef {
    fn to_achievement(&self, unlocked_at: Option<DateTime<Utc>>) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            emoji: self.emoji.to_string(),
            unlocked_at,
        }
    }
}

/// Full catalog, in unlock-scan order.
pub const CATALOG: [AchievementDef; 16] = [
    AchievementDef {
        kind: AchievementKind::FirstSave,
        id: "first_save",
        title: "First Save",
        description: "Complete your first save day",
        emoji: "🌱",
    },
    AchievementDef {
        kind: AchievementKind::WeekWarrior,
        id: "week_warrior",
        title: "Week Warrior",
        description: "Achieve a 7-day streak",
        emoji: "🔥",
    },
    AchievementDef {
        kind: AchievementKind::MonthMaster,
        id: "month_master",
        title: "Month Master",
        description: "Achieve a 30-day streak",
        emoji: "⭐",
    },
    AchievementDef {
        kind: AchievementKind::CenturySaver,
        id: "century_saver",
        title: "Century Saver",
        description: "Achieve a 100-day streak",
        emoji: "💯",
    },
    AchievementDef {
        kind: AchievementKind::Level5,
        id: "level_5",
        title: "Rising Star",
        description: "Reach Level 5",
        emoji: "⬆️",
    },
    AchievementDef {
        kind: AchievementKind::Level10,
        id: "level_10",
        title: "Double Digits",
        description: "Reach Level 10",
        emoji: "🔟",
    },
    AchievementDef {
        kind: AchievementKind::Level25,
        id: "level_25",
        title: "Quarter Century",
        description: "Reach Level 25",
        emoji: "🏅",
    },
    AchievementDef {
        kind: AchievementKind::Level50,
        id: "level_50",
        title: "Half Century",
        description: "Reach Level 50",
        emoji: "🏆",
    },
    AchievementDef {
        kind: AchievementKind::Saved10,
        id: "saved_10",
        title: "Getting Started",
        description: "Save for 10 days total",
        emoji: "🌿",
    },
    AchievementDef {
        kind: AchievementKind::Saved50,
        id: "saved_50",
        title: "Dedicated Saver",
        description: "Save for 50 days total",
        emoji: "🌳",
    },
    AchievementDef {
        kind: AchievementKind::Saved100,
        id: "saved_100",
        title: "Savings Champion",
        description: "Save for 100 days total",
        emoji: "🏰",
    },
    AchievementDef {
        kind: AchievementKind::FirstTree,
        id: "first_tree",
        title: "First Tree",
        description: "Plant your first tree",
        emoji: "🌲",
    },
    AchievementDef {
        kind: AchievementKind::FullGarden,
        id: "full_garden",
        title: "Full Garden",
        description: "Have 16+ trees in a month",
        emoji: "🏡",
    },
    AchievementDef {
        kind: AchievementKind::Xp1000,
        id: "xp_1000",
        title: "XP Hunter",
        description: "Earn 1,000 XP total",
        emoji: "✨",
    },
    AchievementDef {
        kind: AchievementKind::Xp5000,
        id: "xp_5000",
        title: "XP Master",
        description: "Earn 5,000 XP total",
        emoji: "💫",
    },
    AchievementDef {
        kind: AchievementKind::Xp10000,
        id: "xp_10000",
        title: "XP Legend",
        description: "Earn 10,000 XP total",
        emoji: "🌟",
    },
];

/// Whether an achievement's threshold is met.
///
/// `entries_this_month` is the entry count for the current calendar month;
/// only the garden achievement consults it.
pub fn qualifies(kind: AchievementKind, progress: &UserProgress, entries_this_month: usize) -> bool {
    match kind {
        AchievementKind::FirstSave => progress.total_saved_days >= 1,
        AchievementKind::WeekWarrior => progress.longest_streak >= 7,
        AchievementKind::MonthMaster => progress.longest_streak >= 30,
        AchievementKind::CenturySaver => progress.longest_streak >= 100,
        AchievementKind::Level5 => progress.level() >= 5,
        AchievementKind::Level10 => progress.level() >= 10,
        AchievementKind::Level25 => progress.level() >= 25,
        AchievementKind::Level50 => progress.level() >= 50,
        AchievementKind::Saved10 => progress.total_saved_days >= 10,
        AchievementKind::Saved50 => progress.total_saved_days >= 50,
        AchievementKind::Saved100 => progress.total_saved_days >= 100,
        AchievementKind::FirstTree => progress.total_days() >= 1,
        AchievementKind::FullGarden => entries_this_month >= 16,
        AchievementKind::Xp1000 => progress.total_xp >= 1_000,
        AchievementKind::Xp5000 => progress.total_xp >= 5_000,
        AchievementKind::Xp10000 => progress.total_xp >= 10_000,
    }
}

/// Scans the catalog against current progress and unlocks what qualifies.
pub struct AchievementEngine<'a> {
    store: &'a dyn Store,
    clock: &'a dyn Clock,
}

impl<'a> AchievementEngine<'a> {
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Unlock every qualifying achievement that isn't already unlocked.
    ///
    /// Returns exactly the achievements unlocked by this call; the updated
    /// collection is persisted only when that set is non-empty.
    pub fn check_and_unlock(
        &self,
        progress: &UserProgress,
        entries_this_month: usize,
    ) -> Result<Vec<Achievement>> {
        let mut unlocked = self.store.load_achievements()?;
        let mut newly_unlocked = Vec::new();
        let now = self.clock.now();

        for def in &CATALOG {
            if !qualifies(def.kind, progress, entries_this_month) {
                continue;
            }
            let already = unlocked
                .iter()
                .any(|a| a.id == def.id && a.is_unlocked());
            if already {
                continue;
            }
            unlocked.retain(|a| a.id != def.id);
            let achievement = def.to_achievement(Some(now));
            unlocked.push(achievement.clone());
            newly_unlocked.push(achievement);
        }

        if !newly_unlocked.is_empty() {
            self.store.save_achievements(&unlocked)?;
            info!(
                "achievements: unlocked {:?}",
                newly_unlocked.iter().map(|a| a.id.as_str()).collect::<Vec<_>>()
            );
        }
        Ok(newly_unlocked)
    }

    /// Every catalog achievement, with `unlocked_at = None` for the ones
    /// never achieved. Display only.
    pub fn all_with_status(&self) -> Result<Vec<Achievement>> {
        let unlocked = self.store.load_achievements()?;
        Ok(CATALOG
            .iter()
            .map(|def| {
                unlocked
                    .iter()
                    .find(|a| a.id == def.id)
                    .cloned()
                    .unwrap_or_else(|| def.to_achievement(None))
            })
            .collect())
    }

    /// Entry count for the month containing `date`.
    pub fn entries_in_month(entries: &[crate::session::DayEntry], date: chrono::NaiveDate) -> usize {
        entries
            .iter()
            .filter(|e| e.date.year() == date.year() && e.date.month() == date.month())
            .count()
    }
}
