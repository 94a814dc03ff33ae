//! Collection persistence.
//!
//! The core's storage boundary is [`Store`]: per-collection load/save with
//! documented defaults when a collection is absent. Every mutating engine
//! operation reads a whole collection, computes the successor value, and
//! writes it back through a single `save_*` call, so a failed save leaves
//! the collection at either the old or the new value, never a mix.
//!
//! Operations on a given collection must not be interleaved; the engines
//! are driven from a single-threaded event loop, and a multi-threaded host
//! should serialize access (one mutex around the store suffices).

pub mod database;

pub use database::Database;

use std::path::PathBuf;

use crate::achievements::Achievement;
use crate::error::StorageError;
use crate::impulse::{ImpulseEntry, ImpulseStats};
use crate::progress::UserProgress;
use crate::session::DayEntry;

/// Returns `~/.config/coingarden[-dev]/` based on COINGARDEN_ENV.
///
/// Set COINGARDEN_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("COINGARDEN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("coingarden-dev")
    } else {
        base_dir.join("coingarden")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Key-value collection store.
///
/// One method pair per named collection; absent collections load as the
/// documented default (empty list, `Default` singleton, or `None`).
pub trait Store {
    /// The progress singleton; `UserProgress::default()` when absent.
    fn load_progress(&self) -> Result<UserProgress, StorageError>;
    fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError>;

    /// Completed entry history, append-only; empty when absent.
    fn load_entries(&self) -> Result<Vec<DayEntry>, StorageError>;
    fn save_entries(&self, entries: &[DayEntry]) -> Result<(), StorageError>;

    /// The single in-progress session, if any.
    fn load_active_session(&self) -> Result<Option<DayEntry>, StorageError>;
    fn save_active_session(&self, entry: &DayEntry) -> Result<(), StorageError>;
    fn clear_active_session(&self) -> Result<(), StorageError>;

    /// Unlocked achievements; empty when absent.
    fn load_achievements(&self) -> Result<Vec<Achievement>, StorageError>;
    fn save_achievements(&self, achievements: &[Achievement]) -> Result<(), StorageError>;

    /// Impulse-check log, append-only; empty when absent.
    fn load_impulse_entries(&self) -> Result<Vec<ImpulseEntry>, StorageError>;
    fn save_impulse_entries(&self, entries: &[ImpulseEntry]) -> Result<(), StorageError>;

    /// Rolling impulse aggregate; `ImpulseStats::default()` when absent.
    fn load_impulse_stats(&self) -> Result<ImpulseStats, StorageError>;
    fn save_impulse_stats(&self, stats: &ImpulseStats) -> Result<(), StorageError>;

    /// First-run flag gating demo-data seeding (seeding itself lives in the
    /// presentation layer).
    fn is_initialized(&self) -> Result<bool, StorageError>;
    fn set_initialized(&self) -> Result<(), StorageError>;

    /// Full data reset: every collection, including the first-run flag.
    fn clear_all(&self) -> Result<(), StorageError>;
}
