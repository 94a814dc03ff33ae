//! SQLite-backed collection store.
//!
//! Collections live in a single `kv` table keyed by collection name, with
//! values JSON-encoded. A save is one `INSERT OR REPLACE`, which is what
//! makes each engine operation's write atomic at the collaborator level.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::achievements::Achievement;
use crate::error::StorageError;
use crate::impulse::{ImpulseEntry, ImpulseStats};
use crate::progress::UserProgress;
use crate::session::DayEntry;
use crate::storage::Store;

const PROGRESS_KEY: &str = "user_progress";
const ENTRIES_KEY: &str = "entries";
const ACTIVE_SESSION_KEY: &str = "active_session";
const ACHIEVEMENTS_KEY: &str = "achievements";
const IMPULSE_ENTRIES_KEY: &str = "impulse_entries";
const IMPULSE_STATS_KEY: &str = "impulse_stats";
const APP_INITIALIZED_KEY: &str = "app_initialized";

/// SQLite database holding every named collection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/coingarden/coingarden.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("coingarden.db");
        Self::open_at(path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: impl Into<std::path::PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StorageError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        match raw {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .map_err(|source| StorageError::BadValue { key, source })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn put_json<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|source| StorageError::BadValue { key, source })?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, raw],
        )?;
        Ok(())
    }

    fn delete(&self, key: &'static str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl Store for Database {
    fn load_progress(&self) -> Result<UserProgress, StorageError> {
        Ok(self.get_json(PROGRESS_KEY)?.unwrap_or_default())
    }

    fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError> {
        self.put_json(PROGRESS_KEY, progress)
    }

    fn load_entries(&self) -> Result<Vec<DayEntry>, StorageError> {
        Ok(self.get_json(ENTRIES_KEY)?.unwrap_or_default())
    }

    fn save_entries(&self, entries: &[DayEntry]) -> Result<(), StorageError> {
        self.put_json(ENTRIES_KEY, &entries)
    }

    fn load_active_session(&self) -> Result<Option<DayEntry>, StorageError> {
        self.get_json(ACTIVE_SESSION_KEY)
    }

    fn save_active_session(&self, entry: &DayEntry) -> Result<(), StorageError> {
        self.put_json(ACTIVE_SESSION_KEY, entry)
    }

    fn clear_active_session(&self) -> Result<(), StorageError> {
        self.delete(ACTIVE_SESSION_KEY)
    }

    fn load_achievements(&self) -> Result<Vec<Achievement>, StorageError> {
        Ok(self.get_json(ACHIEVEMENTS_KEY)?.unwrap_or_default())
    }

    fn save_achievements(&self, achievements: &[Achievement]) -> Result<(), StorageError> {
        self.put_json(ACHIEVEMENTS_KEY, &achievements)
    }

    fn load_impulse_entries(&self) -> Result<Vec<ImpulseEntry>, StorageError> {
        Ok(self.get_json(IMPULSE_ENTRIES_KEY)?.unwrap_or_default())
    }

    fn save_impulse_entries(&self, entries: &[ImpulseEntry]) -> Result<(), StorageError> {
        self.put_json(IMPULSE_ENTRIES_KEY, &entries)
    }

    fn load_impulse_stats(&self) -> Result<ImpulseStats, StorageError> {
        Ok(self.get_json(IMPULSE_STATS_KEY)?.unwrap_or_default())
    }

    fn save_impulse_stats(&self, stats: &ImpulseStats) -> Result<(), StorageError> {
        self.put_json(IMPULSE_STATS_KEY, stats)
    }

    fn is_initialized(&self) -> Result<bool, StorageError> {
        Ok(self.get_json(APP_INITIALIZED_KEY)?.unwrap_or(false))
    }

    fn set_initialized(&self) -> Result<(), StorageError> {
        self.put_json(APP_INITIALIZED_KEY, &true)
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}
