//! Core error types for coingarden-core.
//!
//! Domain failures are recoverable and surfaced to the caller for UI
//! messaging; storage failures propagate unchanged from the persistence
//! layer and abort the operation without committing partial state.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for coingarden-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Starting a session when today already has a completed entry or an
    /// active session. No state is mutated.
    #[error("an entry for {date} already exists")]
    AlreadyHasEntryForToday { date: NaiveDate },

    /// Completing or reconciling when no session is active.
    #[error("no active session")]
    NoActiveSession,

    /// Storage-related errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// A stored value could not be encoded or decoded
    #[error("bad stored value for '{key}': {source}")]
    BadValue {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory could not be resolved or created
    #[error("data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
