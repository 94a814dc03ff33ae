//! # Coingarden Core Library
//!
//! This library provides the core progression logic for Coingarden, a
//! habit tracker that gamifies daily save-or-spend decisions through a
//! virtual garden. The presentation layer (screens, animations, sound)
//! is a thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Day sessions**: a single active session per day, completed exactly
//!   once into an append-only history
//! - **Progression**: XP totals, a 200-XP-per-level curve, and a
//!   consecutive-saved-day streak
//! - **Achievements**: a fixed catalog unlocked idempotently from progress
//! - **Plant growth**: a pure wall-clock function from session age to a
//!   growth stage
//! - **Impulse checks**: a breathing-timer questionnaire state machine that
//!   scores purchase impulses
//! - **Storage**: a key-value collection store backed by SQLite
//!
//! ## Key Components
//!
//! - [`EntryLifecycle`]: start/complete day sessions and query history
//! - [`ProgressEngine`]: XP and streak arithmetic over [`UserProgress`]
//! - [`StaleSessionReconciler`]: auto-completes sessions left open past
//!   midnight
//! - [`AchievementEngine`]: catalog scanning and unlocking
//! - [`ImpulseCheckFlow`]: the impulse-purchase check state machine
//! - [`Database`]: collection persistence

pub mod achievements;
pub mod clock;
pub mod error;
pub mod growth;
pub mod impulse;
pub mod insights;
pub mod progress;
pub mod session;
pub mod storage;
pub mod xp;

pub use achievements::{Achievement, AchievementEngine, AchievementKind};
pub use clock::{Clock, SystemClock};
pub use error::{CoreError, Result, StorageError};
pub use growth::GrowthStage;
pub use impulse::{
    ImpulseCheckFlow, ImpulseCheckService, ImpulseEntry, ImpulseResult, ImpulseStats,
    ImpulseStep, ImpulseVerdict,
};
pub use insights::MonthlySpending;
pub use progress::{ProgressEngine, UserProgress};
pub use session::{
    DayCompletion, DayEntry, DayOutcome, EntryLifecycle, Reconciliation, SpendDetails,
    SpendingCategory, StaleSessionReconciler,
};
pub use storage::{Database, Store};
