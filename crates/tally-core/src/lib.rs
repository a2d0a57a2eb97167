//! # tally-core
//!
//! Core logic for Tally, a personal habit/sleep/gym tracker.
//!
//! This crate provides:
//! - Database operations (`db` module)
//! - Data models (`models` module)
//! - Habitica import, chart reconciliation and record services (`services` module)
//! - Authentication utilities (`auth` module)
//! - Unified error handling (`error` module)

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

// Re-exports for convenience
pub use db::Database;
pub use error::{Error, Result};

pub use models::{
    ApiCredential, ChartSeries, ChartWindow, Claims, CredentialRequest, GymRecord, GymRequest,
    NewGymRecord, Observation, RawHistoryRow, SleepRecord, SleepRequest, SyncResult, TaskType,
    User, UserResponse, WeeklySeries,
};

pub use services::{
    merge_external, reconcile, reconcile_today, sync_user_history, HabiticaClient,
    HistorySource, RecordCache,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
