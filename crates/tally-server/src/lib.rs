//! # tally-server
//!
//! Axum HTTP API for Tally: registration and login, API credential
//! management, Habitica charts, sleep and gym records.

pub mod api;
pub mod error;
pub mod state;

pub use api::create_router;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
