//! API module - Axum routes

pub mod auth;
pub mod credentials;
pub mod gym;
pub mod habitica;
pub mod sleep;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub use auth::AuthUser;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(auth::routes())
        .nest("/user/api", credentials::routes())
        .nest("/user/habitica", habitica::routes())
        .nest("/user/sleep", sleep::routes())
        .nest("/user/gym", gym::routes())
        .layer(cors)
        .with_state(state)
}
