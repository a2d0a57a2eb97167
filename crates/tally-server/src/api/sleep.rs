//! Sleep routes

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tally_core::{
    services::{list_sleep, parse_sleep_request, upsert_sleep, weekly_sleep_for_user},
    SleepRequest, WeeklySeries,
};

use super::AuthUser;
use crate::{error::ApiResult, state::AppState};

/// Sleep routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(save))
        .route("/week", get(week))
}

#[derive(Debug, Serialize)]
pub struct SleepEntry {
    pub hours: i64,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub message: String,
    pub id: i64,
}

async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<SleepEntry>>> {
    let records = list_sleep(&state.db.pool, auth.user_id()).await?;
    Ok(Json(
        records
            .into_iter()
            .map(|r| SleepEntry {
                hours: r.hours,
                date: r.record_date.format("%Y-%m-%d").to_string(),
            })
            .collect(),
    ))
}

async fn save(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SleepRequest>,
) -> ApiResult<Json<SavedResponse>> {
    let (hours, date) = parse_sleep_request(&req)?;
    let id = upsert_sleep(&state.db.pool, auth.user_id(), hours, date).await?;
    log::debug!("Saved {}h of sleep on {} for user {}", hours, date, auth.user_id());

    Ok(Json(SavedResponse {
        message: "Sleep record saved".to_string(),
        id,
    }))
}

async fn week(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<WeeklySeries>> {
    Ok(Json(weekly_sleep_for_user(&state.db.pool, auth.user_id()).await?))
}
