//! Gym routes

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tally_core::{
    services::{insert_gym, list_gym, parse_gym_request, weekly_gym_for_user},
    GymRecord, GymRequest, WeeklySeries,
};

use super::{sleep::SavedResponse, AuthUser};
use crate::{error::ApiResult, state::AppState};

/// Gym routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(save))
        .route("/week", get(week))
}

#[derive(Debug, Serialize)]
pub struct GymEntry {
    pub start_time: String,
    pub end_time: String,
    pub exercise_title: String,
    pub exercise_notes: Option<String>,
}

impl From<GymRecord> for GymEntry {
    fn from(r: GymRecord) -> Self {
        Self {
            start_time: r.start_time.to_rfc3339(),
            end_time: r.end_time.to_rfc3339(),
            exercise_title: r.exercise_title,
            exercise_notes: r.exercise_notes,
        }
    }
}

async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<GymEntry>>> {
    let records = list_gym(&state.db.pool, auth.user_id()).await?;
    Ok(Json(records.into_iter().map(GymEntry::from).collect()))
}

async fn save(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<GymRequest>,
) -> ApiResult<Json<SavedResponse>> {
    let record = parse_gym_request(&req)?;
    let id = insert_gym(&state.db.pool, auth.user_id(), &record).await?;
    log::debug!("Saved gym session {} for user {}", id, auth.user_id());

    Ok(Json(SavedResponse {
        message: "Gym record saved".to_string(),
        id,
    }))
}

async fn week(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<WeeklySeries>> {
    Ok(Json(weekly_gym_for_user(&state.db.pool, auth.user_id()).await?))
}
