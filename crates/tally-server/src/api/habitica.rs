//! Habitica chart routes
//!
//! `GET /user/habitica` pulls a fresh export before charting. The per-type
//! routes only read what is already stored, through the record cache.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tally_core::{
    models::{ChartSeries, ChartWindow, TaskType},
    reconcile_today,
    services::{fetch_recent_observations, RECENT_DAYS},
    sync_user_history,
};

use super::AuthUser;
use crate::{error::ChartError, state::AppState};

/// Habitica routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sync_and_chart))
        .route("/daily", get(daily_chart))
        .route("/habit", get(habit_chart))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub time_range: Option<String>,
}

impl ChartQuery {
    fn window(&self) -> ChartWindow {
        self.time_range
            .as_deref()
            .map(ChartWindow::from)
            .unwrap_or_default()
    }
}

type ChartResult = Result<Json<ChartSeries>, ChartError>;

async fn sync_and_chart(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChartQuery>,
) -> ChartResult {
    let user_id = auth.user_id();
    let result = sync_user_history(&state.db.pool, state.history.as_ref(), user_id).await?;
    log::info!(
        "Habitica sync for user {}: {} fetched, {} upserted, {} skipped",
        user_id,
        result.rows_fetched,
        result.rows_upserted,
        result.rows_skipped
    );

    let records = fetch_recent_observations(&state.db.pool, user_id, RECENT_DAYS).await?;
    Ok(Json(reconcile_today(&records, None, query.window())))
}

async fn daily_chart(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChartQuery>,
) -> ChartResult {
    cached_chart(&state, auth.user_id(), TaskType::Daily, query.window()).await
}

async fn habit_chart(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChartQuery>,
) -> ChartResult {
    cached_chart(&state, auth.user_id(), TaskType::Habit, query.window()).await
}

async fn cached_chart(
    state: &AppState,
    user_id: &str,
    task_type: TaskType,
    window: ChartWindow,
) -> ChartResult {
    let pool = &state.db.pool;
    let records = state
        .cache
        .get_or_load(user_id, || fetch_recent_observations(pool, user_id, RECENT_DAYS))
        .await?;

    Ok(Json(reconcile_today(&records, Some(&task_type), window)))
}
