//! Habitica record store queries

use chrono::{Duration, Local, NaiveDate};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Observation;

/// Default look-back used by the chart routes
pub const RECENT_DAYS: i64 = 30;

/// Observations for one user from the last `days` days, newest first
pub async fn fetch_recent_observations(
    pool: &SqlitePool,
    user_id: &str,
    days: i64,
) -> Result<Vec<Observation>> {
    let since = Local::now().date_naive() - Duration::days(days);
    fetch_observations_since(pool, user_id, since).await
}

/// Observations for one user on or after `since`, newest first
pub async fn fetch_observations_since(
    pool: &SqlitePool,
    user_id: &str,
    since: NaiveDate,
) -> Result<Vec<Observation>> {
    let records: Vec<Observation> = sqlx::query_as(
        r#"
        SELECT user_id, task_name, task_type, task_value, record_date, task_id
        FROM habitica_records
        WHERE user_id = ? AND record_date >= ?
        ORDER BY record_date DESC, id ASC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    log::debug!(
        "Loaded {} habitica records for user {} since {}",
        records.len(),
        user_id,
        since
    );
    Ok(records)
}

/// Most recent stored record date for a user
pub async fn latest_record_date(pool: &SqlitePool, user_id: &str) -> Result<Option<NaiveDate>> {
    let row: (Option<NaiveDate>,) =
        sqlx::query_as("SELECT MAX(record_date) FROM habitica_records WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}
