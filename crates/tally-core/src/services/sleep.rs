//! Sleep records

use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

use super::weekly::{sleep_window_start, weekly_sleep};
use crate::error::{Error, Result};
use crate::models::{SleepRecord, SleepRequest, WeeklySeries};

pub const LIST_LIMIT: i64 = 30;
const MAX_HOURS: i64 = 24;

/// Validate a POST body into `(hours, date)`
pub fn parse_sleep_request(request: &SleepRequest) -> Result<(i64, NaiveDate)> {
    let (Some(hours), Some(date)) = (&request.hours, &request.date) else {
        return Err(Error::validation("Missing required fields"));
    };

    let hours = match hours {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::validation("Invalid data format"))?;

    if !(0..=MAX_HOURS).contains(&hours) {
        return Err(Error::validation(format!("hours must be between 0 and {}", MAX_HOURS)));
    }

    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation("Invalid data format"))?;

    Ok((hours, date))
}

/// Insert or overwrite the hours for `(user_id, date)`; returns the row id
pub async fn upsert_sleep(
    pool: &SqlitePool,
    user_id: &str,
    hours: i64,
    date: NaiveDate,
) -> Result<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO sleep_records (user_id, hours, record_date)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, record_date)
        DO UPDATE SET hours = excluded.hours
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(hours)
    .bind(date)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Most recent sleep records, newest first
pub async fn list_sleep(pool: &SqlitePool, user_id: &str) -> Result<Vec<SleepRecord>> {
    let records: Vec<SleepRecord> = sqlx::query_as(
        "SELECT * FROM sleep_records WHERE user_id = ? ORDER BY record_date DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(LIST_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Records with `start <= record_date <= end`
pub async fn sleep_between(
    pool: &SqlitePool,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SleepRecord>> {
    let records: Vec<SleepRecord> = sqlx::query_as(
        r#"
        SELECT * FROM sleep_records
        WHERE user_id = ? AND record_date BETWEEN ? AND ?
        ORDER BY record_date
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Trailing 7-day sleep series ending today
pub async fn weekly_sleep_for_user(pool: &SqlitePool, user_id: &str) -> Result<WeeklySeries> {
    let today = Local::now().date_naive();
    let records = sleep_between(pool, user_id, sleep_window_start(today), today).await?;
    Ok(weekly_sleep(&records, today))
}
