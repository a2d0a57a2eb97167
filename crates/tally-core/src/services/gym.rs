//! Gym sessions

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::SqlitePool;

use super::weekly::{gym_window_start, weekly_gym};
use crate::error::{Error, Result};
use crate::models::{GymRecord, GymRequest, NewGymRecord, WeeklySeries};

pub const LIST_LIMIT: i64 = 30;

/// ISO 8601 with offset or `Z`; naive timestamps are taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

/// Validate a POST body
pub fn parse_gym_request(request: &GymRequest) -> Result<NewGymRecord> {
    let (Some(start), Some(end), Some(title)) = (
        request.start_time.as_deref(),
        request.end_time.as_deref(),
        request.exercise_title.as_deref().filter(|t| !t.trim().is_empty()),
    ) else {
        return Err(Error::validation("Missing required fields"));
    };

    let start_time = parse_timestamp(start).ok_or_else(|| Error::validation("Invalid datetime format"))?;
    let end_time = parse_timestamp(end).ok_or_else(|| Error::validation("Invalid datetime format"))?;
    if end_time < start_time {
        return Err(Error::validation("end_time must not be before start_time"));
    }

    Ok(NewGymRecord {
        start_time,
        end_time,
        exercise_title: title.trim().to_string(),
        exercise_notes: request.exercise_notes.clone(),
    })
}

/// Store a session and return its id
pub async fn insert_gym(pool: &SqlitePool, user_id: &str, record: &NewGymRecord) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO gym_records (user_id, start_time, end_time, exercise_title, exercise_notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(record.start_time)
    .bind(record.end_time)
    .bind(&record.exercise_title)
    .bind(&record.exercise_notes)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recent sessions, newest first
pub async fn list_gym(pool: &SqlitePool, user_id: &str) -> Result<Vec<GymRecord>> {
    let records: Vec<GymRecord> = sqlx::query_as(
        "SELECT * FROM gym_records WHERE user_id = ? ORDER BY start_time DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(LIST_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Sessions starting at or after `since`
pub async fn gym_since(
    pool: &SqlitePool,
    user_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<GymRecord>> {
    let records: Vec<GymRecord> = sqlx::query_as(
        "SELECT * FROM gym_records WHERE user_id = ? AND start_time >= ? ORDER BY start_time",
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Trailing 8-day gym hours series
pub async fn weekly_gym_for_user(pool: &SqlitePool, user_id: &str) -> Result<WeeklySeries> {
    let now = Utc::now();
    let sessions = gym_since(pool, user_id, gym_window_start(now)).await?;
    Ok(weekly_gym(&sessions, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(start: &str, end: &str, title: &str) -> GymRequest {
        GymRequest {
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            exercise_title: Some(title.to_string()),
            exercise_notes: None,
        }
    }

    #[test]
    fn test_parse_gym_request_zulu() {
        let record =
            parse_gym_request(&request("2024-01-05T10:00:00Z", "2024-01-05T11:00:00Z", "Legs"))
                .unwrap();
        assert_eq!(record.start_time, Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap());
        assert_eq!(record.exercise_title, "Legs");
    }

    #[test]
    fn test_parse_gym_request_offset_and_naive() {
        let record = parse_gym_request(&request(
            "2024-01-05T12:00:00+02:00",
            "2024-01-05T11:30:00",
            "Back",
        ))
        .unwrap();
        assert_eq!(record.start_time, Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap());
        assert_eq!(record.end_time, Utc.with_ymd_and_hms(2024, 1, 5, 11, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_gym_request_missing_title() {
        let err = parse_gym_request(&request("2024-01-05T10:00:00Z", "2024-01-05T11:00:00Z", " "))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg == "Missing required fields"));
    }

    #[test]
    fn test_parse_gym_request_bad_times() {
        assert!(parse_gym_request(&request("yesterday", "2024-01-05T11:00:00Z", "Legs")).is_err());
        assert!(parse_gym_request(&request(
            "2024-01-05T11:00:00Z",
            "2024-01-05T10:00:00Z",
            "Legs"
        ))
        .is_err());
    }
}
