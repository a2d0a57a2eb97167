//! Data models for the Tally application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User response (without sensitive fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub exp: i64,
}

// ============================================================================
// Habitica observations
// ============================================================================

/// Habitica task category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskType {
    Habit,
    Daily,
    Todo,
    Reward,
    Other(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::Habit => "habit",
            TaskType::Daily => "daily",
            TaskType::Todo => "todo",
            TaskType::Reward => "reward",
            TaskType::Other(s) => s,
        }
    }

    /// Case-insensitive match against a stored type string
    pub fn matches(&self, stored: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(stored.trim())
    }
}

impl From<&str> for TaskType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "habit" => TaskType::Habit,
            "daily" => TaskType::Daily,
            "todo" => TaskType::Todo,
            "reward" => TaskType::Reward,
            other => TaskType::Other(other.to_string()),
        }
    }
}

/// One stored (user, task, date) measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Observation {
    pub user_id: String,
    pub task_name: String,
    pub task_type: String,
    #[sqlx(rename = "task_value")]
    pub value: f64,
    pub record_date: NaiveDate,
    #[sqlx(rename = "task_id")]
    pub external_task_id: String,
}

/// Named date range for a chart request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartWindow {
    /// The single most recent date present in the data
    Day,
    #[default]
    Month,
    Year,
}

impl ChartWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartWindow::Day => "day",
            ChartWindow::Month => "month",
            ChartWindow::Year => "year",
        }
    }
}

impl From<&str> for ChartWindow {
    /// Unknown values fall back to `Month`
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "day" => ChartWindow::Day,
            "year" => ChartWindow::Year,
            _ => ChartWindow::Month,
        }
    }
}

/// Dense chart payload: three parallel arrays of equal length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    #[serde(rename = "Keys")]
    pub keys: Vec<String>,
    #[serde(rename = "Values")]
    pub values: Vec<f64>,
    #[serde(rename = "Dates")]
    pub dates: Vec<String>,
}

impl ChartSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn push(&mut self, key: &str, value: f64, date: NaiveDate) {
        self.keys.push(key.to_string());
        self.values.push(value);
        self.dates.push(date.format("%Y-%m-%d").to_string());
    }
}

/// A row of the Habitica history export, before coercion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHistoryRow {
    pub date: String,
    pub task_name: String,
    pub task_type: String,
    pub value: String,
    pub task_id: String,
}

/// Outcome of a Habitica history sync
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    pub rows_fetched: usize,
    pub rows_upserted: usize,
    pub rows_skipped: usize,
}

// ============================================================================
// API credentials
// ============================================================================

/// Stored third-party API credential
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiCredential {
    pub id: i64,
    pub user_id: String,
    pub api_type: String,
    pub api_id: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

/// Create/update credential request
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialRequest {
    #[serde(rename = "type")]
    pub api_type: String,
    pub api_id: String,
    pub api_key: String,
}

// ============================================================================
// Sleep and gym
// ============================================================================

/// Hours slept on one date
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SleepRecord {
    pub id: i64,
    pub user_id: String,
    pub hours: i64,
    pub record_date: NaiveDate,
}

/// One gym session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GymRecord {
    pub id: i64,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub exercise_title: String,
    pub exercise_notes: Option<String>,
}

impl GymRecord {
    /// Session length in fractional hours
    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_seconds() as f64 / 3600.0
    }
}

/// Sleep POST body. `hours` may arrive as a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleepRequest {
    pub hours: Option<serde_json::Value>,
    pub date: Option<String>,
}

/// Gym POST body, ISO 8601 timestamps
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GymRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub exercise_title: Option<String>,
    pub exercise_notes: Option<String>,
}

/// Validated gym session ready to insert
#[derive(Debug, Clone)]
pub struct NewGymRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub exercise_title: String,
    pub exercise_notes: Option<String>,
}

/// Zero-filled trailing series, one value per day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    pub dates: Vec<String>,
    pub hours: Vec<f64>,
}

// ============================================================================
// Tests
// ============================================================================
