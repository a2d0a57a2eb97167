//! Shared helpers for tally-core integration tests

#![allow(dead_code)]

use tally_core::auth::{NewUser, SqliteUserRepository, UserRepository};
use tally_core::db::Database;
use tally_core::RawHistoryRow;
use tempfile::TempDir;

/// Helper to create a test database
pub async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Database::open(db_path)
        .await
        .expect("Failed to create test database");
    (db, temp_dir)
}

/// Insert a user row so foreign keys hold
pub async fn create_user(db: &Database, id: &str, username: &str) {
    SqliteUserRepository::new(&db.pool)
        .create_user(NewUser {
            id: id.to_string(),
            username: username.to_string(),
            email: None,
            password_hash: "hash".to_string(),
        })
        .await
        .expect("Failed to create test user");
}

pub fn row(date: &str, name: &str, task_type: &str, value: &str, task_id: &str) -> RawHistoryRow {
    RawHistoryRow {
        date: date.to_string(),
        task_name: name.to_string(),
        task_type: task_type.to_string(),
        value: value.to_string(),
        task_id: task_id.to_string(),
    }
}

/// Stored `(task_id, record_date, task_value)` triples for a user, sorted
pub async fn stored_values(db: &Database, user_id: &str) -> Vec<(String, String, f64)> {
    sqlx::query_as(
        "SELECT task_id, record_date, task_value FROM habitica_records WHERE user_id = ? ORDER BY task_id, record_date",
    )
    .bind(user_id)
    .fetch_all(&db.pool)
    .await
    .expect("Failed to read habitica_records")
}
