//! Third-party API credentials (`api_records`)
//!
//! Every statement is scoped by `user_id`; a user can never read or touch
//! another user's keys.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::{ApiCredential, CredentialRequest};

fn validate(request: &CredentialRequest) -> Result<()> {
    if request.api_type.trim().is_empty()
        || request.api_id.trim().is_empty()
        || request.api_key.trim().is_empty()
    {
        return Err(Error::validation("type, api_id and api_key are required"));
    }
    Ok(())
}

pub async fn list_credentials(pool: &SqlitePool, user_id: &str) -> Result<Vec<ApiCredential>> {
    let records: Vec<ApiCredential> =
        sqlx::query_as("SELECT * FROM api_records WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(records)
}

/// First credential of the given type, e.g. `"habitica"`
pub async fn find_credential(
    pool: &SqlitePool,
    user_id: &str,
    api_type: &str,
) -> Result<Option<ApiCredential>> {
    let record: Option<ApiCredential> = sqlx::query_as(
        "SELECT * FROM api_records WHERE user_id = ? AND api_type = ? ORDER BY id LIMIT 1",
    )
    .bind(user_id)
    .bind(api_type)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Store a new credential and return its id
pub async fn create_credential(
    pool: &SqlitePool,
    user_id: &str,
    request: &CredentialRequest,
) -> Result<i64> {
    validate(request)?;

    let result = sqlx::query(
        r#"
        INSERT INTO api_records (user_id, api_type, api_id, api_key, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(request.api_type.trim())
    .bind(request.api_id.trim())
    .bind(request.api_key.trim())
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_credential(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
    request: &CredentialRequest,
) -> Result<()> {
    validate(request)?;

    let result = sqlx::query(
        "UPDATE api_records SET api_type = ?, api_id = ?, api_key = ? WHERE id = ? AND user_id = ?",
    )
    .bind(request.api_type.trim())
    .bind(request.api_id.trim())
    .bind(request.api_key.trim())
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found(format!("API record {}", id)));
    }
    Ok(())
}

pub async fn delete_credential(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM api_records WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found(format!("API record {}", id)));
    }
    Ok(())
}
