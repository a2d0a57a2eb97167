//! Habitica history import
//!
//! Habitica only offers a full-history CSV export, never a delta. Every sync
//! downloads the whole export and upserts it keyed on
//! `(user_id, task_id, record_date)`, so repeated imports are idempotent and
//! no high-water mark has to be tracked.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::{header, Client};
use sqlx::SqlitePool;

use super::credentials::find_credential;
use super::records::latest_record_date;
use crate::error::{Error, Result};
use crate::models::{ApiCredential, RawHistoryRow, SyncResult};

pub const DEFAULT_BASE_URL: &str = "https://habitica.com";
pub const HABITICA_API_TYPE: &str = "habitica";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const HISTORY_PATH: &str = "/export/history.csv";

/// Anything that can produce a user's raw activity history
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(&self, credential: &ApiCredential) -> Result<Vec<RawHistoryRow>>;
}

/// Habitica export API client
pub struct HabiticaClient {
    base_url: String,
    client: Client,
}

impl HabiticaClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HistorySource for HabiticaClient {
    async fn fetch_history(&self, credential: &ApiCredential) -> Result<Vec<RawHistoryRow>> {
        let url = format!("{}{}", self.base_url, HISTORY_PATH);
        let response = self
            .client
            .get(&url)
            .header("x-api-user", &credential.api_id)
            .header("x-api-key", &credential.api_key)
            .header(header::ACCEPT, "text/csv")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            log::warn!("Habitica export failed for user {}: {}", credential.user_id, status);
            return Err(Error::upstream(format!("Habitica API error {}", status)));
        }

        let body = response.text().await?;
        parse_history_csv(&body)
    }
}

// ============ CSV parsing ============

const COL_TASK_NAME: &str = "Task Name";
const COL_TASK_ID: &str = "Task ID";
const COL_TASK_TYPE: &str = "Task Type";
const COL_DATE: &str = "Date";
const COL_VALUE: &str = "Value";

/// Parse the Habitica history export into raw string rows.
///
/// Columns are located by header name. Values are left as strings; coercion
/// happens in [`merge_external`] so a bad row never fails the whole export.
pub fn parse_history_csv(body: &str) -> Result<Vec<RawHistoryRow>> {
    let mut records = split_csv_records(body).into_iter();

    let Some(header_row) = records.next() else {
        return Ok(Vec::new());
    };

    let column = |name: &str| -> Result<usize> {
        header_row
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| Error::upstream(format!("History export is missing column '{}'", name)))
    };
    let name_idx = column(COL_TASK_NAME)?;
    let id_idx = column(COL_TASK_ID)?;
    let type_idx = column(COL_TASK_TYPE)?;
    let date_idx = column(COL_DATE)?;
    let value_idx = column(COL_VALUE)?;

    let field = |row: &[String], idx: usize| row.get(idx).cloned().unwrap_or_default();

    Ok(records
        .filter(|row| !(row.len() == 1 && row[0].trim().is_empty()))
        .map(|row| RawHistoryRow {
            date: field(&row, date_idx),
            task_name: field(&row, name_idx),
            task_type: field(&row, type_idx),
            value: field(&row, value_idx),
            task_id: field(&row, id_idx),
        })
        .collect())
}

/// Split CSV text into records of fields (RFC 4180 quoting, LF or CRLF)
fn split_csv_records(body: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

// ============ Merge ============

/// A history row after coercion, ready to upsert
#[derive(Debug, Clone, PartialEq)]
struct HistoryRecord {
    record_date: NaiveDate,
    task_name: String,
    task_type: String,
    value: f64,
    task_id: String,
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn coerce_row(row: &RawHistoryRow) -> std::result::Result<HistoryRecord, String> {
    let record_date =
        parse_record_date(&row.date).ok_or_else(|| format!("invalid date '{}'", row.date))?;
    let value: f64 = row
        .value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value '{}'", row.value))?;
    if !value.is_finite() {
        return Err(format!("non-finite value '{}'", row.value));
    }

    Ok(HistoryRecord {
        record_date,
        task_name: row.task_name.clone(),
        task_type: row.task_type.clone(),
        value,
        task_id: row.task_id.clone(),
    })
}

/// Upsert history rows for a user in one transaction.
///
/// Rows that fail coercion are logged and skipped. Any database error rolls
/// the whole batch back. Returns the number of rows written.
pub async fn merge_external(
    pool: &SqlitePool,
    user_id: &str,
    rows: &[RawHistoryRow],
) -> Result<usize> {
    let records: Vec<HistoryRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| match coerce_row(row) {
            Ok(record) => Some(record),
            Err(reason) => {
                log::warn!("Skipping history row {} for user {}: {}", i, user_id, reason);
                None
            }
        })
        .collect();

    if records.is_empty() {
        log::info!("No valid history rows to merge for user {}", user_id);
        return Ok(0);
    }

    log_latest_date(pool, user_id, "before").await;

    let mut tx = pool.begin().await?;
    for record in &records {
        sqlx::query(
            r#"
            INSERT INTO habitica_records (user_id, record_date, task_name, task_type, task_value, task_id)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, task_id, record_date)
            DO UPDATE SET task_value = excluded.task_value
            "#,
        )
        .bind(user_id)
        .bind(record.record_date)
        .bind(&record.task_name)
        .bind(&record.task_type)
        .bind(record.value)
        .bind(&record.task_id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    log::info!("Inserted/updated {} habitica records for user {}", records.len(), user_id);
    log_latest_date(pool, user_id, "after").await;

    Ok(records.len())
}

/// Diagnostic only; a failed read is logged, never returned
async fn log_latest_date(pool: &SqlitePool, user_id: &str, stage: &str) {
    match latest_record_date(pool, user_id).await {
        Ok(date) => log::debug!("Latest record date {} merge: {:?}", stage, date),
        Err(e) => log::warn!("Could not read latest record date {} merge: {}", stage, e),
    }
}

/// Fetch a user's full history from `source` and merge it into the store
pub async fn sync_user_history<S: HistorySource + ?Sized>(
    pool: &SqlitePool,
    source: &S,
    user_id: &str,
) -> Result<SyncResult> {
    let credential = find_credential(pool, user_id, HABITICA_API_TYPE)
        .await?
        .ok_or_else(|| Error::not_found("No Habitica API credentials found"))?;

    let rows = source.fetch_history(&credential).await?;
    let upserted = merge_external(pool, user_id, &rows).await?;

    Ok(SyncResult {
        rows_fetched: rows.len(),
        rows_upserted: upserted,
        rows_skipped: rows.len() - upserted,
    })
}
