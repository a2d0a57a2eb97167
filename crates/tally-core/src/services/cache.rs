//! Time-bucketed read-through cache for per-user record loads
//!
//! Entries are keyed by `(user_id, unix_secs / bucket_secs)`. A new bucket
//! simply misses, so data is at most one bucket width stale and nothing is
//! ever invalidated early. When full, the entry with the oldest bucket is
//! evicted first.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::Observation;

pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_BUCKET_SECS: u64 = 300;

type CacheKey = (String, u64);

pub struct RecordCache {
    entries: Mutex<HashMap<CacheKey, Arc<Vec<Observation>>>>,
    capacity: usize,
    bucket_secs: u64,
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_BUCKET_SECS)
    }
}

impl RecordCache {
    pub fn new(capacity: usize, bucket_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            bucket_secs: bucket_secs.max(1),
        }
    }

    /// Bucket index containing `at`
    pub fn bucket_for(&self, at: DateTime<Utc>) -> u64 {
        at.timestamp().max(0) as u64 / self.bucket_secs
    }

    /// Cached records for the current bucket, loading them on a miss
    pub async fn get_or_load<F, Fut>(&self, user_id: &str, loader: F) -> Result<Arc<Vec<Observation>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Observation>>>,
    {
        let bucket = self.bucket_for(Utc::now());
        self.get_or_load_at(user_id, bucket, loader).await
    }

    /// Same as [`get_or_load`](Self::get_or_load) with an explicit bucket.
    ///
    /// The lock is not held while `loader` runs; two concurrent misses for the
    /// same key may both load, and the later insert wins. Loader errors are
    /// returned and not cached.
    pub async fn get_or_load_at<F, Fut>(
        &self,
        user_id: &str,
        bucket: u64,
        loader: F,
    ) -> Result<Arc<Vec<Observation>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Observation>>>,
    {
        let key = (user_id.to_string(), bucket);

        if let Some(hit) = self.entries.lock().await.get(&key) {
            log::debug!("Record cache hit for user {} bucket {}", user_id, bucket);
            return Ok(Arc::clone(hit));
        }

        let records = Arc::new(loader().await?);

        let mut entries = self.entries.lock().await;
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            evict_oldest(&mut entries);
        }
        entries.insert(key, Arc::clone(&records));

        Ok(records)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn contains(&self, user_id: &str, bucket: u64) -> bool {
        self.entries
            .lock()
            .await
            .contains_key(&(user_id.to_string(), bucket))
    }
}

fn evict_oldest(entries: &mut HashMap<CacheKey, Arc<Vec<Observation>>>) {
    let oldest = entries
        .keys()
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        .cloned();
    if let Some(key) = oldest {
        log::debug!("Evicting record cache entry for user {} bucket {}", key.0, key.1);
        entries.remove(&key);
    }
}
