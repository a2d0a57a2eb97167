//! Shared handler state

use std::sync::Arc;

use tally_core::{Database, HistorySource, RecordCache};

/// Cloned into every handler; everything inside is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cache: Arc<RecordCache>,
    pub history: Arc<dyn HistorySource>,
    jwt_secret: Arc<[u8]>,
}

impl AppState {
    pub fn new(db: Database, history: Arc<dyn HistorySource>, jwt_secret: &str) -> Self {
        Self {
            db,
            cache: Arc::new(RecordCache::default()),
            history,
            jwt_secret: Arc::from(jwt_secret.as_bytes()),
        }
    }

    /// Replace the record cache, e.g. with a smaller one in tests
    pub fn with_cache(mut self, cache: RecordCache) -> Self {
        self.cache = Arc::new(cache);
        self
    }

    pub fn jwt_secret(&self) -> &[u8] {
        &self.jwt_secret
    }
}
