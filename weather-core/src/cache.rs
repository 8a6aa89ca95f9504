//! Single-slot persistence of the last successful weather lookup.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{model::WeatherSummary, store::KeyValueStore};

/// Key the summary is stored under.
pub const CACHE_KEY: &str = "weather_cache_key";

/// Best-effort cache: failures are logged and read back as "no cache".
#[derive(Debug, Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Replace the stored summary. On any failure the previous record is left as is.
    pub fn persist(&self, summary: &WeatherSummary) {
        let bytes = match serde_json::to_vec(summary) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "skipping cache write, summary did not serialize");
                return;
            }
        };

        if let Err(e) = self.store.set(CACHE_KEY, &bytes) {
            warn!(error = %e, "skipping cache write");
        }
    }

    pub fn load(&self) -> Option<WeatherSummary> {
        let bytes = match self.store.get(CACHE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "cache unreadable, treating as empty");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(summary) => Some(summary),
            Err(e) => {
                debug!(error = %e, "cached summary did not decode, treating as empty");
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.delete(CACHE_KEY) {
            warn!(error = %e, "failed to clear weather cache");
        }
    }
}
