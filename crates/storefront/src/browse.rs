//! Per-visitor catalog browse sessions.
//!
//! Each visitor gets one [`CatalogList`] for the lifetime of their catalog
//! view, keyed by the browse cookie. The `tokio::sync::Mutex` around each
//! list serializes fetches for that visitor, so the controller's
//! at-most-one-in-flight policy also holds across overlapping HTTP requests.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use tinyshop_core::{CatalogList, PAGE_SIZE};

use crate::catalog::{CatalogClient, CatalogError};

/// Idle time after which an abandoned browse session is dropped.
const SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on concurrently tracked visitors.
const MAX_SESSIONS: u64 = 10_000;

/// In-memory store of per-visitor catalog lists.
pub struct BrowseSessions {
    sessions: Cache<Uuid, Arc<Mutex<CatalogList>>>,
}

impl BrowseSessions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(SESSION_IDLE_TTL)
                .build(),
        }
    }

    /// Get the visitor's catalog list, seeding a new one from the first
    /// unfiltered page when none exists yet.
    ///
    /// # Errors
    ///
    /// Returns the catalog error when the seed fetch fails; per the
    /// error-handling policy an initial page-load failure is a hard failure.
    pub async fn get_or_seed(
        &self,
        visitor: Uuid,
        catalog: &CatalogClient,
    ) -> Result<Arc<Mutex<CatalogList>>, CatalogError> {
        if let Some(list) = self.sessions.get(&visitor) {
            return Ok(list);
        }

        let seed = catalog.fetch_all(1, PAGE_SIZE).await?;
        let list = Arc::new(Mutex::new(CatalogList::new(seed)));
        // Two concurrent first requests may both seed; the loser's insert
        // wins and both seeds hold identical page-1 data.
        self.sessions.insert(visitor, Arc::clone(&list));
        Ok(list)
    }

    /// Number of live browse sessions (for logging and tests).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BrowseSessions {
    fn default() -> Self {
        Self::new()
    }
}
