//! Authoritative group snapshot
//!
//! Every write goes through [`GroupStore::update`]: the closure computes the
//! next snapshot from the current one without holding the lock, and the
//! result is committed only if nobody else committed in the meantime.
//! Otherwise the closure is re-run against the fresh snapshot.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::PoolError;
use crate::group::Group;

/// Attempts before an update gives up with `ConcurrentModification`
pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

#[derive(Debug)]
pub struct GroupStore {
    current: RwLock<Arc<Group>>,
    max_attempts: usize,
}

impl GroupStore {
    pub fn new(group: Group) -> Self {
        Self {
            current: RwLock::new(Arc::new(group)),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The latest committed snapshot
    pub async fn snapshot(&self) -> Arc<Group> {
        Arc::clone(&*self.current.read().await)
    }

    /// Applies `mutate` with optimistic concurrency control
    ///
    /// A result whose version equals the snapshot's is treated as a no-op
    /// and not written back.
    pub async fn update<T, F>(&self, mut mutate: F) -> Result<T, PoolError>
    where
        F: FnMut(&Group) -> Result<(Group, T), PoolError>,
    {
        for attempt in 1..=self.max_attempts {
            let snapshot = self.snapshot().await;
            let (next, value) = mutate(&snapshot)?;
            if next.version() == snapshot.version() {
                return Ok(value);
            }

            let mut current = self.current.write().await;
            if current.version() == snapshot.version() {
                *current = Arc::new(next);
                return Ok(value);
            }
            drop(current);

            tracing::debug!(attempt, version = snapshot.version(), "group changed during update, retrying");
            tokio::task::yield_now().await;
        }

        tracing::warn!(attempts = self.max_attempts, "giving up on contended group update");
        Err(PoolError::ConcurrentModification {
            attempts: self.max_attempts,
        })
    }
}
