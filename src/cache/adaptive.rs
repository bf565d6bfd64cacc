//! Adaptive Cache Module
//!
//! Thread-safe cache handle: a [`CacheStore`] behind one lock, plus the TTL
//! sweep task that lives and dies with it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::tasks::spawn_sweep_task;

// == Adaptive Cache ==
/// Shared cache with adaptive TTL, a byte budget and a background sweep.
///
/// Every operation, including the hit-count bump on reads, runs under the
/// store's write lock. Reads of statistics take the read lock.
#[derive(Debug)]
pub struct AdaptiveCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> AdaptiveCache<V>
where
    V: Clone + Serialize + Send + Sync + 'static,
{
    // == Constructor ==
    /// Wraps `store` and starts its sweep task.
    ///
    /// A zero `sweep_interval` disables the sweep; expired entries are then
    /// only dropped when read. Outside a tokio runtime no sweep is started.
    pub fn new(store: CacheStore<V>, sweep_interval: Duration) -> Self {
        let store = Arc::new(RwLock::new(store));

        let sweeper = if sweep_interval.is_zero() {
            None
        } else if Handle::try_current().is_ok() {
            Some(spawn_sweep_task(store.clone(), sweep_interval))
        } else {
            warn!("No tokio runtime available, TTL sweep disabled");
            None
        };

        Self {
            store,
            sweeper: Mutex::new(sweeper),
        }
    }

    // == Get ==
    /// Returns the value under `key`, or None if absent or expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    // == Set ==
    /// Stores `value` under `key`, evicting as needed to stay in budget.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.store.write().await.set(key, value);
    }

    // == Delete ==
    /// Removes `key`. Returns true if it was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == Clear ==
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Sweep ==
    /// Runs one expiry sweep now. Returns the number of entries removed.
    pub async fn sweep(&self) -> usize {
        self.store.write().await.remove_expired()
    }

    /// Returns true while the background sweep is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    // == Destroy ==
    /// Stops the sweep task and empties the cache.
    ///
    /// Call once on shutdown; later calls only clear again.
    pub async fn destroy(&self) {
        if self.stop_sweeper() {
            info!("TTL sweep task stopped");
        }
        self.clear().await;
    }
}

impl<V> AdaptiveCache<V> {
    fn stop_sweeper(&self) -> bool {
        let handle = match self.sweeper.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match handle {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl<V> Drop for AdaptiveCache<V> {
    fn drop(&mut self) {
        self.stop_sweeper();
    }
}
