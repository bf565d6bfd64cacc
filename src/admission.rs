//! Admission Module
//!
//! Composes a quota group and a cache around an upstream call: check quota,
//! serve from cache on a hit, otherwise reserve a slot, call upstream and
//! cache the result.

use std::future::Future;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::AdaptiveCache;
use crate::error::{GuardError, Result};
use crate::limiter::QuotaGroup;

// == Quota Denial ==
/// Builds the error returned when `quota` denies admission.
///
/// Returns None if every limiter currently admits.
pub fn quota_denial(quota: &mut QuotaGroup) -> Option<GuardError> {
    let retry_after = quota.time_until_next_slot();
    let blocking = quota.blocking_limiter_mut()?;

    Some(GuardError::QuotaExceeded {
        name: blocking.name().to_string(),
        limit: blocking.limit(),
        window: blocking.window(),
        retry_after,
    })
}

// == Reserve ==
/// Takes one slot on every limiter of `quota`, or returns the denial.
///
/// Check and record happen under one write lock, so concurrent callers can
/// never claim more slots than the tightest limiter has left.
pub async fn reserve(quota: &RwLock<QuotaGroup>) -> Result<()> {
    let mut quota = quota.write().await;
    if quota.try_proceed() {
        return Ok(());
    }

    Err(quota_denial(&mut quota)
        .unwrap_or_else(|| GuardError::Internal("Quota denied without a blocking limiter".to_string())))
}

// == Fetch Through ==
/// Returns the cached value for `key`, or fetches, records and caches it.
///
/// Quota is checked before the cache, as collaborators expect; a cache hit
/// consumes no quota. On a miss a slot is reserved before the upstream call,
/// and kept even if the call fails, since the call was still made.
pub async fn fetch_through<V, F, Fut>(
    cache: &AdaptiveCache<V>,
    quota: &RwLock<QuotaGroup>,
    key: &str,
    fetch: F,
) -> Result<V>
where
    V: Clone + Serialize + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V>>,
{
    {
        let mut quota_guard = quota.write().await;
        if let Some(denial) = quota_denial(&mut quota_guard) {
            return Err(denial);
        }
    }

    if let Some(value) = cache.get(key).await {
        debug!(key, "Served from cache");
        return Ok(value);
    }

    if let Err(denial) = reserve(quota).await {
        warn!(key, error = %denial, "Quota taken by a concurrent caller");
        return Err(denial);
    }

    let value = fetch().await?;
    cache.set(key, value.clone()).await;

    Ok(value)
}
