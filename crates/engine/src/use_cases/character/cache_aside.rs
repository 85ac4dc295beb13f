//! Cache-aside helpers.
//!
//! The cache is advisory: a failed read is a miss, a failed write or
//! invalidation is logged and otherwise ignored.

use std::future::Future;

use crate::infrastructure::ports::{CacheError, CacheKey, CharacterCache};

/// Await a cache read, treating errors as misses.
pub(super) async fn probe<T>(
    view: &'static str,
    read: impl Future<Output = Result<Option<T>, CacheError>>,
) -> Option<T> {
    match read.await {
        Ok(Some(value)) => {
            tracing::trace!(view, "Cache hit");
            Some(value)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(view, error = %e, "Cache read failed, falling back to store");
            None
        }
    }
}

/// Await a cache write after a store read.
pub(super) async fn populate(view: &'static str, write: impl Future<Output = Result<(), CacheError>>) {
    if let Err(e) = write.await {
        tracing::warn!(view, error = %e, "Failed to populate cache");
    }
}

pub(super) async fn invalidate(cache: &dyn CharacterCache, keys: &[CacheKey]) {
    if keys.is_empty() {
        return;
    }
    if let Err(e) = cache.invalidate(keys).await {
        tracing::warn!(keys = ?keys, error = %e, "Cache invalidation failed");
    }
}
