//! Time-based access token cache.
//!
//! The UI backend hands out short-lived bearer tokens on top of the
//! cookie session. Refreshing is guarded by a mutex so concurrent callers
//! never race to refresh simultaneously: whoever arrives during a refresh
//! waits for it, then re-checks freshness instead of refreshing again.

use std::future::Future;
use std::sync::RwLock;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::core::error::Result;

/// Caches the bearer token and decides when it must be re-fetched.
#[derive(Debug)]
pub(crate) struct TokenCache {
    lifetime: Duration,
    /// Instant of the last successful fetch; `None` until the first one.
    /// Holding this lock serializes refreshes.
    last_fetched: Mutex<Option<tokio::time::Instant>>,
    token: RwLock<Option<String>>,
}

impl TokenCache {
    pub(crate) fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            last_fetched: Mutex::new(None),
            token: RwLock::new(None),
        }
    }

    /// Returns the current token, if one has been fetched.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Runs `fetch` if the token is stale, was never fetched, or `force`
    /// is set. A fetch that succeeds without a token (a response shape
    /// without one) still counts as a refresh; the absence is the
    /// caller's to log.
    pub(crate) async fn refresh_with<F, Fut>(&self, force: bool, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<String>>>,
    {
        let mut last_fetched = self.last_fetched.lock().await;
        let fresh = !force
            && last_fetched.is_some_and(|at| at.elapsed() <= self.lifetime);
        if fresh {
            return Ok(());
        }

        let token = fetch().await?;
        if let Some(token) = token {
            *self
                .token
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
        }
        *last_fetched = Some(tokio::time::Instant::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting_fetch(counter: &Arc<AtomicU32>) -> impl Future<Output = Result<Option<String>>> {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some("token".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn second_refresh_within_lifetime_is_a_no_op() {
        let cache = TokenCache::new(Duration::from_secs(300));
        let fetches = Arc::new(AtomicU32::new(0));

        cache
            .refresh_with(false, || counting_fetch(&fetches))
            .await
            .unwrap();
        cache
            .refresh_with(false, || counting_fetch(&fetches))
            .await
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.bearer().as_deref(), Some("token"));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_token_is_refetched() {
        let cache = TokenCache::new(Duration::from_secs(300));
        let fetches = Arc::new(AtomicU32::new(0));

        cache
            .refresh_with(false, || counting_fetch(&fetches))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        cache
            .refresh_with(false, || counting_fetch(&fetches))
            .await
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn force_refreshes_a_fresh_token() {
        let cache = TokenCache::new(Duration::from_secs(300));
        let fetches = Arc::new(AtomicU32::new(0));

        cache
            .refresh_with(false, || counting_fetch(&fetches))
            .await
            .unwrap();
        cache
            .refresh_with(true, || counting_fetch(&fetches))
            .await
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokenless_success_counts_as_refresh() {
        let cache = TokenCache::new(Duration::from_secs(300));
        let fetches = Arc::new(AtomicU32::new(0));

        {
            let fetches = Arc::clone(&fetches);
            cache
                .refresh_with(false, move || async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .await
                .unwrap();
        }
        assert!(cache.bearer().is_none());

        // Still fresh, so no second fetch.
        cache
            .refresh_with(false, || counting_fetch(&fetches))
            .await
            .unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_does_not_mark_fresh() {
        let cache = TokenCache::new(Duration::from_secs(300));

        let result = cache
            .refresh_with(false, || async {
                Err(crate::core::error::SandboxError::auth("login expired"))
            })
            .await;
        assert!(result.is_err());

        let fetches = Arc::new(AtomicU32::new(0));
        cache
            .refresh_with(false, || counting_fetch(&fetches))
            .await
            .unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
