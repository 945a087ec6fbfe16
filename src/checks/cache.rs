//! Cached client lifecycle shared by checks that keep a long-lived client.
//!
//! # Design Decisions
//! - One mutex-guarded slot per check instance; checks never share clients
//! - The mutex stays held across client construction and close, so two
//!   concurrent invocations of the same check can never build two clients
//! - The factory and closer are supplied per call, letting each backend
//!   borrow its own configuration without boxed state

use std::future::Future;

use tokio::sync::Mutex;

use crate::error::BoxError;

/// Lazily created, mutex-guarded client slot.
///
/// `T` must be cheap to clone — every supported backend client is a handle
/// over shared internals.
#[derive(Debug, Default)]
pub struct CachedClient<T> {
    slot: Mutex<Option<T>>,
}

impl<T: Clone> CachedClient<T> {
    /// An empty slot.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached client, creating one via `factory` if the slot is
    /// empty.
    ///
    /// Safe to call concurrently: the slot mutex serializes creators, so at
    /// most one client is ever under construction for this instance.
    pub async fn ensure<F, Fut>(&self, factory: F) -> Result<T, BoxError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, BoxError>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = factory().await?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Close and clear the cached client, swallowing the close failure.
    ///
    /// Used after a failed invocation so a poisoned connection is not
    /// reused; the failure that triggered the invalidation must stay the
    /// one the caller sees.
    pub async fn invalidate<F, Fut>(&self, closer: F)
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), BoxError>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(client) = slot.take() {
            if let Err(err) = closer(client).await {
                tracing::warn!(error = %err, "ignoring close failure while discarding cached client");
            }
        }
    }

    /// Close and clear the cached client, propagating the close failure.
    ///
    /// Yields to the scheduler once afterwards so deferred transport
    /// teardown scheduled by the close can run before the caller proceeds.
    pub async fn close<F, Fut>(&self, closer: F) -> Result<(), BoxError>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), BoxError>>,
    {
        let outcome = {
            let mut slot = self.slot.lock().await;
            match slot.take() {
                Some(client) => closer(client).await,
                None => Ok(()),
            }
        };
        tokio::task::yield_now().await;
        outcome
    }

    /// Whether a client is currently cached. Test and introspection aid.
    pub async fn is_cached(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    async fn noop_close(_client: Arc<u32>) -> Result<(), BoxError> {
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let cache = CachedClient::new();
        let built = AtomicUsize::new(0);
        let factory = || async {
            built.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(7u32))
        };

        let first = cache.ensure(factory).await.unwrap();
        let second = cache.ensure(factory).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_ensure_builds_once() {
        let cache = Arc::new(CachedClient::new());
        let built = Arc::new(AtomicUsize::new(0));

        let factory = {
            let built = Arc::clone(&built);
            move || {
                let built = Arc::clone(&built);
                async move {
                    tokio::task::yield_now().await;
                    built.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(7u32))
                }
            }
        };

        let (first, second) = tokio::join!(cache.ensure(factory.clone()), cache.ensure(factory));
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_clears_and_swallows() {
        let cache = CachedClient::new();
        cache
            .ensure(|| async { Ok(Arc::new(1u32)) })
            .await
            .unwrap();

        cache
            .invalidate(|_client| async { Err::<(), BoxError>("close failed".into()) })
            .await;
        assert!(!cache.is_cached().await);
    }

    #[tokio::test]
    async fn test_close_propagates_and_clears() {
        let cache = CachedClient::new();
        cache
            .ensure(|| async { Ok(Arc::new(1u32)) })
            .await
            .unwrap();

        let err = cache
            .close(|_client| async { Err::<(), BoxError>("close failed".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "close failed");
        assert!(!cache.is_cached().await);

        // A second close finds nothing and succeeds.
        assert!(cache.close(noop_close).await.is_ok());
    }

    #[tokio::test]
    async fn test_factory_error_leaves_slot_empty() {
        let cache: CachedClient<Arc<u32>> = CachedClient::new();
        let outcome = cache
            .ensure(|| async { Err::<Arc<u32>, BoxError>("refused".into()) })
            .await;
        assert!(outcome.is_err());
        assert!(!cache.is_cached().await);
    }
}
