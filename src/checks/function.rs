//! Health check that runs a user-provided callable.
//!
//! Async callables run on the scheduler; blocking callables are offloaded
//! to the blocking pool so they never stall the runtime.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::checks::{into_result, HealthCheck};
use crate::config::DEFAULT_TIMEOUT;
use crate::error::BoxError;
use crate::models::CheckResult;

type CheckFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// Health check backed by an arbitrary callable.
///
/// The callable is re-invoked on every check run. `Ok(())` is healthy; any
/// error becomes an unhealthy result with the error as detail.
pub struct FunctionHealthCheck {
    name: String,
    func: CheckFn,
    timeout: Duration,
}

impl FunctionHealthCheck {
    /// Check backed by an async callable.
    pub fn new<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(move || Box::pin(func())),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Check backed by a blocking callable, run on the blocking pool.
    pub fn blocking<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Clone + Send + Sync + 'static,
    {
        Self::new(name, move || {
            let func = func.clone();
            async move {
                match tokio::task::spawn_blocking(func).await {
                    Ok(outcome) => outcome,
                    Err(join_error) => Err(Box::new(join_error) as BoxError),
                }
            }
        })
    }

    /// Override the invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl HealthCheck for FunctionHealthCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self) -> CheckResult {
        let outcome = match tokio::time::timeout(self.timeout, (self.func)()).await {
            Ok(outcome) => outcome,
            Err(elapsed) => Err(Box::new(elapsed) as BoxError),
        };
        into_result(&self.name, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_async_function_healthy() {
        let check = FunctionHealthCheck::new("ready", || async { Ok(()) });
        let result = check.invoke().await;
        assert!(result.healthy);
        assert_eq!(result.name, "ready");
    }

    #[tokio::test]
    async fn test_async_function_error_detail() {
        let check =
            FunctionHealthCheck::new("ready", || async { Err::<(), BoxError>("not yet".into()) });
        let result = check.invoke().await;
        assert!(!result.healthy);
        assert_eq!(result.error_details.as_deref(), Some("not yet"));
    }

    #[tokio::test]
    async fn test_blocking_function_runs_off_the_scheduler() {
        let check = FunctionHealthCheck::blocking("disk", || {
            std::thread::sleep(Duration::from_millis(5));
            Ok(())
        });
        assert!(check.invoke().await.healthy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_function_timeout_is_unhealthy() {
        let check = FunctionHealthCheck::new("slow", || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .with_timeout(Duration::from_millis(20));

        let result = check.invoke().await;
        assert!(!result.healthy);
        assert!(result
            .error_details
            .as_deref()
            .unwrap_or_default()
            .contains("elapsed"));
    }
}
