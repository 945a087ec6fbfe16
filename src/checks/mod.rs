//! Health check subsystem.
//!
//! # Data Flow
//! ```text
//! Probe runner
//!     → HealthCheck::invoke() (one per check, concurrent or sequential)
//!     → backend round-trip behind the check's own error barrier
//!     → CheckResult
//!
//! Shutdown
//!     → HealthCheck::as_closeable()
//!     → CloseableCheck::close() (cached clients released)
//! ```
//!
//! # Design Decisions
//! - `invoke` is infallible by contract: every backend failure is folded
//!   into an unhealthy result inside the check; only panics and
//!   cancellation escape, and the runner guards against the former
//! - Closing is a separate narrow capability; checks without a cached
//!   client simply never surface it

pub mod cache;
pub mod function;

#[cfg(feature = "http-check")]
pub mod http;
#[cfg(feature = "kafka")]
pub mod kafka;
#[cfg(feature = "mongodb")]
pub mod mongo;
#[cfg(feature = "opensearch")]
pub mod opensearch;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "rabbitmq")]
pub mod rabbitmq;
#[cfg(feature = "redis")]
pub mod redis;

use async_trait::async_trait;

use crate::error::{BoxError, Result};
use crate::models::CheckResult;

/// A unit operation verifying one dependency or condition.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Name reported in results.
    fn name(&self) -> &str;

    /// Run the check once.
    ///
    /// Implementations must not let failures escape: anything short of a
    /// panic or cancellation becomes an unhealthy [`CheckResult`].
    async fn invoke(&self) -> CheckResult;

    /// Surface the close capability, for checks holding a cached client.
    fn as_closeable(&self) -> Option<&dyn CloseableCheck> {
        None
    }
}

/// Capability of checks that hold a closeable cached client.
#[async_trait]
pub trait CloseableCheck: Send + Sync {
    /// Close the cached client, propagating the failure to the caller.
    async fn close(&self) -> Result<()>;
}

/// Fold a round-trip outcome into a [`CheckResult`].
///
/// The error chain is rendered in full so operators see the root cause, not
/// just the outermost wrapper.
pub(crate) fn into_result(name: &str, outcome: Result<(), BoxError>) -> CheckResult {
    match outcome {
        Ok(()) => CheckResult::healthy(name),
        Err(err) => {
            tracing::warn!(check = %name, error = %err, "health check failed");
            CheckResult::unhealthy(name, describe_error(err.as_ref()))
        }
    }
}

/// Render an error and its source chain as one line.
pub(crate) fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
