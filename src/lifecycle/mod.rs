//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown signal (framework hook, signal handler, test teardown)
//!     → close_probes(): every closeable check releases its cached client
//!     → one scheduler yield so deferred transport teardown runs
//! ```
//!
//! # Design Decisions
//! - One check's close failure never prevents the others from closing;
//!   failures are logged and suppressed here (a direct `close()` on a
//!   single check still propagates)
//! - Probe runs never close clients — teardown happens exactly once, at
//!   shutdown, through this module

use futures_util::future::BoxFuture;

use crate::probe::Probe;

/// Close the cached clients of every closeable check in the given probes.
///
/// Close failures are logged and suppressed so shutdown always completes.
/// Yields to the scheduler once after all closes so deferred transport
/// cleanup can run before returning.
pub async fn close_probes(probes: &[Probe]) {
    for probe in probes {
        for check in probe.checks() {
            if let Some(closeable) = check.as_closeable() {
                if let Err(err) = closeable.close().await {
                    tracing::warn!(
                        probe = %probe.name(),
                        check = %check.name(),
                        error = %err,
                        "ignoring close failure during probe shutdown"
                    );
                }
            }
        }
    }
    tokio::task::yield_now().await;
}

/// Build a zero-argument callback that closes the given probes' checks.
///
/// Hand the result to a framework shutdown hook; the probes are captured by
/// value so the callback is self-contained.
pub fn shutdown_callback(
    probes: Vec<Probe>,
) -> impl FnOnce() -> BoxFuture<'static, ()> + Send + 'static {
    move || -> BoxFuture<'static, ()> {
        Box::pin(async move {
            close_probes(&probes).await;
        })
    }
}
