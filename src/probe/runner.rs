//! Probe execution engine.
//!
//! # Responsibilities
//! - Run every check of a probe, in parallel or sequentially with hooks
//! - Isolate each check: one panicking or failing check never prevents the
//!   others from completing or being reported
//! - Enforce an optional probe-wide deadline with cooperative cancellation
//! - Aggregate results into a [`Report`]
//!
//! # Design Decisions
//! - Parallel mode is the default: probe checks are independent I/O and an
//!   HTTP prober wants minimum latency. Sequential mode exists for callers
//!   that need hooks to interleave deterministically with execution, which
//!   concurrency cannot offer
//! - Results are positionally aligned to the probe's declared check order,
//!   never to completion order
//! - Cancellation is future drop: the deadline drops all pending check
//!   invocations, and the panic barrier does not intercept it
//! - The engine never closes cached clients; that is the shutdown path's
//!   job (`crate::lifecycle`)

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::future::{join_all, BoxFuture};
use futures_util::FutureExt;
use tokio::time::timeout;

use crate::checks::HealthCheck;
use crate::error::{HealthError, Result};
use crate::models::{CheckResult, Report};
use crate::probe::Probe;

/// Error detail reported for every check when the probe deadline elapses.
pub const PROBE_TIMED_OUT: &str = "Probe timed out";

/// Hook awaited before a check runs, with the check and its index.
pub type CheckStartHook =
    Box<dyn for<'a> Fn(&'a dyn HealthCheck, usize) -> BoxFuture<'a, ()> + Send + Sync>;

/// Hook awaited after a check completes, with the check, its index, and its
/// result.
pub type CheckEndHook = Box<
    dyn for<'a> Fn(&'a dyn HealthCheck, usize, &'a CheckResult) -> BoxFuture<'a, ()> + Send + Sync,
>;

/// Options for one probe run.
#[derive(Default)]
pub struct RunOptions {
    /// Deadline for the whole run.
    pub timeout: Option<Duration>,

    /// Awaited before each check. Supplying either hook switches the run
    /// to sequential mode.
    pub on_check_start: Option<CheckStartHook>,

    /// Awaited after each check.
    pub on_check_end: Option<CheckEndHook>,

    /// On deadline expiry, report every check as failed instead of
    /// returning an error.
    pub on_timeout_return_failure: bool,
}

impl RunOptions {
    /// Set the probe-wide deadline.
    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        self.timeout = Some(deadline);
        self
    }

    /// Substitute uniform failures for a timeout error on deadline expiry.
    pub fn with_timeout_as_failure(mut self, substitute: bool) -> Self {
        self.on_timeout_return_failure = substitute;
        self
    }

    /// Install a start hook (switches the run to sequential mode).
    pub fn with_check_start_hook(mut self, hook: CheckStartHook) -> Self {
        self.on_check_start = Some(hook);
        self
    }

    /// Install an end hook (switches the run to sequential mode).
    pub fn with_check_end_hook(mut self, hook: CheckEndHook) -> Self {
        self.on_check_end = Some(hook);
        self
    }
}

/// Run every check of a probe and aggregate the results into a [`Report`].
///
/// Without hooks, checks run concurrently; with a hook, they run one at a
/// time in declared order. Either way the report's results follow the
/// probe's declared check order.
///
/// # Errors
///
/// [`HealthError::ProbeTimeout`] when the deadline elapses and
/// `on_timeout_return_failure` is false. Check failures are never errors;
/// they are unhealthy results.
pub async fn run_probe(probe: &Probe, options: RunOptions) -> Result<Report> {
    let results = if options.on_check_start.is_none() && options.on_check_end.is_none() {
        run_parallel(probe, &options).await?
    } else {
        run_sequential(probe, &options).await?
    };
    Ok(Report::new(results, probe.allows_partial_failure()))
}

async fn run_parallel(probe: &Probe, options: &RunOptions) -> Result<Vec<CheckResult>> {
    let batch = join_all(
        probe
            .checks()
            .iter()
            .enumerate()
            .map(|(index, check)| run_check_guarded(check.as_ref(), index)),
    );
    match options.timeout {
        None => Ok(batch.await),
        Some(deadline) => match timeout(deadline, batch).await {
            Ok(results) => Ok(results),
            Err(elapsed) => timed_out(probe, deadline, elapsed, options.on_timeout_return_failure),
        },
    }
}

async fn run_sequential(probe: &Probe, options: &RunOptions) -> Result<Vec<CheckResult>> {
    let ordered = async {
        let mut results = Vec::with_capacity(probe.checks().len());
        for (index, check) in probe.checks().iter().enumerate() {
            if let Some(hook) = &options.on_check_start {
                hook(check.as_ref(), index).await;
            }
            let result = run_check_guarded(check.as_ref(), index).await;
            if let Some(hook) = &options.on_check_end {
                hook(check.as_ref(), index, &result).await;
            }
            results.push(result);
        }
        results
    };
    match options.timeout {
        None => Ok(ordered.await),
        Some(deadline) => match timeout(deadline, ordered).await {
            Ok(results) => Ok(results),
            Err(elapsed) => timed_out(probe, deadline, elapsed, options.on_timeout_return_failure),
        },
    }
}

fn timed_out(
    probe: &Probe,
    deadline: Duration,
    elapsed: tokio::time::error::Elapsed,
    substitute_failures: bool,
) -> Result<Vec<CheckResult>> {
    if substitute_failures {
        tracing::warn!(
            probe = %probe.name(),
            timeout = ?deadline,
            "probe timed out; reporting every check as failed"
        );
        // Every check in the probe, not just the pending ones: the timeout
        // contract is uniform.
        Ok(probe
            .checks()
            .iter()
            .enumerate()
            .map(|(index, check)| {
                CheckResult::unhealthy(display_name(check.as_ref(), index), PROBE_TIMED_OUT)
            })
            .collect())
    } else {
        Err(HealthError::ProbeTimeout {
            timeout: deadline,
            source: elapsed,
        })
    }
}

/// Invoke one check behind the engine-side panic barrier.
///
/// Checks convert their own failures into unhealthy results; this guard
/// exists for checks that do not honor that contract. Cancellation is not
/// intercepted: dropping this future drops the check invocation.
async fn run_check_guarded(check: &dyn HealthCheck, index: usize) -> CheckResult {
    match AssertUnwindSafe(check.invoke()).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let name = display_name(check, index);
            let details = panic_message(panic.as_ref());
            tracing::error!(check = %name, detail = %details, "health check panicked");
            CheckResult::unhealthy(name, details)
        }
    }
}

fn display_name(check: &dyn HealthCheck, index: usize) -> String {
    let name = check.name();
    if name.is_empty() {
        format!("Check-{index}")
    } else {
        name.to_string()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "check panicked".to_string()
    }
}
