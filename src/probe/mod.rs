//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! Probe (named bundle of checks + partial-failure policy)
//!     → runner.rs (parallel or sequential execution, timeout, barriers)
//!     → Report
//! ```
//!
//! # Design Decisions
//! - Probes are immutable after construction and cheap to clone: checks
//!   are shared through `Arc`, so routes and shutdown hooks see the same
//!   check instances (and therefore the same cached clients)
//! - Naming and path derivation are deterministic; duplicate probe names
//!   under one prefix are a caller configuration error

pub mod runner;

use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;

use crate::checks::HealthCheck;

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid pattern"));

/// A named group of health checks run together, corresponding to one
/// liveness/readiness/startup endpoint.
#[derive(Clone)]
pub struct Probe {
    name: String,
    checks: Vec<Arc<dyn HealthCheck>>,
    summary: Option<String>,
    allow_partial_failure: bool,
}

impl Probe {
    /// Build a probe over the given checks.
    pub fn new(name: impl Into<String>, checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self {
            name: name.into(),
            checks,
            summary: None,
            allow_partial_failure: false,
        }
    }

    /// Set an explicit human-readable summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Consider the probe healthy when at least one check passes.
    pub fn with_partial_failure(mut self, allow: bool) -> Self {
        self.allow_partial_failure = allow;
        self
    }

    /// Probe name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks in declared order.
    pub fn checks(&self) -> &[Arc<dyn HealthCheck>] {
        &self.checks
    }

    /// Explicit summary, if one was set.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Whether one passing check is enough.
    pub fn allows_partial_failure(&self) -> bool {
        self.allow_partial_failure
    }

    /// Human-readable summary for the endpoint.
    ///
    /// Uses the explicit summary when set; otherwise derives one from the
    /// name: capitalized, runs of non-alphanumerics collapsed to single
    /// spaces, suffixed with `" probe"` (`"readiness"` → `"Readiness
    /// probe"`).
    pub fn endpoint_summary(&self) -> String {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }
        let lowered = self.name.to_lowercase();
        let mut chars = lowered.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
        let title = NON_ALPHANUMERIC_RUN.replace_all(&capitalized, " ");
        format!("{title} probe")
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("checks", &self.checks.len())
            .field("summary", &self.summary)
            .field("allow_partial_failure", &self.allow_partial_failure)
            .finish()
    }
}

/// Route path for a probe under a prefix: prefix without its trailing
/// slash, a slash, then the probe name without its leading slash.
pub fn route_path(probe: &Probe, prefix: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        probe.name().trim_start_matches('/')
    )
}
