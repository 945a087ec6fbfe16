//! Core value types shared by every subsystem.
//!
//! A [`CheckResult`] is produced once per check invocation and never mutated;
//! a [`Report`] wraps the results of one probe run together with the probe's
//! partial-failure policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a single health check invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the health check.
    pub name: String,

    /// Whether the check passed.
    pub healthy: bool,

    /// Diagnostic details when the check failed.
    pub error_details: Option<String>,
}

impl CheckResult {
    /// A passing result.
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: true,
            error_details: None,
        }
    }

    /// A failing result with diagnostic details.
    pub fn unhealthy(name: impl Into<String>, error_details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: false,
            error_details: Some(error_details.into()),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name,
            if self.healthy { "healthy" } else { "unhealthy" }
        )
    }
}

/// Aggregated outcome of running a probe once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Results in the probe's declared check order.
    pub results: Vec<CheckResult>,

    /// If true, the report is healthy when at least one check passed.
    pub allow_partial_failure: bool,
}

impl Report {
    /// Build a report from check results and a partial-failure policy.
    pub fn new(results: Vec<CheckResult>, allow_partial_failure: bool) -> Self {
        Self {
            results,
            allow_partial_failure,
        }
    }

    /// Overall health verdict.
    ///
    /// With partial failure allowed: healthy iff at least one result passed
    /// (false for zero checks). Otherwise: healthy iff every result passed
    /// (vacuously true for zero checks).
    pub fn healthy(&self) -> bool {
        if self.allow_partial_failure {
            self.results.iter().any(|result| result.healthy)
        } else {
            self.results.iter().all(|result| result.healthy)
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for result in &self.results {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{result}")?;
            first = false;
        }
        Ok(())
    }
}
