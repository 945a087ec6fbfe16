//! Error definitions for the crate.

use std::time::Duration;

use thiserror::Error;
use tokio::time::error::Elapsed;

/// Boxed error type used at the boundary to backend client libraries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by probe construction and execution.
///
/// Check-level failures are never represented here; they are folded into an
/// unhealthy [`crate::models::CheckResult`] by the check's own barrier.
#[derive(Debug, Error)]
pub enum HealthError {
    /// A connection string failed validation at construction time.
    #[error("invalid DSN: {reason}")]
    InvalidDsn {
        /// What was wrong with the DSN.
        reason: String,
    },

    /// The probe-wide deadline elapsed before every check finished.
    ///
    /// Carries the runtime's timeout error as source, so callers matching on
    /// the generic timeout through the error chain keep working.
    #[error("probe timed out after {timeout:?}")]
    ProbeTimeout {
        /// The deadline that elapsed.
        timeout: Duration,
        #[source]
        source: Elapsed,
    },

    /// A cached client failed to close.
    #[error("client close failed")]
    Close(#[source] BoxError),
}

impl HealthError {
    /// Shorthand for an [`HealthError::InvalidDsn`].
    pub fn dsn(reason: impl Into<String>) -> Self {
        Self::InvalidDsn {
            reason: reason.into(),
        }
    }
}

/// Result type for probe operations.
pub type Result<T, E = HealthError> = std::result::Result<T, E>;
