//! Framework-agnostic health checks for async services.
//!
//! A [`Probe`] bundles named checks (databases, brokers, HTTP endpoints,
//! arbitrary callables) behind one liveness/readiness/startup endpoint;
//! [`run_probe`] executes them with per-check isolation and an optional
//! deadline, and [`response::shape_response`] turns the resulting
//! [`Report`] into a status code, headers, and body for any HTTP layer.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use health_probes::checks::function::FunctionHealthCheck;
//! use health_probes::{run_probe, HealthCheck, Probe, RunOptions};
//!
//! # async fn example() -> Result<(), health_probes::HealthError> {
//! let probe = Probe::new(
//!     "readiness",
//!     vec![Arc::new(FunctionHealthCheck::new("always", || async { Ok(()) }))
//!         as Arc<dyn HealthCheck>],
//! );
//! let report = run_probe(&probe, RunOptions::default()).await?;
//! assert!(report.healthy());
//! # Ok(())
//! # }
//! ```

pub mod checks;
pub mod config;
pub mod error;
pub mod integrations;
pub mod lifecycle;
pub mod models;
pub mod probe;
pub mod response;

pub use checks::{CloseableCheck, HealthCheck};
pub use error::{HealthError, Result};
pub use lifecycle::{close_probes, shutdown_callback};
pub use models::{CheckResult, Report};
pub use probe::runner::{run_probe, RunOptions, PROBE_TIMED_OUT};
pub use probe::{route_path, Probe};
pub use response::{default_handler, shape_response, RouteOptions, ShapedResponse};
