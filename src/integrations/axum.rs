//! Axum integration.
//!
//! # Responsibilities
//! - Register one GET route per probe under the configured prefix
//! - Run the probe per request and return the shaped response
//!
//! # Design Decisions
//! - Timeouts always substitute uniform failures here: an HTTP prober
//!   should see a 5xx report, never an error bubbling through the router
//! - Probes are captured in the handlers by `Arc`, so the application can
//!   keep its own clones for `close_probes` at shutdown

use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::models::{CheckResult, Report};
use crate::probe::runner::{run_probe, RunOptions};
use crate::probe::{route_path, Probe};
use crate::response::{shape_response, RouteOptions};

/// Build a router with one GET route per probe at `{prefix}/{probe_name}`.
pub fn health_router(probes: Vec<Probe>, options: RouteOptions) -> Router {
    let options = Arc::new(options);
    let mut router = Router::new();
    for probe in probes {
        let path = route_path(&probe, &options.prefix);
        let probe = Arc::new(probe);
        let options = Arc::clone(&options);
        router = router.route(
            &path,
            get(move || {
                let probe = Arc::clone(&probe);
                let options = Arc::clone(&options);
                async move { probe_response(&probe, &options).await }
            }),
        );
    }
    router
}

async fn probe_response(probe: &Probe, options: &RouteOptions) -> Response {
    let run_options = RunOptions {
        timeout: options.timeout,
        on_timeout_return_failure: true,
        ..RunOptions::default()
    };
    let report = match run_probe(probe, run_options).await {
        Ok(report) => report,
        // Unreachable while timeouts substitute failures; fail closed anyway.
        Err(err) => {
            tracing::error!(probe = %probe.name(), error = %err, "probe execution failed");
            Report::new(
                vec![CheckResult::unhealthy(probe.name(), err.to_string())],
                false,
            )
        }
    };

    let shaped = shape_response(&report, options).await;
    let mut response = Response::new(Body::from(shaped.body));
    *response.status_mut() = shaped.status;
    *response.headers_mut() = shaped.headers;
    response
}
