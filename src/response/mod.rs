//! Response shaping.
//!
//! # Responsibilities
//! - Turn a [`Report`] plus route options into status code, headers, and
//!   body, independent of any web framework
//! - Keep operational detail (`allow_partial_failure`, `error_details`)
//!   out of responses unless debug mode opts in
//!
//! # Design Decisions
//! - Bodies are compact JSON; `content-type` and `content-length` are set
//!   whenever a body is produced
//! - 204 and 304 never carry a body; neither does a healthy response with
//!   an informational (1xx) success status
//! - debug + unhealthy returns the full serialized report: diagnosability
//!   wins over minimalism exactly when an operator is looking

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde_json::{json, Value};

use crate::models::Report;

/// Report data handed to a response handler.
#[derive(Debug, Clone)]
pub struct ReportView {
    /// Serialized report, already filtered for the debug setting.
    pub data: Value,

    /// Overall verdict of the report.
    pub healthy: bool,
}

/// Async handler producing an optional JSON body from a report view.
pub type ResponseHandler = Arc<dyn Fn(ReportView) -> BoxFuture<'static, Option<Value>> + Send + Sync>;

/// Default body handler: a minimal `{"status": ...}` payload.
pub fn default_handler(view: ReportView) -> BoxFuture<'static, Option<Value>> {
    Box::pin(async move {
        Some(json!({
            "status": if view.healthy { "healthy" } else { "unhealthy" }
        }))
    })
}

/// Options for probe routes: handlers, status codes, debug flag, path
/// prefix, and probe timeout. Built once, shared read-only across requests.
#[derive(Clone)]
pub struct RouteOptions {
    /// Handler invoked for healthy reports.
    pub success_handler: ResponseHandler,

    /// Handler invoked for unhealthy reports.
    pub failure_handler: ResponseHandler,

    /// Status code for healthy reports.
    pub success_status: StatusCode,

    /// Status code for unhealthy reports.
    pub failure_status: StatusCode,

    /// Include diagnostic fields and full failure reports in responses.
    pub debug: bool,

    /// Path prefix for probe routes.
    pub prefix: String,

    /// Probe-wide deadline applied per request.
    pub timeout: Option<Duration>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            success_handler: Arc::new(default_handler),
            failure_handler: Arc::new(default_handler),
            success_status: StatusCode::NO_CONTENT,
            failure_status: StatusCode::SERVICE_UNAVAILABLE,
            debug: false,
            prefix: "/health".to_string(),
            timeout: None,
        }
    }
}

impl RouteOptions {
    /// Override the success status code.
    pub fn with_success_status(mut self, status: StatusCode) -> Self {
        self.success_status = status;
        self
    }

    /// Override the failure status code.
    pub fn with_failure_status(mut self, status: StatusCode) -> Self {
        self.failure_status = status;
        self
    }

    /// Toggle debug responses.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Override the path prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the per-request probe deadline.
    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        self.timeout = Some(deadline);
        self
    }

    /// Override the handler invoked for healthy reports.
    pub fn with_success_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(ReportView) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Option<Value>> + Send + 'static,
    {
        self.success_handler = Arc::new(move |view| Box::pin(handler(view)));
        self
    }

    /// Override the handler invoked for unhealthy reports.
    pub fn with_failure_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(ReportView) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Option<Value>> + Send + 'static,
    {
        self.failure_handler = Arc::new(move |view| Box::pin(handler(view)));
        self
    }
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("success_status", &self.success_status)
            .field("failure_status", &self.failure_status)
            .field("debug", &self.debug)
            .field("prefix", &self.prefix)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A shaped probe response, ready to hand to any HTTP layer.
#[derive(Debug, Clone)]
pub struct ShapedResponse {
    /// Response body; empty when no body is warranted.
    pub body: Vec<u8>,

    /// Headers; empty when no body is warranted.
    pub headers: HeaderMap,

    /// Response status.
    pub status: StatusCode,
}

/// Serialize a report for responses.
///
/// Outside debug mode, `allow_partial_failure` and `error_details` are
/// excluded: they are operational detail that would leak internal state to
/// unauthenticated health-check callers.
pub fn report_data(report: &Report, debug: bool) -> Value {
    if debug {
        serde_json::to_value(report).unwrap_or(Value::Null)
    } else {
        json!({
            "results": report
                .results
                .iter()
                .map(|result| json!({"name": result.name, "healthy": result.healthy}))
                .collect::<Vec<_>>(),
        })
    }
}

/// Shape a report into status code, headers, and body.
pub async fn shape_response(report: &Report, options: &RouteOptions) -> ShapedResponse {
    let healthy = report.healthy();
    let status = if healthy {
        options.success_status
    } else {
        options.failure_status
    };

    let body_expected = !(status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED
        || (healthy && status.is_informational()));

    let mut body = Vec::new();
    let mut headers = HeaderMap::new();
    if body_expected {
        let data = report_data(report, options.debug);
        let content = if options.debug && !healthy {
            // Full report, so logs and assertions show which check failed.
            Some(data)
        } else {
            let handler = if healthy {
                &options.success_handler
            } else {
                &options.failure_handler
            };
            handler(ReportView { data, healthy }).await
        };
        if let Some(content) = content {
            body = serde_json::to_vec(&content).unwrap_or_default();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }
    }

    ShapedResponse {
        body,
        headers,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckResult;

    fn healthy_report() -> Report {
        Report::new(vec![CheckResult::healthy("a")], false)
    }

    fn unhealthy_report() -> Report {
        Report::new(
            vec![
                CheckResult::healthy("a"),
                CheckResult::unhealthy("b", "connection refused"),
            ],
            false,
        )
    }

    #[tokio::test]
    async fn test_healthy_default_is_204_without_body() {
        let shaped = shape_response(&healthy_report(), &RouteOptions::default()).await;
        assert_eq!(shaped.status, StatusCode::NO_CONTENT);
        assert!(shaped.body.is_empty());
        assert!(shaped.headers.is_empty());
    }

    #[tokio::test]
    async fn test_unhealthy_default_is_503_with_status_body() {
        let shaped = shape_response(&unhealthy_report(), &RouteOptions::default()).await;
        assert_eq!(shaped.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(shaped.body, br#"{"status":"unhealthy"}"#);
        assert_eq!(
            shaped.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            shaped.headers.get(CONTENT_LENGTH).unwrap(),
            &shaped.body.len().to_string()
        );
    }

    #[tokio::test]
    async fn test_healthy_with_body_status_gets_minimal_payload() {
        let options = RouteOptions::default().with_success_status(StatusCode::OK);
        let shaped = shape_response(&healthy_report(), &options).await;
        assert_eq!(shaped.status, StatusCode::OK);
        assert_eq!(shaped.body, br#"{"status":"healthy"}"#);
    }

    #[tokio::test]
    async fn test_informational_success_has_no_body() {
        let options = RouteOptions::default().with_success_status(StatusCode::CONTINUE);
        let shaped = shape_response(&healthy_report(), &options).await;
        assert_eq!(shaped.status, StatusCode::CONTINUE);
        assert!(shaped.body.is_empty());
    }

    #[tokio::test]
    async fn test_debug_unhealthy_returns_full_report() {
        let options = RouteOptions::default().with_debug(true);
        let shaped = shape_response(&unhealthy_report(), &options).await;
        let value: Value = serde_json::from_slice(&shaped.body).unwrap();
        assert_eq!(value["allow_partial_failure"], json!(false));
        assert_eq!(value["results"][1]["error_details"], json!("connection refused"));
    }

    #[tokio::test]
    async fn test_non_debug_data_excludes_diagnostics() {
        let data = report_data(&unhealthy_report(), false);
        assert!(data.get("allow_partial_failure").is_none());
        assert!(data["results"][1].get("error_details").is_none());
        assert_eq!(data["results"][1]["healthy"], json!(false));
    }

    #[tokio::test]
    async fn test_handler_returning_none_suppresses_body() {
        let options = RouteOptions::default()
            .with_failure_handler(|_view| async { None });
        let shaped = shape_response(&unhealthy_report(), &options).await;
        assert_eq!(shaped.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(shaped.body.is_empty());
        assert!(shaped.headers.is_empty());
    }

    #[tokio::test]
    async fn test_custom_handler_sees_filtered_data() {
        let options = RouteOptions::default().with_failure_handler(|view: ReportView| async move {
            Some(json!({"checks": view.data["results"].as_array().map(Vec::len).unwrap_or(0)}))
        });
        let shaped = shape_response(&unhealthy_report(), &options).await;
        assert_eq!(shaped.body, br#"{"checks":2}"#);
    }
}
