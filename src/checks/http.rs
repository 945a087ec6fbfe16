//! Health check that performs an HTTP GET against a configured URL.
//!
//! # Responsibilities
//! - One GET per invocation, bounded by the configured timeout
//! - Classify the response status into healthy/unhealthy
//! - Cache the HTTP client across invocations
//! - Optionally reject localhost/private targets, including after DNS
//!   resolution, for URLs sourced from untrusted configuration

use std::net::IpAddr;

use async_trait::async_trait;
use url::Url;

use crate::checks::cache::CachedClient;
use crate::checks::{into_result, CloseableCheck, HealthCheck};
use crate::config::schema::HttpConfig;
use crate::error::{BoxError, HealthError, Result};
use crate::models::CheckResult;

/// Health check for a generic HTTP endpoint.
pub struct HttpHealthCheck {
    config: HttpConfig,
    name: String,
    client: CachedClient<reqwest::Client>,
}

impl HttpHealthCheck {
    /// Build a check from explicit configuration.
    ///
    /// Fails fast when the URL is malformed, uses a non-HTTP scheme, or
    /// names a blocked host while `block_private_hosts` is set.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let parsed = Url::parse(&config.url)
            .map_err(|err| HealthError::dsn(format!("invalid URL {:?}: {err}", config.url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HealthError::dsn(format!(
                "URL scheme must be http or https, got {:?}",
                parsed.scheme()
            )));
        }
        if config.block_private_hosts {
            reject_blocked_literal(&parsed)?;
        }
        Ok(Self {
            config,
            name: "HTTP".to_string(),
            client: CachedClient::new(),
        })
    }

    /// Build a check from a URL string with default options.
    pub fn from_dsn(url: &str) -> Result<Self> {
        let url = crate::config::dsn::validate(url, &["http", "https"])?;
        Self::new(HttpConfig {
            url: url.to_string(),
            ..HttpConfig::default()
        })
    }

    /// Override the check name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn build_client(&self) -> Result<reqwest::Client, BoxError> {
        let mut builder = reqwest::Client::builder().timeout(self.config.timeout);
        if !self.config.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if !self.config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }
        builder.build().map_err(Into::into)
    }

    async fn fetch(&self) -> Result<(), BoxError> {
        if self.config.block_private_hosts {
            reject_blocked_resolved(&self.config.url).await?;
        }
        let client = self.client.ensure(|| async { self.build_client() }).await?;
        let mut request = client.get(&self.config.url);
        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        }
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("unexpected status {status}").into())
        }
    }
}

#[async_trait]
impl HealthCheck for HttpHealthCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self) -> CheckResult {
        let outcome = match tokio::time::timeout(self.config.timeout, self.fetch()).await {
            Ok(outcome) => outcome,
            Err(elapsed) => Err(Box::new(elapsed) as BoxError),
        };
        if outcome.is_err() {
            self.client.invalidate(drop_client).await;
        }
        into_result(&self.name, outcome)
    }

    fn as_closeable(&self) -> Option<&dyn CloseableCheck> {
        Some(self)
    }
}

#[async_trait]
impl CloseableCheck for HttpHealthCheck {
    async fn close(&self) -> Result<()> {
        self.client
            .close(drop_client)
            .await
            .map_err(HealthError::Close)
    }
}

async fn drop_client(client: reqwest::Client) -> Result<(), BoxError> {
    drop(client);
    Ok(())
}

fn is_localhost_name(host: &str) -> bool {
    matches!(
        host.to_ascii_lowercase().as_str(),
        "localhost" | "localhost." | "localhost6" | "localhost6.localdomain6"
    )
}

fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique-local, fe80::/10 link-local
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

fn reject_blocked_literal(url: &Url) -> Result<()> {
    let host = url.host_str().unwrap_or_default();
    if is_localhost_name(host) {
        return Err(HealthError::dsn(
            "URL host must not be localhost when block_private_hosts is set",
        ));
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_blocked_ip(ip) {
            return Err(HealthError::dsn(
                "URL host must not be loopback or private when block_private_hosts is set",
            ));
        }
    }
    Ok(())
}

/// Resolve the URL host and reject private/loopback addresses, so hostnames
/// pointing at internal addresses (internal DNS, DNS rebinding) are caught
/// before the request is made.
async fn reject_blocked_resolved(url: &str) -> Result<(), BoxError> {
    let parsed = Url::parse(url)?;
    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => return Ok(()),
    };
    if is_localhost_name(&host) {
        return Err("URL host must not be localhost when block_private_hosts is set".into());
    }
    let port = parsed.port_or_known_default().unwrap_or(80);
    let addrs = match tokio::net::lookup_host((host.as_str(), port)).await {
        Ok(addrs) => addrs,
        // Resolution failure is left for the request itself to report.
        Err(_) => return Ok(()),
    };
    for addr in addrs {
        if is_blocked_ip(addr.ip()) {
            return Err(
                "URL host must not resolve to loopback or private when block_private_hosts is set"
                    .into(),
            );
        }
    }
    Ok(())
}
