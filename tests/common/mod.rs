//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use health_probes::{CheckResult, CloseableCheck, HealthCheck, HealthError, Probe};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// What a [`ScriptedCheck`] does when invoked.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Behavior {
    /// Return a healthy result immediately.
    Healthy,
    /// Return an unhealthy result with the given detail.
    Unhealthy(&'static str),
    /// Panic with the given message.
    Panic(&'static str),
    /// Sleep for the duration, then return a healthy result.
    SleepThenHealthy(Duration),
}

/// Check with scripted behavior and an invocation counter.
pub struct ScriptedCheck {
    name: &'static str,
    behavior: Behavior,
    invocations: AtomicUsize,
}

impl ScriptedCheck {
    pub fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name,
            behavior,
            invocations: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthCheck for ScriptedCheck {
    fn name(&self) -> &str {
        self.name
    }

    async fn invoke(&self) -> CheckResult {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Healthy => CheckResult::healthy(self.name),
            Behavior::Unhealthy(detail) => CheckResult::unhealthy(self.name, *detail),
            Behavior::Panic(message) => panic!("{}", message),
            Behavior::SleepThenHealthy(duration) => {
                tokio::time::sleep(*duration).await;
                CheckResult::healthy(self.name)
            }
        }
    }
}

/// Closeable check that counts close calls and can be told to fail them.
pub struct ClosingCheck {
    name: &'static str,
    fail_close: bool,
    close_calls: Arc<AtomicUsize>,
}

impl ClosingCheck {
    #[allow(dead_code)]
    pub fn new(name: &'static str, fail_close: bool) -> (Arc<Self>, Arc<AtomicUsize>) {
        let close_calls = Arc::new(AtomicUsize::new(0));
        let check = Arc::new(Self {
            name,
            fail_close,
            close_calls: Arc::clone(&close_calls),
        });
        (check, close_calls)
    }
}

#[async_trait]
impl HealthCheck for ClosingCheck {
    fn name(&self) -> &str {
        self.name
    }

    async fn invoke(&self) -> CheckResult {
        CheckResult::healthy(self.name)
    }

    fn as_closeable(&self) -> Option<&dyn CloseableCheck> {
        Some(self)
    }
}

#[async_trait]
impl CloseableCheck for ClosingCheck {
    async fn close(&self) -> Result<(), HealthError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(HealthError::Close("close exploded".into()))
        } else {
            Ok(())
        }
    }
}

/// Build a probe over already-arced checks.
pub fn probe_of(name: &str, checks: Vec<Arc<dyn HealthCheck>>) -> Probe {
    Probe::new(name, checks)
}

/// Start a mock HTTP backend on an ephemeral port, returning its address.
///
/// Every connection receives the given status line and body, then the
/// socket is closed.
#[allow(dead_code)]
pub async fn start_mock_backend(
    status_line: &'static str,
    body: &'static str,
) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
