//! Reachability probing.
//!
//! The monitor only ever sees a single boolean per tick: probe errors of
//! any kind are absorbed into "unreachable" here and never propagate.

mod http;

pub use http::probe_endpoint;

use std::time::Duration;
use thiserror::Error;

/// Probe error types. Internal to this module; the reduced boolean is
/// the only thing that crosses into detection.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
}

/// Well-known endpoints used when none are configured. Independent
/// operators, so a single origin outage cannot fail every probe.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://www.google.com/generate_204",
    "https://www.cloudflare.com",
];

/// How the monitor loop asks "is the network reachable right now?".
#[allow(async_fn_in_trait)]
pub trait Probe {
    async fn is_reachable(&mut self, timeout: Duration) -> bool;
}

/// HTTP HEAD probe over a list of endpoints.
pub struct HttpProbe {
    client: reqwest::Client,
    endpoints: Vec<String>,
}

impl HttpProbe {
    pub fn new(endpoints: Vec<String>) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProbeError::Network(e.to_string()))?;

        Ok(Self { client, endpoints })
    }
}

impl Probe for HttpProbe {
    /// Try each endpoint in order; the first success short-circuits to
    /// reachable. All failures and timeouts reduce to unreachable.
    async fn is_reachable(&mut self, timeout: Duration) -> bool {
        for endpoint in &self.endpoints {
            match probe_endpoint(&self.client, endpoint, timeout).await {
                Ok(()) => return true,
                Err(e) => tracing::debug!("probe {} failed: {}", endpoint, e),
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn first_success_short_circuits_to_reachable() {
        // A local endpoint that answers one HEAD request; the second
        // endpoint is unreachable, so a true result can only come from
        // the first success winning the reduction.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n")
                .await;
        });

        let mut probe = HttpProbe::new(vec![
            format!("http://{}", addr),
            "http://127.0.0.1:1".to_string(),
        ])
        .unwrap();

        assert!(probe.is_reachable(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn all_endpoints_failing_reduces_to_false() {
        let mut probe = HttpProbe::new(vec![
            "http://127.0.0.1:1".to_string(),
            "http://127.0.0.1:2".to_string(),
        ])
        .unwrap();

        assert!(!probe.is_reachable(Duration::from_millis(200)).await);
    }

    #[tokio::test]
    async fn no_endpoints_is_unreachable() {
        let mut probe = HttpProbe::new(Vec::new()).unwrap();
        assert!(!probe.is_reachable(Duration::from_secs(1)).await);
    }
}
