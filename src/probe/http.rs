//! HTTP probe implementation.

use std::time::Duration;

use super::ProbeError;

/// Issue a HEAD request against a single endpoint.
///
/// Any response at all counts as reachable; the status code does not
/// matter, only that the network round-trip completed.
pub async fn probe_endpoint(
    client: &reqwest::Client,
    address: &str,
    timeout: Duration,
) -> Result<(), ProbeError> {
    let url = if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("https://{}", address)
    };

    client
        .head(&url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout(timeout)
            } else {
                ProbeError::Network(e.to_string())
            }
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_invalid_host_fails() {
        let client = reqwest::Client::new();
        let result = probe_endpoint(&client, "http://256.256.256.256", Duration::from_millis(100)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let client = reqwest::Client::new();
        let result = probe_endpoint(&client, "http://127.0.0.1:1", Duration::from_millis(200)).await;
        assert!(matches!(result, Err(ProbeError::Network(_))));
    }
}
