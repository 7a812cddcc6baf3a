//! A startup probe that logs which egress identity the proxy presents.

use std::time::Duration;

use serde::Deserialize;

use super::{http::build_client, traits::FetchError};
use crate::config::ProxyConfig;

const IPINFO_URL: &str = "https://ipinfo.io/json";

/// The subset of the ipinfo.io response worth logging.
#[derive(Debug, Deserialize)]
pub struct EgressIdentity {
    /// Public IP the monitor's traffic appears from.
    pub ip: String,

    /// City advertised for that IP.
    pub city: Option<String>,

    /// Region advertised for that IP.
    pub region: Option<String>,

    /// Country advertised for that IP.
    pub country: Option<String>,

    /// Organisation that owns the IP block.
    pub org: Option<String>,
}

/// Fetches and logs the egress identity seen by external services.
///
/// Failures are logged and swallowed: the probe is informational and must
/// never take the monitor down.
pub async fn log_egress_identity(proxy: &ProxyConfig, timeout: Duration) {
    match fetch_egress_identity(IPINFO_URL, proxy, timeout).await {
        Ok(identity) => {
            tracing::info!(
                ip = %identity.ip,
                city = identity.city.as_deref().unwrap_or("unknown"),
                region = identity.region.as_deref().unwrap_or("unknown"),
                country = identity.country.as_deref().unwrap_or("unknown"),
                org = identity.org.as_deref().unwrap_or("unknown"),
                "Egress identity resolved."
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not resolve egress identity.");
        }
    }
}

async fn fetch_egress_identity(
    url: &str,
    proxy: &ProxyConfig,
    timeout: Duration,
) -> Result<EgressIdentity, FetchError> {
    let client = build_client(timeout, proxy)?;
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() { FetchError::Timeout } else { FetchError::Transport(e.to_string()) }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status));
    }

    response.json().await.map_err(|e| FetchError::Decode(e.to_string()))
}
