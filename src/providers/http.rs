//! An HTTP implementation of the [`PlayerCountSource`] trait.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::traits::{FetchError, PlayerCountSource};
use crate::{config::ProxyConfig, models::Sample};

/// Builds the `reqwest` client used for metric traffic, routed through the
/// SOCKS5 proxy when one is configured.
pub(super) fn build_client(
    timeout: Duration,
    proxy: &ProxyConfig,
) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder().timeout(timeout);
    if let Some(proxy_url) = proxy.url().map_err(|e| FetchError::ClientBuild(e.to_string()))? {
        let proxy =
            reqwest::Proxy::all(proxy_url).map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        builder = builder.proxy(proxy);
    }
    builder.build().map_err(|e| FetchError::ClientBuild(e.to_string()))
}

/// A player-count source backed by a plain HTTP JSON endpoint.
///
/// Fetches carry no retry policy: a failed tick is dropped and the next one
/// starts from a clean slate one interval later.
pub struct HttpPlayerCountSource {
    /// Endpoint queried on every tick.
    target_url: Url,

    /// The HTTP client used for fetches.
    client: reqwest::Client,
}

impl HttpPlayerCountSource {
    /// Creates a new source for the given endpoint.
    pub fn new(
        target_url: Url,
        timeout: Duration,
        proxy: &ProxyConfig,
    ) -> Result<Self, FetchError> {
        let client = build_client(timeout, proxy)?;
        Ok(Self { target_url, client })
    }

    /// Extracts the player count from a response body.
    ///
    /// A body without the `online_user` key is treated as zero players: the
    /// upstream API drops the field entirely while the server is down.
    fn parse_count(body: &Value) -> Result<u64, FetchError> {
        match body.get("online_user") {
            None | Some(Value::Null) => Ok(0),
            Some(Value::Number(n)) => n.as_u64().ok_or_else(|| FetchError::Field(n.to_string())),
            Some(Value::String(s)) => {
                s.trim().parse::<u64>().map_err(|_| FetchError::Field(s.clone()))
            }
            Some(other) => Err(FetchError::Field(other.to_string())),
        }
    }
}

#[async_trait]
impl PlayerCountSource for HttpPlayerCountSource {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn fetch(&self) -> Result<Sample, FetchError> {
        let response = self.client.get(self.target_url.clone()).send().await.map_err(|e| {
            if e.is_timeout() { FetchError::Timeout } else { FetchError::Transport(e.to_string()) }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() { FetchError::Timeout } else { FetchError::Decode(e.to_string()) }
        })?;

        let count = Self::parse_count(&body)?;
        Ok(Sample::now(count))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn source_for(server: &mockito::ServerGuard) -> HttpPlayerCountSource {
        let url = Url::parse(&server.url()).unwrap();
        HttpPlayerCountSource::new(url, Duration::from_secs(5), &ProxyConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_count_accepts_number_and_string() {
        assert_eq!(
            HttpPlayerCountSource::parse_count(&json!({"online_user": 31337})).unwrap(),
            31337
        );
        assert_eq!(
            HttpPlayerCountSource::parse_count(&json!({"online_user": "20500"})).unwrap(),
            20500
        );
    }

    #[test]
    fn test_parse_count_missing_field_means_zero() {
        assert_eq!(HttpPlayerCountSource::parse_count(&json!({"world_count": 81})).unwrap(), 0);
        assert_eq!(HttpPlayerCountSource::parse_count(&json!({"online_user": null})).unwrap(), 0);
    }

    #[test]
    fn test_parse_count_rejects_garbage() {
        let result = HttpPlayerCountSource::parse_count(&json!({"online_user": "soon"}));
        assert!(matches!(result, Err(FetchError::Field(_))));

        let result = HttpPlayerCountSource::parse_count(&json!({"online_user": -3}));
        assert!(matches!(result, Err(FetchError::Field(_))));

        let result = HttpPlayerCountSource::parse_count(&json!({"online_user": {"now": 3}}));
        assert!(matches!(result, Err(FetchError::Field(_))));
    }

    #[tokio::test]
    async fn test_fetch_returns_stamped_sample() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"online_user": "31337", "world_count": 81}"#)
            .create_async()
            .await;

        let before = chrono::Utc::now();
        let sample = source_for(&server).fetch().await.unwrap();

        assert_eq!(sample.count, 31337);
        assert!(sample.timestamp >= before);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_maps_server_errors_to_http_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/").with_status(502).create_async().await;

        let result = source_for(&server).fetch().await;

        assert!(matches!(
            result,
            Err(FetchError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_maps_bad_body_to_decode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("under maintenance")
            .create_async()
            .await;

        let result = source_for(&server).fetch().await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
        mock.assert_async().await;
    }

    #[test]
    fn test_new_rejects_unusable_proxy() {
        let proxy = ProxyConfig {
            enabled: true,
            host: "not a host".to_string(),
            port: 1080,
            username: None,
            password: None,
        };
        let url = Url::parse("https://api.example.com/players").unwrap();

        let result = HttpPlayerCountSource::new(url, Duration::from_secs(5), &proxy);
        assert!(matches!(result, Err(FetchError::ClientBuild(_))));
    }
}
