use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Errors produced while resolving the outbound proxy descriptor.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The host/port pair did not form a valid URL.
    #[error("Invalid proxy address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    /// The configured credentials cannot be carried in a URL.
    #[error("Invalid proxy credentials")]
    InvalidCredentials,
}

/// Optional SOCKS5 proxy for all outbound metric traffic.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProxyConfig {
    /// Whether outbound requests are routed through the proxy.
    #[serde(default)]
    pub enabled: bool,

    /// Proxy host name or address.
    #[serde(default)]
    pub host: String,

    /// Proxy port.
    #[serde(default)]
    pub port: u16,

    /// Optional proxy username.
    #[serde(default)]
    pub username: Option<String>,

    /// Optional proxy password. Ignored without a username.
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Resolves the configuration into a `socks5://` URL, or `None` when the
    /// proxy is disabled.
    pub fn url(&self) -> Result<Option<Url>, ProxyError> {
        if !self.enabled {
            return Ok(None);
        }

        let mut url = Url::parse(&format!("socks5://{}:{}", self.host, self.port))?;
        if let Some(username) = &self.username {
            url.set_username(username).map_err(|_| ProxyError::InvalidCredentials)?;
            if let Some(password) = &self.password {
                url.set_password(Some(password)).map_err(|_| ProxyError::InvalidCredentials)?;
            }
        }

        Ok(Some(url))
    }
}
