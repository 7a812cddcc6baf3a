use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

use super::{
    HttpRetryConfig, ProxyConfig, ServerConfig, deserialize_duration_from_seconds,
    serialize_duration_to_seconds,
};
use crate::models::{ActivityKind, Destination};

/// Provides the default value for poll_interval_secs.
fn default_poll_interval() -> Duration {
    Duration::from_secs(60)
}

/// Provides the default value for fetch_timeout_secs.
fn default_fetch_timeout() -> Duration {
    Duration::from_secs(15)
}

/// Provides the default value for shutdown_timeout.
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Provides the default value for history_path.
fn default_history_path() -> PathBuf {
    PathBuf::from("database.json")
}

/// Provides the default value for chart_path.
fn default_chart_path() -> PathBuf {
    PathBuf::from("chart.png")
}

/// Provides the default value for discord_api_base.
fn default_discord_api_base() -> Url {
    Url::parse("https://discord.com/api/v10").expect("static URL is valid")
}

/// Provides the default value for command_channel_capacity.
fn default_command_channel_capacity() -> u32 {
    32
}

/// Application configuration for Headcount.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Endpoint that reports the current online-player count.
    pub target_url: Url,

    /// Bot token used to authenticate against the chat API.
    pub bot_token: String,

    /// User id allowed to issue the restart command.
    pub owner_id: u64,

    /// Fan-out targets, each processed independently every tick.
    pub destinations: Vec<Destination>,

    /// Base URL of the chat REST API.
    #[serde(default = "default_discord_api_base")]
    pub discord_api_base: Url,

    /// The interval in seconds between polling ticks.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds",
        default = "default_poll_interval"
    )]
    pub poll_interval_secs: Duration,

    /// The timeout in seconds for a single metric fetch.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds",
        default = "default_fetch_timeout"
    )]
    pub fetch_timeout_secs: Duration,

    /// Path of the persisted sample history.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Path the rendered chart is written to.
    #[serde(default = "default_chart_path")]
    pub chart_path: PathBuf,

    /// Optional SOCKS5 proxy for metric traffic.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Retry policy for chat dispatch.
    #[serde(default)]
    pub http_retry_config: HttpRetryConfig,

    /// Activity kind advertised by the presence indicator.
    #[serde(default)]
    pub presence_activity: ActivityKind,

    /// Optional footer line attached to on-demand reports.
    #[serde(default)]
    pub report_footer: Option<String>,

    /// The maximum time in seconds to wait for graceful shutdown.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout: Duration,

    /// Capacity of the inbound command queue.
    #[serde(default = "default_command_channel_capacity")]
    pub command_channel_capacity: u32,

    /// HTTP surface configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_url: Url::parse("http://127.0.0.1:0/").expect("static URL is valid"),
            bot_token: String::new(),
            owner_id: 0,
            destinations: Vec::new(),
            discord_api_base: default_discord_api_base(),
            poll_interval_secs: default_poll_interval(),
            fetch_timeout_secs: default_fetch_timeout(),
            history_path: default_history_path(),
            chart_path: default_chart_path(),
            proxy: ProxyConfig::default(),
            http_retry_config: HttpRetryConfig::default(),
            presence_activity: ActivityKind::default(),
            report_footer: None,
            shutdown_timeout: default_shutdown_timeout(),
            command_channel_capacity: default_command_channel_capacity(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("HEADCOUNT").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Rejects configurations the monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Message("bot_token must not be empty".to_string()));
        }
        if self.destinations.is_empty() {
            return Err(ConfigError::Message(
                "at least one destination must be configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates a new `AppConfigBuilder` for testing purposes.
    #[cfg(test)]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// A builder for creating `AppConfig` instances for testing.
#[cfg(test)]
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn target_url(mut self, url: &str) -> Self {
        self.config.target_url = Url::parse(url).unwrap();
        self
    }

    pub fn bot_token(mut self, token: &str) -> Self {
        self.config.bot_token = token.to_string();
        self
    }

    pub fn owner_id(mut self, owner_id: u64) -> Self {
        self.config.owner_id = owner_id;
        self
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.config.destinations.push(destination);
        self
    }

    pub fn discord_api_base(mut self, url: &str) -> Self {
        self.config.discord_api_base = Url::parse(url).unwrap();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_secs = interval;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout_secs = timeout;
        self
    }

    pub fn history_path(mut self, path: &std::path::Path) -> Self {
        self.config.history_path = path.to_path_buf();
        self
    }

    pub fn chart_path(mut self, path: &std::path::Path) -> Self {
        self.config.chart_path = path.to_path_buf();
        self
    }

    pub fn report_footer(mut self, footer: &str) -> Self {
        self.config.report_footer = Some(footer.to_string());
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
