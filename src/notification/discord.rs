//! Chat-service implementation backed by the Discord REST API.

use async_trait::async_trait;
use reqwest::{
    header,
    header::HeaderValue,
    multipart::{Form, Part},
};
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use super::{ChatService, error::NotificationError, payload};
use crate::{config::HttpRetryConfig, http_client::build_dispatch_client, models::StatusReport};

/// A [`ChatService`] sending messages through the Discord REST API.
///
/// Dispatch goes through the retrying HTTP client, so transient failures and
/// rate-limit responses are retried before an error is reported.
pub struct DiscordClient {
    /// Base URL of the REST API.
    api_base: Url,

    /// Pre-built `Bot` authorization header.
    auth: HeaderValue,

    /// Optional footer attached to report embeds.
    report_footer: Option<String>,

    /// The HTTP client used for dispatch, with retry middleware.
    client: ClientWithMiddleware,
}

impl DiscordClient {
    /// Creates a new client for the given API base and bot token.
    pub fn new(
        api_base: Url,
        bot_token: &str,
        report_footer: Option<String>,
        retry_policy: &HttpRetryConfig,
    ) -> Result<Self, NotificationError> {
        let mut auth = HeaderValue::from_str(&format!("Bot {bot_token}"))
            .map_err(|e| NotificationError::ConfigError(format!("Invalid bot token: {e}")))?;
        auth.set_sensitive(true);

        let client = build_dispatch_client(retry_policy)?;

        Ok(Self { api_base, auth, report_footer, client })
    }

    fn channel_messages_url(&self, channel_id: u64) -> String {
        format!("{}/channels/{}/messages", self.api_base.as_str().trim_end_matches('/'), channel_id)
    }

    fn check_response(response: &reqwest::Response) -> Result<(), NotificationError> {
        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::NotifyFailed(format!(
                "Chat API request failed with status: {status}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatService for DiscordClient {
    #[tracing::instrument(skip(self, content), level = "debug")]
    async fn send_message(
        &self,
        channel_id: u64,
        content: &str,
    ) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.channel_messages_url(channel_id))
            .header(header::AUTHORIZATION, self.auth.clone())
            .json(&payload::message_payload(content))
            .send()
            .await?;

        Self::check_response(&response)
    }

    #[tracing::instrument(skip(self, report, chart_png), level = "debug")]
    async fn send_report(
        &self,
        channel_id: u64,
        report: &StatusReport,
        chart_png: Vec<u8>,
    ) -> Result<(), NotificationError> {
        let report_payload = payload::report_payload(report, self.report_footer.as_deref());
        let payload_json = serde_json::to_string(&report_payload)?;

        let form = Form::new()
            .part("payload_json", Part::text(payload_json).mime_str("application/json")?)
            .part(
                "files[0]",
                Part::bytes(chart_png)
                    .file_name(payload::CHART_FILENAME)
                    .mime_str("image/png")?,
            );

        let response = self
            .client
            .post(self.channel_messages_url(channel_id))
            .header(header::AUTHORIZATION, self.auth.clone())
            .multipart(form)
            .send()
            .await?;

        Self::check_response(&response)
    }
}
