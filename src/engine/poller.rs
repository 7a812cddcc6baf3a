//! The Poller module is responsible for the fixed-cadence polling loop that
//! fetches the player count, classifies it, and fans the result out to the
//! configured destinations.

use std::sync::Arc;

use chrono::{Local, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    context::AppStatus,
    engine::classifier,
    notification::{ChatService, Notifier, TickDispatch},
    persistence::HistoryStore,
    providers::{FetchError, PlayerCountSource},
};

/// The polling service.
///
/// Runs on a fixed cadence: fetch, classify, dispatch, persist. A failed
/// fetch skips the rest of the tick, leaving history and session state
/// untouched; only cancellation stops the loop.
pub struct Poller<S: PlayerCountSource + ?Sized, C: ChatService + ?Sized> {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The source of the player-count metric.
    source: Arc<S>,

    /// The persisted sample history.
    history: Arc<HistoryStore>,

    /// Shared runtime status, surfaced by the HTTP server.
    status: AppStatus,

    /// Fan-out of finished ticks to the configured destinations.
    notifier: Notifier<C>,

    /// Count accepted on the previous tick.
    previous_count: u64,

    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl<S: PlayerCountSource + ?Sized, C: ChatService + ?Sized> Poller<S, C> {
    /// Creates a new Poller instance.
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<S>,
        history: Arc<HistoryStore>,
        status: AppStatus,
        notifier: Notifier<C>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { config, source, history, status, notifier, previous_count: 0, cancellation_token }
    }

    /// Starts the long-running polling loop.
    ///
    /// The first tick runs immediately; each subsequent tick starts one fixed
    /// interval after the previous one finished, without compensating for
    /// tick duration.
    pub async fn run(mut self) {
        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "Error during polling tick. Retrying next interval...");
            }

            let polling_delay = tokio::time::sleep(self.config.poll_interval_secs);

            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Poller cancellation signal received, shutting down...");
                    break;
                }

                _ = polling_delay => {}
            }
        }
        tracing::info!("Poller has shut down.");
    }

    /// Performs one polling cycle.
    async fn tick(&mut self) -> Result<(), FetchError> {
        let sample = self.source.fetch().await?;
        let count = sample.count;

        let assessment = classifier::assess(self.previous_count, count);
        let final_string =
            format!("[{}] {}", Local::now().format("%H:%M:%S"), assessment.message);

        // The resurrection check reads the last persisted sample, before this
        // tick's append.
        let resurrected = classifier::resurrected(self.history.last().await, count);

        let dispatch = TickDispatch {
            final_string,
            count,
            drop_rate: classifier::drop_rate(self.previous_count, count),
            severe_drop: assessment.severe_drop,
            resurrected,
            now_unix: Utc::now().timestamp(),
        };
        self.notifier.dispatch(&dispatch).await;

        {
            let mut status = self.status.status.write().await;
            status.activity = self.config.presence_activity;
            status.presence_text = assessment.message;
            status.last_count = Some(count);
            status.last_seen = Some(sample.timestamp);
        }

        if let Err(e) = self.history.append(sample).await {
            tracing::error!(error = %e, "Failed to persist sample history.");
        }

        self.previous_count = count;
        Ok(())
    }
}
