//! On-demand command processing.
//!
//! Commands arrive over a bounded channel, fed by the HTTP command endpoint.
//! The handler is a read-only consumer of the history store; the polling
//! loop's session state is never touched from here.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    chart::{self, RenderError},
    config::AppConfig,
    engine::classifier,
    models::{CommandEvent, CommandKind, StatusReport},
    notification::{ChatService, error::NotificationError},
    persistence::HistoryStore,
    providers::{FetchError, PlayerCountSource},
};

/// Errors that can occur while serving a status report.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The fresh fetch for the report failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Chart rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The rendered chart could not be read back from disk.
    #[error("Chart file error: {0}")]
    ChartFile(#[from] std::io::Error),

    /// The reply could not be delivered.
    #[error("Notification error: {0}")]
    Notify(#[from] NotificationError),
}

/// Serves inbound commands: status reports, history length queries, and the
/// owner-only restart.
pub struct CommandHandler<S: PlayerCountSource + ?Sized, C: ChatService + ?Sized> {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The source of the player-count metric, fetched fresh per report.
    source: Arc<S>,

    /// The persisted sample history.
    history: Arc<HistoryStore>,

    /// The chat platform replies go to.
    chat: Arc<C>,

    /// Set before cancelling when the owner asked for a restart.
    restart_requested: Arc<AtomicBool>,

    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl<S: PlayerCountSource + ?Sized, C: ChatService + ?Sized> CommandHandler<S, C> {
    /// Creates a new CommandHandler instance.
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<S>,
        history: Arc<HistoryStore>,
        chat: Arc<C>,
        restart_requested: Arc<AtomicBool>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { config, source, history, chat, restart_requested, cancellation_token }
    }

    /// Consumes command events until the channel closes or shutdown is
    /// signalled.
    pub async fn run(self, mut receiver: mpsc::Receiver<CommandEvent>) {
        loop {
            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Command handler cancellation signal received, shutting down...");
                    break;
                }

                event = receiver.recv() => {
                    match event {
                        Some(event) => self.handle(event).await,
                        None => break,
                    }
                }
            }
        }
        tracing::info!("Command handler has shut down.");
    }

    /// Serves a single command event. Failures are logged and, where a reply
    /// channel exists, reported back to it; they never escape the handler.
    pub async fn handle(&self, event: CommandEvent) {
        match event.kind {
            CommandKind::HistoryLen => {
                let samples = self.history.len().await;
                tracing::info!(samples, "History length requested.");
            }
            CommandKind::Restart => self.handle_restart(event).await,
            CommandKind::Report => {
                let started = std::time::Instant::now();
                match self.report(event.channel_id).await {
                    Ok(()) => {
                        tracing::info!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Status report delivered."
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serve status report.");
                        let reply = failure_reply(&e);
                        if let Err(e) = self.chat.send_message(event.channel_id, reply).await {
                            tracing::error!(error = %e, "Failed to deliver the error reply.");
                        }
                    }
                }
            }
        }
    }

    async fn handle_restart(&self, event: CommandEvent) {
        if event.requester_id != self.config.owner_id {
            tracing::warn!(
                requester_id = event.requester_id,
                "Restart refused: requester is not the owner."
            );
            return;
        }

        if let Err(e) = self.chat.send_message(event.channel_id, "Restarting bot...").await {
            tracing::error!(error = %e, "Failed to acknowledge the restart request.");
        }

        self.restart_requested.store(true, Ordering::SeqCst);
        self.cancellation_token.cancel();
    }

    /// Builds and delivers a fresh status report: fetch, classify against the
    /// last hour of history, render the chart, reply with the attachment.
    async fn report(&self, channel_id: u64) -> Result<(), CommandError> {
        let sample = self.source.fetch().await?;
        let snapshot = self.history.snapshot().await;
        let status = classifier::report_status(sample.count, &snapshot, Utc::now());

        let chart_path = self.config.chart_path.clone();
        tokio::task::spawn_blocking(move || chart::render(&snapshot, &chart_path))
            .await
            .unwrap_or_else(|e| Err(RenderError::Draw(format!("chart task failed: {e}"))))?;

        let chart_png = tokio::fs::read(&self.config.chart_path).await?;
        let report =
            StatusReport { count: sample.count, status, generated_at: Utc::now() };
        self.chat.send_report(channel_id, &report, chart_png).await?;

        Ok(())
    }
}

/// Maps a report failure to the text shown to the requester. An empty history
/// is a valid outcome, not an internal error, and gets its own wording.
fn failure_reply(error: &CommandError) -> &'static str {
    match error {
        CommandError::Fetch(FetchError::Timeout) => {
            "Error: The request timed out. Please try again later."
        }
        CommandError::Fetch(FetchError::Transport(_)) => {
            "Error: Unable to connect to the target server."
        }
        CommandError::Fetch(FetchError::HttpStatus(_)) => {
            "Error: Unable to retrieve data from the target server."
        }
        CommandError::Fetch(FetchError::Decode(_)) | CommandError::Fetch(FetchError::Field(_)) => {
            "Error: Unable to decode the data received. Please try again later."
        }
        CommandError::Render(RenderError::NoData) => {
            "No player data recorded yet. Try again after the first poll."
        }
        _ => "Error: An unexpected error occurred while processing your request. Please try again later.",
    }
}
