//! This module provides the `SupervisorBuilder` for constructing a `Supervisor`.

use std::sync::Arc;

use crate::{
    config::AppConfig, notification::ChatService, persistence::HistoryStore,
    providers::PlayerCountSource,
};

use super::{Supervisor, SupervisorError};

/// A builder for creating a `Supervisor` instance.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<Arc<AppConfig>>,
    history: Option<Arc<HistoryStore>>,
    source: Option<Arc<dyn PlayerCountSource>>,
    chat: Option<Arc<dyn ChatService>>,
}

impl SupervisorBuilder {
    /// Creates a new, empty `SupervisorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration for the `Supervisor`.
    pub fn config(mut self, config: Arc<AppConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the history store for the `Supervisor`.
    pub fn history(mut self, history: Arc<HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// Sets the player-count source for the `Supervisor`.
    pub fn source(mut self, source: Arc<dyn PlayerCountSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the chat service for the `Supervisor`.
    pub fn chat(mut self, chat: Arc<dyn ChatService>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Assembles and validates the components to build a `Supervisor`.
    ///
    /// This method ensures all required dependencies have been provided before
    /// constructing the supervisor.
    pub async fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;
        let history = self.history.ok_or(SupervisorError::MissingHistoryStore)?;
        let source = self.source.ok_or(SupervisorError::MissingPlayerCountSource)?;
        let chat = self.chat.ok_or(SupervisorError::MissingChatService)?;

        tracing::info!(
            samples = history.len().await,
            destinations = config.destinations.len(),
            "Supervisor assembled."
        );

        Ok(Supervisor::new(config, history, source, chat))
    }
}
