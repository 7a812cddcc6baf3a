//! The Supervisor module manages the lifecycle of the monitor.
//!
//! This module implements the **Supervisor Pattern**, a design pattern used to
//! manage the lifecycle of multiple, concurrent, long-running services. It
//! acts as the top-level owner of all major components of the application,
//! such as the polling loop, the command handler, and the HTTP server.
//!
//! ## Responsibilities
//!
//! - **Initialization**: The `SupervisorBuilder` constructs and "wires" all
//!   services together, injecting necessary dependencies like configuration
//!   and the history store.
//! - **Lifecycle Management**: The `Supervisor` starts all services and
//!   manages their lifetimes.
//! - **Graceful Shutdown**: It listens for shutdown signals (like Ctrl+C or
//!   SIGTERM) and orchestrates a clean shutdown of all managed services. An
//!   owner-issued restart command shuts down the same way but asks the caller
//!   to exit with [`RESTART_EXIT_CODE`], so an external process supervisor
//!   relaunches the binary.
//! - **Task Supervision**: It monitors the health of each service. If a
//!   service panics, the supervisor shuts down all other services to ensure
//!   the application exits cleanly rather than continuing in a
//!   partially-functional state.

mod builder;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

pub use builder::SupervisorBuilder;
use thiserror::Error;
use tokio::{signal, sync::mpsc};

use crate::{
    config::AppConfig,
    context::AppStatus,
    engine::{command_handler::CommandHandler, poller::Poller},
    http_server::{self, ApiState},
    models::CommandEvent,
    notification::{ChatService, Notifier},
    persistence::HistoryStore,
    providers::{self, PlayerCountSource},
};

/// Process exit code that tells an external supervisor to relaunch the binary.
pub const RESTART_EXIT_CODE: i32 = 10;

/// How the process should exit after the supervisor returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Exit cleanly.
    Graceful,

    /// Exit with [`RESTART_EXIT_CODE`] so the process gets relaunched.
    Restart,
}

/// Represents the set of errors that can occur during the supervisor's
/// operation.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// A history store was not provided to the `SupervisorBuilder`.
    #[error("Missing history store for Supervisor")]
    MissingHistoryStore,

    /// A player-count source was not provided to the `SupervisorBuilder`.
    #[error("Missing player-count source for Supervisor")]
    MissingPlayerCountSource,

    /// A chat service was not provided to the `SupervisorBuilder`.
    #[error("Missing chat service for Supervisor")]
    MissingChatService,
}

/// The primary runtime manager for the application.
///
/// The Supervisor owns all the major components (services) and is responsible
/// for their startup, shutdown, and health monitoring. Once `run` is called,
/// it becomes the main process loop for the entire application.
pub struct Supervisor {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The persisted sample history.
    history: Arc<HistoryStore>,

    /// Shared runtime status, written by the polling loop and read by the
    /// HTTP server.
    app_status: AppStatus,

    /// The source of the player-count metric.
    source: Arc<dyn PlayerCountSource>,

    /// The chat platform all outbound messages go to.
    chat: Arc<dyn ChatService>,

    /// Set by the command handler when the owner asked for a restart.
    restart_requested: Arc<AtomicBool>,

    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: tokio_util::sync::CancellationToken,

    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: tokio::task::JoinSet<()>,
}

impl Supervisor {
    /// Creates a new Supervisor instance with all its required components.
    ///
    /// This is typically called by the `SupervisorBuilder` after it has
    /// assembled all the necessary dependencies.
    pub fn new(
        config: Arc<AppConfig>,
        history: Arc<HistoryStore>,
        source: Arc<dyn PlayerCountSource>,
        chat: Arc<dyn ChatService>,
    ) -> Self {
        Self {
            config,
            history,
            app_status: AppStatus::default(),
            source,
            chat,
            restart_requested: Arc::new(AtomicBool::new(false)),
            cancellation_token: tokio_util::sync::CancellationToken::new(),
            join_set: tokio::task::JoinSet::new(),
        }
    }

    /// Returns a new `SupervisorBuilder` instance.
    ///
    /// This is the public entry point for creating a supervisor.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    /// Starts the supervisor and all its managed services.
    ///
    /// This method is the main entry point for the application's runtime. It
    /// performs the following steps:
    /// 1. Spawns a signal handler to listen for `SIGINT` (Ctrl+C) and
    ///    `SIGTERM`.
    /// 2. Logs the egress identity once, so proxied deployments can confirm
    ///    their outbound address.
    /// 3. Spawns the HTTP server, the command handler, and the polling loop as
    ///    long-running background tasks.
    /// 4. Enters the main `select!` loop, which concurrently listens for the
    ///    shutdown signal and monitors the health of all spawned tasks via the
    ///    `JoinSet`.
    /// 5. Upon shutdown, it waits for all tasks to complete and logs the final
    ///    persisted state.
    pub async fn run(mut self) -> Result<Shutdown, SupervisorError> {
        // Clone the token for the signal handler task.
        let cancellation_token = self.cancellation_token.clone();

        // Spawn a task to listen for shutdown signals.
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler")
                    .recv()
                    .await;
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown."),
                _ = terminate => tracing::info!("SIGTERM received, initiating graceful shutdown."),
            }

            // Notify all other tasks to begin shutting down.
            cancellation_token.cancel();
        });

        // One-shot egress check, so proxied deployments can confirm their
        // outbound address.
        if self.config.proxy.enabled {
            let proxy = self.config.proxy.clone();
            let timeout = self.config.fetch_timeout_secs;
            self.join_set.spawn(async move {
                providers::log_egress_identity(&proxy, timeout).await;
            });
        }

        // Create the channel that connects the HTTP server to the command
        // handler.
        let (command_tx, command_rx) =
            mpsc::channel::<CommandEvent>(self.config.command_channel_capacity as usize);

        // Spawn the HTTP server as a background task if enabled.
        if self.config.server.enabled {
            let api_state = ApiState {
                config: Arc::clone(&self.config),
                app_status: self.app_status.clone(),
                history: Arc::clone(&self.history),
                command_tx: command_tx.clone(),
            };
            let http_cancellation_token = self.cancellation_token.clone();
            self.join_set.spawn(async move {
                if let Err(e) =
                    http_server::run_server_from_config(api_state, http_cancellation_token).await
                {
                    tracing::error!(error = %e, "HTTP server failed.");
                }
            });
        }

        // The supervisor's own sender is dropped here so the command channel
        // closes once the HTTP server stops.
        drop(command_tx);

        // Spawn the command handler service.
        let command_handler = CommandHandler::new(
            Arc::clone(&self.config),
            Arc::clone(&self.source),
            Arc::clone(&self.history),
            Arc::clone(&self.chat),
            Arc::clone(&self.restart_requested),
            self.cancellation_token.clone(),
        );
        self.join_set.spawn(async move {
            command_handler.run(command_rx).await;
        });

        // Spawn the polling loop.
        let notifier = Notifier::new(Arc::clone(&self.chat), self.config.destinations.clone());
        let poller = Poller::new(
            Arc::clone(&self.config),
            Arc::clone(&self.source),
            Arc::clone(&self.history),
            self.app_status.clone(),
            notifier,
            self.cancellation_token.clone(),
        );
        self.join_set.spawn(async move {
            poller.run().await;
        });

        // --- Main Supervisor Loop ---
        // This loop is only responsible for monitoring task health and
        // shutdown signals.

        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(_)) => {
                            // Task completed successfully, continue monitoring.
                        }
                        Some(Err(e)) => {
                            tracing::error!("A critical task failed: {:?}. Initiating shutdown.", e);
                            self.cancellation_token.cancel();
                        }
                        None => {
                            // All tasks have completed.
                            break;
                        }
                    }
                }
                _ = self.cancellation_token.cancelled() => {
                    // Cancellation requested externally, break the loop.
                    break;
                }
            }
        }

        // --- Graceful Shutdown ---

        // Ensure all spawned tasks are properly awaited before cleanup.
        self.join_set.shutdown().await;
        tracing::info!("All supervised tasks have completed.");

        // Log the final persisted state, with a timeout.
        let shutdown_timeout = self.config.shutdown_timeout;
        let cleanup_logic = async {
            match self.history.last().await {
                Some(sample) => {
                    let samples = self.history.len().await;
                    tracing::info!(
                        samples,
                        last_count = sample.count,
                        "Final state: sample history persisted."
                    );
                }
                None => tracing::info!("Final state: no samples have been recorded yet."),
            }
        };

        if tokio::time::timeout(shutdown_timeout, cleanup_logic).await.is_err() {
            tracing::warn!(
                "Cleanup did not complete within the timeout of {:?}. Continuing shutdown.",
                shutdown_timeout
            );
        }

        tracing::info!("Supervisor shutdown complete.");

        if self.restart_requested.load(Ordering::SeqCst) {
            Ok(Shutdown::Restart)
        } else {
            Ok(Shutdown::Graceful)
        }
    }
}
