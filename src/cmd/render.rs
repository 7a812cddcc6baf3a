//! Renders the player chart from the persisted history, without starting the
//! monitor.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::{
    chart::{self, RenderError},
    config::AppConfig,
    persistence::HistoryStore,
};

/// Errors that can occur while rendering the chart from the CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// The application configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// The chart could not be drawn.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Arguments for the `render` subcommand.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Where to write the chart. Defaults to the configured chart path.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Renders the chart once from the persisted history and exits.
pub async fn execute(args: RenderArgs, config_dir: Option<&str>) -> Result<(), Error> {
    let config = AppConfig::new(config_dir)?;
    let history = HistoryStore::load(config.history_path.clone()).await;
    let samples = history.snapshot().await;
    let sample_count = samples.len();

    let path = args.output.unwrap_or(config.chart_path);
    let render_path = path.clone();
    tokio::task::spawn_blocking(move || chart::render(&samples, &render_path))
        .await
        .unwrap_or_else(|e| Err(RenderError::Draw(format!("chart task failed: {e}"))))?;

    tracing::info!(samples = sample_count, path = %path.display(), "Chart rendered.");
    Ok(())
}
