use std::sync::Arc;

use clap::{Parser, Subcommand};
use headcount::{
    cmd::{RenderArgs, render},
    config::AppConfig,
    notification::DiscordClient,
    persistence::HistoryStore,
    providers::HttpPlayerCountSource,
    supervisor::{RESTART_EXIT_CODE, Shutdown, Supervisor},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding `app.yaml`. Defaults to `configs/`.
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the monitoring supervisor.
    Run,
    /// Renders the player chart from the persisted history and exits.
    Render(RenderArgs),
}

#[tokio::main]
#[tracing::instrument(level = "info")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_monitor(cli.config_dir.as_deref()).await?,
        Commands::Render(args) => render::execute(args, cli.config_dir.as_deref()).await?,
    }

    Ok(())
}

async fn run_monitor(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(config_dir)?;
    config.validate()?;
    tracing::debug!(
        target_url = %config.target_url,
        destinations = config.destinations.len(),
        "Configuration loaded."
    );

    let history = Arc::new(HistoryStore::load(config.history_path.clone()).await);
    tracing::info!(
        samples = history.len().await,
        path = %config.history_path.display(),
        "Sample history loaded."
    );

    let source = HttpPlayerCountSource::new(
        config.target_url.clone(),
        config.fetch_timeout_secs,
        &config.proxy,
    )?;

    let chat = DiscordClient::new(
        config.discord_api_base.clone(),
        &config.bot_token,
        config.report_footer.clone(),
        &config.http_retry_config,
    )?;

    let supervisor = Supervisor::builder()
        .config(Arc::new(config))
        .history(history)
        .source(Arc::new(source))
        .chat(Arc::new(chat))
        .build()
        .await?;

    tracing::info!("Supervisor initialized, starting monitoring...");

    match supervisor.run().await? {
        Shutdown::Graceful => Ok(()),
        Shutdown::Restart => {
            tracing::info!(code = RESTART_EXIT_CODE, "Exiting for restart.");
            std::process::exit(RESTART_EXIT_CODE);
        }
    }
}
