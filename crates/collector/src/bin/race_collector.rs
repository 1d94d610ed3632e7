use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use collector::{
    CollectionReport, CollectionSummary, CollectorConfig, GambaClient, RaceCollector, SourceConfig,
    export::{EXPORT_LIMIT, export_players},
};
use storage::RaceStore;
use tokio::sync::broadcast;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "race-collector")]
#[command(about = "Collects wager race results into a local SQLite database", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://race_database.db")]
    database_url: String,

    #[arg(long, env = "GAMBA_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    #[arg(long, env = "GAMBA_API_URL")]
    api_url: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect an inclusive range of race ids
    Collect {
        #[arg(default_value_t = 90)]
        start: i64,

        #[arg(default_value_t = 100)]
        end: i64,

        /// Seconds between requests
        #[arg(long, default_value_t = 1.0)]
        delay: f64,

        /// Defaults to race_collection_report.json
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Collect the races estimated to have run in the last days
    Recent {
        #[arg(default_value_t = 30)]
        days: u32,

        /// Defaults to race_collection_report.json
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Poll for new races until interrupted
    Monitor {
        /// Seconds between checks
        #[arg(default_value_t = 3600)]
        interval: u64,

        /// Ids rechecked below the latest stored race, defaults to 5
        #[arg(long)]
        lookback: Option<i64>,
    },
    /// Export top players with their race history
    Export {
        #[arg(default_value = "player_export.json")]
        destination: PathBuf,

        #[arg(long, default_value_t = EXPORT_LIMIT)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    tracing::info!("Connecting to database...");
    let store = RaceStore::new(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    store
        .run_migrations()
        .await
        .context("Failed to run migrations")?;

    let mut source_config = SourceConfig::from_env().with_auth_token(cli.auth_token.clone());
    if let Some(api_url) = &cli.api_url {
        source_config.base_url = api_url.clone();
    }
    if source_config.auth_token.is_none() {
        tracing::warn!("No auth token configured, requests are sent anonymously");
    }

    let config = CollectorConfig::default();
    let error_limit = config.error_display_limit;
    let default_report = config.report_path.clone();

    match cli.command {
        Commands::Collect {
            start,
            end,
            delay,
            report,
        } => {
            let collector = build_collector(source_config, store, config)?;
            let delay = Duration::try_from_secs_f64(delay).context("Invalid delay")?;
            let summary = collector.collect_range(start, end, delay).await?;
            let report = report.unwrap_or_else(|| default_report.clone());
            finish_collection(&collector, summary, &report, error_limit).await?;
        }
        Commands::Recent { days, report } => {
            let collector = build_collector(source_config, store, config)?;
            let summary = collector.collect_recent(days).await?;
            let report = report.unwrap_or_else(|| default_report.clone());
            finish_collection(&collector, summary, &report, error_limit).await?;
        }
        Commands::Monitor { interval, lookback } => {
            let collector = build_collector(source_config, store, config)?;
            let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Shutdown requested, finishing current cycle");
                    let _ = shutdown_tx.send(());
                }
            });

            collector
                .monitor_continuous(Duration::from_secs(interval), lookback, shutdown_rx)
                .await;
        }
        Commands::Export { destination, limit } => {
            export_players(&store, &destination, limit)
                .await
                .context("Failed to export players")?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "race_collector={},collector={},storage={}",
            log_level, log_level, log_level
        )
        .into()
    });

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .context("Log file path has no file name")?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

fn build_collector(
    source_config: SourceConfig,
    store: RaceStore,
    config: CollectorConfig,
) -> anyhow::Result<RaceCollector<GambaClient>> {
    let client = GambaClient::new(source_config).context("Failed to build HTTP client")?;
    Ok(RaceCollector::new(client, store, config))
}

async fn finish_collection(
    collector: &RaceCollector<GambaClient>,
    summary: CollectionSummary,
    report_path: &Path,
    error_limit: usize,
) -> anyhow::Result<()> {
    summary.log(error_limit);

    let report = CollectionReport::assemble(collector.store(), summary)
        .await
        .context("Failed to assemble collection report")?;
    report
        .write_json(report_path)
        .await
        .context("Failed to write collection report")?;

    Ok(())
}
