//! flynet Binary Entry Point
//!
//! `flynet run` (the default) probes the target until interrupted.
//! `flynet report` summarizes the stored history for a date range.
//! Core functionality is provided by the `flynet` library crate.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use flynet::{
    AppConfig, ConfigError, IcmpProber, Monitor, StoreConfig,
    analysis::{DateRange, Report, ViewOptions},
    config::expand_env_vars,
    open_existing_store, open_store,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// flynet - Network Reachability Probe
#[derive(Parser, Debug)]
#[command(name = "flynet", version, about, long_about = None)]
struct Cli {
    /// Path to an optional YAML configuration file
    #[arg(short, long, global = true, env = "FLYNET_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config file)
    #[arg(long, global = true, env = "FLYNET_DB")]
    db: Option<String>,

    /// PostgreSQL connection URL (overrides config file and --db)
    #[arg(long, global = true, env = "FLYNET_DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[command(flatten)]
    probe: ProbeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the target at a fixed cadence until interrupted
    Run,
    /// Summarize stored latency history over a date range
    Report(ReportArgs),
}

/// Probe settings, accepted with or without the `run` subcommand.
#[derive(Args, Debug, Default)]
struct ProbeArgs {
    /// Host or IP address to ping
    #[arg(long, global = true, visible_alias = "ip", env = "FLYNET_TARGET")]
    target: Option<String>,

    /// Seconds between probes
    #[arg(long, global = true, visible_alias = "every", env = "FLYNET_INTERVAL")]
    interval: Option<u64>,

    /// Seconds to wait for each reply
    #[arg(long, global = true, env = "FLYNET_TIMEOUT")]
    timeout: Option<u64>,

    /// Seconds a single store write may take (default: the interval)
    #[arg(long, global = true, env = "FLYNET_STORE_TIMEOUT")]
    store_timeout: Option<u64>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// First day to include (YYYY-MM-DD, UTC)
    #[arg(long, visible_alias = "startdate")]
    start: String,

    /// Last day to include (YYYY-MM-DD, UTC)
    #[arg(long, visible_alias = "enddate")]
    end: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Latency in seconds substituted for failed probes
    #[arg(long, default_value_t = flynet::analysis::DEFAULT_FAILURE_SENTINEL)]
    sentinel: f64,

    /// Moving-average window in samples
    #[arg(long, default_value_t = flynet::analysis::DEFAULT_SMA_WINDOW)]
    window: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before parsing so env-backed flags can see it
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,flynet=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = &dotenv {
        tracing::debug!("Loaded environment from: {}", path.display());
    }

    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    match &cli.command {
        Some(Command::Report(args)) => report(&config, args).await,
        Some(Command::Run) | None => run(config).await,
    }
}

/// Resolve configuration: defaults < config file < CLI/env.
fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let args = &cli.probe;
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(target) = &args.target {
        config.target = target.clone();
    }
    if let Some(interval) = args.interval {
        config.interval = interval;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(store_timeout) = args.store_timeout {
        config.store_timeout = Some(store_timeout);
    }

    if let Some(url) = &cli.database_url {
        config.store = StoreConfig::Postgres {
            url: expand_env_vars(url),
        };
    } else if let Some(path) = &cli.db {
        config.store = StoreConfig::Sqlite { path: path.clone() };
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Pinging {} every {}s with a timeout of {}s, saving results to {}",
        config.target,
        config.interval,
        config.timeout,
        config.store,
    );

    let store = open_store(&config.store)?;

    // Without a table no sample can ever be stored, so this one is fatal.
    store.ensure_schema().await?;

    let monitor = Monitor::new(&config, Arc::new(IcmpProber::new()), store);
    monitor.run_until(shutdown_signal()).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn report(config: &AppConfig, args: &ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let range = DateRange::parse(&args.start, &args.end)?;
    let options = ViewOptions {
        failure_sentinel: args.sentinel,
        window: args.window,
    };

    tracing::debug!("Reading history from {}", config.store);
    let store = open_existing_store(&config.store)?;
    let records = store.fetch_all().await?;

    let report = Report::build(&records, range, &options);
    match args.format {
        OutputFormat::Table => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
