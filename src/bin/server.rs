//! Search service binary.
//!
//! `corpsite-server` (or `corpsite-server serve`) runs the HTTP API. The
//! other subcommands run a one-off search, write a default config file or
//! print recent audit records. All logs go to stderr so `search` and `audit`
//! output can be piped.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use corpsite::config::LoggingConfig;
use corpsite::server::{self, ApiResponse, AppState};
use corpsite::{SiteConfig, audit, build_engine};
use corpsite_search::RawQuery;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// How long shutdown waits for pending audit records to be written.
const AUDIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Federated content search for the corporate site.
#[derive(Parser)]
#[command(name = "corpsite-server", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address, e.g. `0.0.0.0:8080`.
    #[arg(long)]
    bind: Option<String>,

    /// Override the content directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,

    /// Run one search and print the response envelope.
    Search(SearchArgs),

    /// Write a config file with every default filled in.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the most recent audit records as JSON lines.
    Audit {
        /// Number of records to print.
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Search term.
    term: String,

    /// Domain filter: `all`, a source or a domain name.
    #[arg(long = "type", default_value = "all")]
    filter: String,

    /// Maximum number of results.
    #[arg(long)]
    limit: Option<usize>,

    /// Enable fuzzy subsequence matching.
    #[arg(long)]
    fuzzy: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(SiteConfig::default_config_path);

    if let Some(Command::InitConfig { force }) = &cli.command {
        return init_config(&config_path, *force);
    }

    let mut config = load_config(&config_path, cli.config.is_some())?;
    if let Some(data_dir) = cli.data_dir {
        config.content.data_dir = data_dir;
    }

    let _log_guard = init_logging(&config.logging);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config, cli.bind).await,
        Command::Search(args) => run_search(config, args).await,
        Command::Audit { limit } => print_audit(&config, limit),
        Command::InitConfig { .. } => Ok(()),
    }
}

/// Load `path`, falling back to defaults when the default path is absent.
fn load_config(path: &Path, explicit: bool) -> anyhow::Result<SiteConfig> {
    if !explicit && !path.exists() {
        return Ok(SiteConfig::default());
    }
    SiteConfig::from_file(path).with_context(|| format!("failed to load {}", path.display()))
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    SiteConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

/// Initialise tracing to stderr, plus daily log files when configured.
///
/// `RUST_LOG` takes precedence over the configured filter. The returned
/// guard must be held until exit so buffered file output is flushed.
fn init_logging(logging: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "corpsite.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    guard
}

async fn run_server(config: SiteConfig, bind: Option<String>) -> anyhow::Result<()> {
    let addr = bind.unwrap_or_else(|| config.server.bind_addr());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        content = %config.content.data_dir.display(),
        audit = config.audit.enabled,
        "corpsite-server starting"
    );

    let (engine, audit_writer) = build_engine(&config)?;
    let engine = Arc::new(engine);
    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let result = server::serve(listener, AppState::new(Arc::clone(&engine), shutdown)).await;

    drop(engine);
    if let Some(writer) = audit_writer {
        match tokio::time::timeout(AUDIT_FLUSH_TIMEOUT, writer).await {
            Ok(Ok(())) => tracing::debug!("audit log flushed"),
            Ok(Err(err)) => tracing::warn!(error = %err, "audit writer task failed"),
            Err(_) => tracing::warn!("timed out flushing audit log"),
        }
    }

    if let Err(err) = &result {
        tracing::error!(error = %err, "corpsite-server exited with error");
    } else {
        tracing::info!("corpsite-server shut down cleanly");
    }
    result
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::warn!(error = %err, "failed to listen for Ctrl-C");
                return;
            }
        }
        () = terminate => {}
    }
    tracing::info!("shutdown requested");
    shutdown.cancel();
}

async fn run_search(config: SiteConfig, args: SearchArgs) -> anyhow::Result<()> {
    let (engine, audit_writer) = build_engine(&config)?;

    let mut raw = RawQuery::new(args.term)
        .with_filter(args.filter)
        .with_fuzzy(args.fuzzy);
    raw.limit = args.limit;

    let result = engine.search(raw).await;
    drop(engine);
    if let Some(writer) = audit_writer {
        let _ = tokio::time::timeout(AUDIT_FLUSH_TIMEOUT, writer).await;
    }

    match result {
        Ok(outcome) => {
            let body = serde_json::to_string_pretty(&ApiResponse::ok(outcome))?;
            println!("{body}");
            Ok(())
        }
        Err(err) => {
            let body = serde_json::to_string_pretty(&ApiResponse::<()>::failure(
                err.error_code(),
                err.to_string(),
            ))?;
            println!("{body}");
            Err(err.into())
        }
    }
}

fn print_audit(config: &SiteConfig, limit: usize) -> anyhow::Result<()> {
    let records = audit::read_recent_audit(&config.audit.path, limit)
        .with_context(|| format!("failed to read {}", config.audit.path.display()))?;
    for record in records {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}
