//! Precache main entry point
//!
//! This is the command-line interface for the precache cache warmer.

use anyhow::Context;
use clap::Parser;
use precache::config::{load_config_file, resolve, PartialConfig, RunConfig, DEFAULT_LOG_FILE};
use precache::output::{ConsoleReporter, Reporter};
use precache::warmer::warm;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Precache: warm a CDN or caching proxy from a sitemap
///
/// Every URL in the sitemap is requested once, paced and under a concurrency
/// ceiling. With --cacheheader the response's cache-status header is used to
/// report hits, misses and uncacheable pages.
#[derive(Parser, Debug)]
#[command(name = "precache")]
#[command(version)]
#[command(about = "Warm a CDN or caching proxy from a sitemap")]
#[command(long_about = None)]
struct Cli {
    /// Sitemap URL (required unless set in the config file)
    #[arg(long)]
    sitemap: Option<String>,

    /// Concurrent requests; 1 switches to slow sequential mode [default: 5]
    #[arg(long)]
    size: Option<usize>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long)]
    timeout: Option<u64>,

    /// Base delay before each request in milliseconds [default: 500]
    #[arg(long)]
    delay: Option<u64>,

    /// Send requests to this host[:port] instead, e.g. 127.0.0.1:8080
    #[arg(long)]
    host: Option<String>,

    /// Response header carrying the cache status, e.g. x-cache
    #[arg(long = "cacheheader")]
    cache_header: Option<String>,

    /// User-Agent header [default: desktop Chrome 120]
    #[arg(long = "useragent")]
    user_agent: Option<String>,

    /// Verify TLS certificates
    #[arg(long)]
    verify: bool,

    /// Show debug output
    #[arg(long)]
    debug: bool,

    /// TOML config file; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file [default: pre-cache.log next to the executable]
    #[arg(long, value_name = "FILE", conflicts_with = "no_log_file")]
    log_file: Option<PathBuf>,

    /// Do not write a log file
    #[arg(long)]
    no_log_file: bool,
}

impl Cli {
    /// The command line as a settings layer; unset flags defer to the config file
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            sitemap: self.sitemap.clone(),
            size: self.size,
            timeout: self.timeout,
            delay: self.delay,
            host: self.host.clone(),
            cache_header: self.cache_header.clone(),
            user_agent: self.user_agent.clone(),
            verify: self.verify.then_some(true),
            debug: self.debug.then_some(true),
            log_file: self.log_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let reporter: Arc<dyn Reporter> = match build_reporter(&config) {
        Ok(reporter) => Arc::new(reporter),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match warm(config, Arc::clone(&reporter)).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Warm run failed: {}", e);
            reporter.error(&format!("Run failed: {}", e));
            ExitCode::FAILURE
        }
    }
}

/// Sets up the tracing subscriber; diagnostics go to stderr
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("precache=debug,info")
    } else {
        EnvFilter::new("precache=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges defaults, the optional config file and the command line
fn resolve_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let file_layer = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config_file(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => PartialConfig::default(),
    };

    let defaults = PartialConfig {
        log_file: default_log_path(),
        ..Default::default()
    };

    let mut config = resolve(defaults.merge(file_layer).merge(cli.overrides()))?;
    if cli.no_log_file {
        config.log_file = None;
    }
    Ok(config)
}

fn default_log_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(DEFAULT_LOG_FILE))
}

fn build_reporter(config: &RunConfig) -> anyhow::Result<ConsoleReporter> {
    match &config.log_file {
        Some(path) => ConsoleReporter::with_log_file(path, config.debug)
            .with_context(|| format!("failed to create log file {}", path.display())),
        None => Ok(ConsoleReporter::new(config.debug)),
    }
}
