//! A tool that harvests GitHub user data into a flat CSV dataset.
//!
//! # Overview
//!
//! `gh-census` queries GitHub's paginated user-search API across a set of
//! account-creation date windows, enriches every discovered user with profile
//! and repository details on a bounded worker pool, and writes one CSV row per
//! user. Rate limiting is handled reactively: a 403 throttle response pauses
//! only the requesting worker for the server-indicated delay and the request
//! is retried until it succeeds.
//!
//! # Quick Start
//!
//! ```bash
//! export GITHUB_TOKEN=ghp_xxxxxxxxxxxxxxxxxxxx
//! gh-census
//! ```
//!
//! This searches all configured date windows, enriches every discovered user,
//! and writes `github_users.csv` to the working directory.
//!
//! # Basic Usage
//!
//! **Choose the output path:**
//! ```bash
//! gh-census --output datasets/users.csv
//! ```
//!
//! **Reproducible shard/identity ordering:**
//! ```bash
//! gh-census --seed 42
//! ```
//!
//! **Tune the enrichment pool:**
//! ```bash
//! gh-census --workers 4
//! ```
//!
//! **Diagnostic output instead of the progress bar:**
//! ```bash
//! gh-census --log-level info
//! ```
//!
//! # Configuration
//!
//! Settings can also come from a TOML file (`census.toml` in the working
//! directory, or `--config path/to/file.toml`); command-line flags win over
//! the file. All fields are optional:
//!
//! ```toml
//! queries = ["type:user created:<2015-01-01"]
//! max_page = 10
//! workers = 10
//! page_pause_secs = 3
//! output = "github_users.csv"
//! seed = 42
//! ```
//!
//! # GitHub Access
//!
//! Unauthenticated requests are limited to 60 per hour, which a full harvest
//! exceeds almost immediately. Create a personal access token (no special
//! permissions needed) and pass it via `GITHUB_TOKEN` or `--token`.

use camino::Utf8PathBuf;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, ValueEnum};
use gh_census::config::Config;
use gh_census::progress::ProgressReporter;
use gh_census::{Result, harvest, report};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

#[derive(Parser, Debug)]
#[command(name = "gh-census", version, about)]
#[command(styles = CLAP_STYLES)]
struct Args {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Path to configuration file [default: census.toml if present]
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Where to write the dataset CSV (overrides the config file)
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<Utf8PathBuf>,

    /// Number of concurrent enrichment workers (overrides the config file)
    #[arg(long, value_name = "COUNT")]
    workers: Option<usize>,

    /// Seed for the shuffle RNG, for reproducible runs (overrides the config file)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_level);

    let mut config = Config::load(args.config.as_deref())?;
    config.token = args.token;
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // The progress bar would interleave with log output, so show it only
    // when logging is off.
    let progress = if args.log_level == LogLevel::None {
        ProgressReporter::new()
    } else {
        ProgressReporter::hidden()
    };

    let records = harvest::run(&config, &progress).await?;
    report::csv::write_dataset(&records, &config.output)?;

    println!("{} records written to {}", records.len(), config.output);

    Ok(())
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    if log_level == LogLevel::None {
        return;
    }

    let level = match log_level {
        LogLevel::None => return, // Already checked above, but being explicit
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug) || matches!(log_level, LogLevel::Trace))
        .init();
}
