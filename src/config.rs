//! Run configuration: loaded from an optional TOML file, overridden by CLI
//! arguments, and passed explicitly into the pipeline (no global state).

use crate::Result;
use crate::harvest::planner::{DEFAULT_MAX_PAGE, DEFAULT_QUERIES};
use crate::harvest::pool::DEFAULT_WORKERS;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;

/// Default configuration file searched for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "census.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Search queries to shard over, one per account-creation window.
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,

    /// Pages 1..=max_page are attempted per query.
    #[serde(default = "default_max_page")]
    pub max_page: u32,

    /// Size of the enrichment worker pool.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Upper bound of the random pause between search pages, in seconds.
    /// Zero disables the pause.
    #[serde(default = "default_page_pause_secs")]
    pub page_pause_secs: u64,

    /// Base URL of the remote API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Where the dataset CSV is written.
    #[serde(default = "default_output")]
    pub output: Utf8PathBuf,

    /// Seed for the shuffle RNG; omit for a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// API credential. Never read from the config file; supplied via the CLI
    /// or the `GITHUB_TOKEN` environment variable.
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_queries() -> Vec<String> {
    DEFAULT_QUERIES.iter().map(|q| (*q).to_string()).collect()
}

const fn default_max_page() -> u32 {
    DEFAULT_MAX_PAGE
}

const fn default_workers() -> usize {
    DEFAULT_WORKERS
}

const fn default_page_pause_secs() -> u64 {
    3
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_output() -> Utf8PathBuf {
    Utf8PathBuf::from("github_users.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queries: default_queries(),
            max_page: default_max_page(),
            workers: default_workers(),
            page_pause_secs: default_page_pause_secs(),
            api_base: default_api_base(),
            output: default_output(),
            seed: None,
            token: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicitly given path must exist; with no path, `census.toml` is
    /// used when present and the built-in defaults otherwise.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let candidate = Utf8Path::new(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let contents = fs::read_to_string(path).into_app_err_with(|| format!("could not read config file '{path}'"))?;

        toml::from_str(&contents).into_app_err_with(|| format!("could not parse config file '{path}'"))
    }
}
