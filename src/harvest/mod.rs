//! The harvesting pipeline: plan query shards, discover identities, enrich
//! them on a bounded pool, and hand the records to the writer.

use crate::Result;
use crate::config::Config;
use crate::fetch::ApiClient;
use crate::progress::ProgressReporter;
use crate::rng::XorShift64;
use chrono::Utc;

pub mod identity;
pub mod planner;
pub mod pool;
pub mod profile;
pub mod record;
pub mod repos;
pub mod search;

pub use identity::Identity;
pub use planner::Planner;
pub use record::Record;

const LOG_TARGET: &str = "   harvest";

/// Run the full batch: sequential shard discovery followed by parallel
/// enrichment. Returns the composed records in pool completion order, which
/// is not stable across runs.
pub async fn run(config: &Config, progress: &ProgressReporter) -> Result<Vec<Record>> {
    let client = ApiClient::new(&config.api_base, config.token.as_deref())?;

    let seed = config.seed.unwrap_or_else(entropy_seed);
    log::debug!(target: LOG_TARGET, "shuffle seed {seed}");

    progress.set_prefix("Searching");
    progress.enable_indeterminate_mode();

    let mut planner = Planner::new(
        config.queries.clone(),
        config.max_page,
        config.page_pause_secs,
        XorShift64::new(seed),
    );
    let identities = planner.discover(&client, progress).await;

    progress.set_prefix("Enriching");
    progress.enable_determinate_mode(identities.len() as u64);

    let records = pool::enrich_all(&client, identities, config.workers, progress).await;

    progress.finish_and_clear();

    Ok(records)
}

/// Wall-clock seed for runs where reproducibility was not requested.
fn entropy_seed() -> u64 {
    let now = Utc::now();
    (now.timestamp().unsigned_abs()) ^ u64::from(now.timestamp_subsec_nanos()).rotate_left(32)
}
