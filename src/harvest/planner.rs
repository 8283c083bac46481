//! Query planning: which shards to fetch, in what order.
//!
//! The query list and each query's page order are shuffled independently, and
//! the combined identity list is shuffled again before enrichment. This is a
//! bias-reduction policy against the remote API's own result ordering, not a
//! correctness requirement; all of it is driven by an injected seedable RNG
//! so a run can be reproduced.

use crate::fetch::ApiClient;
use crate::harvest::identity::Identity;
use crate::harvest::search;
use crate::progress::ProgressReporter;
use crate::rng::XorShift64;
use core::time::Duration;

const LOG_TARGET: &str = "   planner";

/// Search queries partitioning users by disjoint account-creation windows.
pub const DEFAULT_QUERIES: [&str; 4] = [
    "type:user created:<2015-01-01",
    "type:user created:2015-01-01..2018-01-01",
    "type:user created:2018-01-01..2021-01-01",
    "type:user created:>2021-01-01",
];

/// Highest page fetched per query before giving up.
pub const DEFAULT_MAX_PAGE: u32 = 10;

/// One unit of search work: a query string plus a page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryShard {
    pub query: String,
    pub page: u32,
}

/// Builds the randomized shard sequence and accumulates identities across it.
#[derive(Debug)]
pub struct Planner {
    queries: Vec<String>,
    max_page: u32,
    page_pause_secs: u64,
    rng: XorShift64,
}

impl Planner {
    #[must_use]
    pub const fn new(queries: Vec<String>, max_page: u32, page_pause_secs: u64, rng: XorShift64) -> Self {
        Self {
            queries,
            max_page,
            page_pause_secs,
            rng,
        }
    }

    /// Produce the shuffled query order, each query carrying its own
    /// independently shuffled page order. Pure with respect to the RNG state:
    /// the same seed yields the same plan.
    pub fn shard_plan(&mut self) -> Vec<(String, Vec<u32>)> {
        let mut queries = self.queries.clone();
        self.rng.shuffle(&mut queries);

        queries
            .into_iter()
            .map(|query| {
                let mut pages: Vec<u32> = (1..=self.max_page).collect();
                self.rng.shuffle(&mut pages);
                (query, pages)
            })
            .collect()
    }

    /// Walk the shard plan sequentially, stopping a query's paging at the
    /// first empty page, and return the globally shuffled identity pool.
    pub async fn discover(&mut self, client: &ApiClient, progress: &ProgressReporter) -> Vec<Identity> {
        let mut identities = Vec::new();

        for (query, pages) in self.shard_plan() {
            for page in pages {
                let shard = QueryShard {
                    query: query.clone(),
                    page,
                };

                let items = search::fetch_page(client, &shard).await;
                if items.is_empty() {
                    log::info!(target: LOG_TARGET, "query '{query}' exhausted at page {page}");
                    break;
                }

                identities.extend(items);
                log::info!(
                    target: LOG_TARGET,
                    "fetched page {page} for query '{query}', {} identities so far",
                    identities.len()
                );
                progress.set_message(format!("{} identities", identities.len()));

                self.pause().await;
            }
        }

        log::info!(target: LOG_TARGET, "discovery finished with {} identities", identities.len());

        self.rng.shuffle(&mut identities);
        identities
    }

    /// Politeness pause of 1..=page_pause_secs between search pages; disabled
    /// when the configured maximum is zero.
    async fn pause(&mut self) {
        if self.page_pause_secs == 0 {
            return;
        }

        let secs = 1 + self.rng.next_below(self.page_pause_secs as usize) as u64;
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}
