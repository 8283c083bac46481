//! Search stage: one query-shard in, candidate identities out.

use crate::fetch::{ApiClient, FetchOutcome};
use crate::harvest::identity::{Identity, SearchResponse};
use crate::harvest::planner::QueryShard;

const LOG_TARGET: &str = "    search";

/// Fetch one page of user-search results.
///
/// Returns the payload's `items` on success and an empty list on permanent
/// failure; either way an empty result is the caller's signal to stop paging
/// this query.
pub async fn fetch_page(client: &ApiClient, shard: &QueryShard) -> Vec<Identity> {
    let params = [("q", shard.query.clone()), ("page", shard.page.to_string())];

    match client.get_json::<SearchResponse>("/search/users", &params).await {
        FetchOutcome::Success(response) => {
            log::debug!(
                target: LOG_TARGET,
                "page {} of query '{}' returned {} identities",
                shard.page,
                shard.query,
                response.items.len()
            );
            response.items
        }
        FetchOutcome::PermanentFailure => Vec::new(),
    }
}
