//! Concurrency coordinator: bounded parallel enrichment of the identity pool.

use crate::fetch::ApiClient;
use crate::harvest::identity::Identity;
use crate::harvest::record::Record;
use crate::harvest::{profile, repos};
use crate::progress::ProgressReporter;
use futures::stream::{self, StreamExt};

const LOG_TARGET: &str = "      pool";

/// Default number of concurrent enrichment workers.
pub const DEFAULT_WORKERS: usize = 10;

/// Enrich every identity on a bounded worker pool and collect the records.
///
/// One task per identity, at most `workers` in flight; within a task the
/// profile fetch gates the repository fetch and the compose step. A task that
/// drops its identity (permanent profile failure) never affects the others,
/// and the pool drains fully before this returns. There is deliberately no
/// per-task timeout: a permanently throttled endpoint stalls that one task,
/// as the throttle contract requires.
pub async fn enrich_all(
    client: &ApiClient,
    identities: Vec<Identity>,
    workers: usize,
    progress: &ProgressReporter,
) -> Vec<Record> {
    let total = identities.len();

    let tasks = identities.into_iter().map(|identity| async move {
        let record = enrich_one(client, identity).await;
        progress.inc();
        record
    });

    let records: Vec<Record> = stream::iter(tasks)
        .buffer_unordered(workers.max(1))
        .filter_map(|record| async move { record })
        .collect()
        .await;

    log::info!(
        target: LOG_TARGET,
        "enriched {} of {total} identities",
        records.len()
    );

    records
}

/// Enrich a single identity: profile first (a permanent failure drops the
/// identity), then repository aggregation (a permanent failure falls back to
/// defaults), then the pure merge.
async fn enrich_one(client: &ApiClient, identity: Identity) -> Option<Record> {
    let Some(detail) = profile::enrich(client, &identity.login).await else {
        log::info!(target: LOG_TARGET, "dropping '{}' from the run", identity.login);
        return None;
    };

    let summary = repos::aggregate(client, &identity.login).await;

    Some(Record::compose(identity, detail, summary))
}
