//! Repository aggregation stage.

use crate::fetch::{ApiClient, FetchOutcome};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

const LOG_TARGET: &str = "     repos";

/// Wire model of one repository from the repository-listing endpoint. Only the
/// fields the aggregation reads; everything else in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repo {
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub stargazers_count: u64,

    #[serde(default)]
    pub forks_count: u64,

    #[serde(default)]
    pub fork: bool,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub topics: Vec<String>,

    /// Repository size in KB, as reported by the API.
    #[serde(default)]
    pub size: u64,
}

/// Aggregate metrics reduced from one identity's repository list.
///
/// The language histogram and topic set preserve insertion order so joined
/// output and most-used-language tie-breaking are deterministic for a given
/// repository order.
#[derive(Debug, Clone, Default)]
pub struct RepoSummary {
    pub repo_count: u64,
    pub languages: IndexMap<String, u64>,
    pub total_stars: u64,
    pub total_forks: u64,
    pub forked_count: u64,
    pub topics: IndexSet<String>,
    pub last_activity: Option<String>,
    pub total_size_kb: u64,
}

impl RepoSummary {
    /// Reduce a repository list in one pass.
    #[must_use]
    pub fn aggregate(repos: &[Repo]) -> Self {
        let mut summary = Self {
            repo_count: repos.len() as u64,
            ..Self::default()
        };

        for repo in repos {
            if let Some(language) = &repo.language {
                *summary.languages.entry(language.clone()).or_insert(0) += 1;
            }

            summary.total_stars += repo.stargazers_count;
            summary.total_forks += repo.forks_count;
            summary.total_size_kb += repo.size;

            if repo.fork {
                summary.forked_count += 1;
            }

            for topic in &repo.topics {
                let _ = summary.topics.insert(topic.clone());
            }

            // ISO-8601 timestamps order correctly as strings
            if let Some(updated_at) = &repo.updated_at {
                match &summary.last_activity {
                    Some(latest) if latest >= updated_at => {}
                    _ => summary.last_activity = Some(updated_at.clone()),
                }
            }
        }

        summary
    }
}

/// Fetch and reduce the repository list for one identity.
///
/// A permanent failure yields the all-default summary; the identity still
/// gets a record.
pub async fn aggregate(client: &ApiClient, login: &str) -> RepoSummary {
    match client.get_json::<Vec<Repo>>(&format!("/users/{login}/repos"), &[]).await {
        FetchOutcome::Success(repos) => RepoSummary::aggregate(&repos),
        FetchOutcome::PermanentFailure => {
            log::info!(target: LOG_TARGET, "repository fetch for '{login}' failed permanently, using defaults");
            RepoSummary::default()
        }
    }
}
