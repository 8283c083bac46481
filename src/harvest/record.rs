//! Record composition: the pure merge of one identity's enrichment results.

use crate::harvest::identity::Identity;
use crate::harvest::profile::ProfileDetail;
use crate::harvest::repos::RepoSummary;
use indexmap::IndexMap;

/// Separator for the joined language and topic fields.
const JOIN_SEPARATOR: &str = ", ";

/// One fully merged, flat row of the dataset.
///
/// A record exists for every identity whose profile fetch succeeded, even when
/// repository aggregation failed and fell back to defaults.
#[derive(Debug, Clone)]
pub struct Record {
    pub username: String,
    pub profile_url: String,
    pub country: String,
    pub repo_count: u64,
    pub followers: u64,
    pub following: u64,
    pub top_languages: String,
    pub most_used_language: String,
    pub total_stars: u64,
    pub total_forks: u64,
    pub public_gists: u64,
    pub created_at: String,
    pub bio: String,
    pub email: String,
    pub hireable: bool,
    pub forked_count: u64,
    pub last_activity: String,
    pub topics: String,
    pub total_size_kb: u64,
}

impl Record {
    /// Merge the per-identity stage outputs into one record.
    #[must_use]
    pub fn compose(identity: Identity, profile: ProfileDetail, repos: RepoSummary) -> Self {
        Self {
            username: identity.login,
            profile_url: identity.html_url,
            country: profile.country,
            repo_count: repos.repo_count,
            followers: profile.followers,
            following: profile.following,
            top_languages: join(repos.languages.keys()),
            most_used_language: most_used_language(&repos.languages),
            total_stars: repos.total_stars,
            total_forks: repos.total_forks,
            public_gists: profile.public_gists,
            created_at: profile.created_at,
            bio: profile.bio,
            email: profile.email,
            hireable: profile.hireable,
            forked_count: repos.forked_count,
            last_activity: repos.last_activity.unwrap_or_else(|| "N/A".to_string()),
            topics: join(repos.topics.iter()),
            total_size_kb: repos.total_size_kb,
        }
    }
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items.map(String::as_str).collect::<Vec<_>>().join(JOIN_SEPARATOR)
}

/// The language with the highest count, ties broken by first-encountered
/// insertion order; the literal `"None"` for an empty histogram.
fn most_used_language(histogram: &IndexMap<String, u64>) -> String {
    let mut best: Option<(&String, u64)> = None;
    for (language, &count) in histogram {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((language, count)),
        }
    }

    best.map_or_else(|| "None".to_string(), |(language, _)| language.clone())
}
