//! Profile enrichment stage.
//!
//! Fetched first per identity: a permanent failure here drops the identity
//! from the run entirely, so nothing downstream runs for it.

use crate::fetch::{ApiClient, FetchOutcome};
use serde::Deserialize;

const LOG_TARGET: &str = "   profile";

/// Wire model of the profile-detail endpoint. Every field is optional in the
/// payload; defaults are applied during extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub followers: u64,

    #[serde(default)]
    pub following: u64,

    #[serde(default)]
    pub public_gists: u64,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub hireable: Option<bool>,

    #[serde(default)]
    pub location: Option<String>,
}

/// The fixed field set extracted from a profile payload, with the documented
/// sentinel defaults filled in for absent keys.
#[derive(Debug, Clone)]
pub struct ProfileDetail {
    pub followers: u64,
    pub following: u64,
    pub public_gists: u64,
    pub created_at: String,
    pub bio: String,
    pub email: String,
    pub hireable: bool,
    pub country: String,
}

impl From<Profile> for ProfileDetail {
    fn from(profile: Profile) -> Self {
        Self {
            followers: profile.followers,
            following: profile.following,
            public_gists: profile.public_gists,
            created_at: profile.created_at.unwrap_or_else(|| "N/A".to_string()),
            bio: profile.bio.unwrap_or_else(|| "N/A".to_string()),
            email: profile.email.unwrap_or_else(|| "N/A".to_string()),
            hireable: profile.hireable.unwrap_or(false),
            country: profile.location.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Fetch and extract the profile detail for one identity.
///
/// Returns `None` on permanent failure; the caller drops the identity.
pub async fn enrich(client: &ApiClient, login: &str) -> Option<ProfileDetail> {
    match client.get_json::<Profile>(&format!("/users/{login}"), &[]).await {
        FetchOutcome::Success(profile) => Some(ProfileDetail::from(profile)),
        FetchOutcome::PermanentFailure => {
            log::info!(target: LOG_TARGET, "profile fetch for '{login}' failed permanently");
            None
        }
    }
}
