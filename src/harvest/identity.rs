use serde::Deserialize;

/// A discovered user reference, prior to enrichment.
///
/// Identities are not deduplicated across queries or pages; overlapping
/// search windows can surface the same user more than once and each
/// occurrence flows through enrichment independently.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub login: String,

    #[serde(default)]
    pub html_url: String,
}

/// Payload of the user-search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<Identity>,
}
