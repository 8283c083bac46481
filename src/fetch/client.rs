use crate::Result;
use crate::fetch::FetchOutcome;
use crate::fetch::classify::{Disposition, classify};
use chrono::Utc;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "     fetch";

/// Rate-limit-aware GitHub API client.
///
/// Holds the one `reqwest` client (and with it the credential header) for the
/// whole run; nothing about the request state is mutated after construction.
/// Every stage goes through [`ApiClient::get_json`], which absorbs throttle
/// responses by sleeping the calling task and reissuing the identical request
/// with no retry cap. Callers only ever observe [`FetchOutcome`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Create a client for the given API base URL, optionally authenticated.
    pub fn new(base: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let http = reqwest::Client::builder()
            .user_agent("gh-census")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Issue one logical GET and decode the JSON payload.
    ///
    /// Loops until the request either succeeds or is classified as permanent:
    /// a 403 throttle signal blocks only the calling task for the computed
    /// delay and then retries; any other non-200 status, transport error, or
    /// undecodable payload is logged and returned as a permanent failure.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> FetchOutcome<T> {
        let url = format!("{}{path}", self.base);

        loop {
            let response = match self.http.get(&url).query(query).send().await {
                Ok(response) => response,
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "request to '{url}' failed: {e}");
                    return FetchOutcome::PermanentFailure;
                }
            };

            match classify(response.status(), response.headers(), Utc::now()) {
                Disposition::Success => match response.json::<T>().await {
                    Ok(payload) => return FetchOutcome::Success(payload),
                    Err(e) => {
                        log::warn!(target: LOG_TARGET, "could not decode response from '{url}': {e}");
                        return FetchOutcome::PermanentFailure;
                    }
                },
                Disposition::Throttled(delay) => {
                    log::warn!(
                        target: LOG_TARGET,
                        "rate limit hit on '{url}', retrying in {}s",
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
                Disposition::Failed => {
                    log::warn!(
                        target: LOG_TARGET,
                        "request to '{url}' returned HTTP {}",
                        response.status()
                    );
                    return FetchOutcome::PermanentFailure;
                }
            }
        }
    }
}
