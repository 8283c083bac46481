//! Pure response classification and backoff computation.

use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// Fallback delay when a throttle response carries neither backoff header.
const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_secs(60);

/// GitHub's rate-limit reset header, a Unix epoch timestamp in seconds.
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// What to do with one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// 200; hand the payload to the caller.
    Success,

    /// 403 throttle signal; sleep for the computed delay and reissue the
    /// identical request.
    Throttled(Duration),

    /// Any other status; give up on this request immediately.
    Failed,
}

/// Classify a response by status code, computing the backoff delay for
/// throttle responses from the headers.
#[must_use]
pub fn classify(status: StatusCode, headers: &HeaderMap, now: DateTime<Utc>) -> Disposition {
    match status {
        StatusCode::OK => Disposition::Success,
        StatusCode::FORBIDDEN => Disposition::Throttled(throttle_delay(headers, now)),
        _ => Disposition::Failed,
    }
}

/// Compute how long to wait before retrying a throttled request.
///
/// Priority order: `Retry-After` in seconds if present, otherwise the
/// rate-limit reset timestamp relative to `now`, otherwise a fixed 60s.
/// The result is never below one second.
#[must_use]
pub fn throttle_delay(headers: &HeaderMap, now: DateTime<Utc>) -> Duration {
    if let Some(secs) = parse_retry_after(headers) {
        return Duration::from_secs(secs.max(1));
    }

    if let Some(reset) = parse_rate_limit_reset(headers) {
        let wait = reset.saturating_sub(now.timestamp()).max(1);
        return Duration::from_secs(wait.unsigned_abs());
    }

    DEFAULT_THROTTLE_DELAY
}

/// Parse the `Retry-After` header value as seconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    let s = headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())?;
    s.parse::<u64>().ok()
}

/// Parse the rate-limit reset header value as a Unix timestamp.
fn parse_rate_limit_reset(headers: &HeaderMap) -> Option<i64> {
    let s = headers.get(RATE_LIMIT_RESET).and_then(|h| h.to_str().ok())?;
    s.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, String)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            let _ = map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn retry_after_wins_over_reset() {
        let now = Utc::now();
        let map = headers(&[
            ("retry-after", "17".to_string()),
            (RATE_LIMIT_RESET, (now.timestamp() + 500).to_string()),
        ]);

        assert_eq!(throttle_delay(&map, now), Duration::from_secs(17));
    }

    #[test]
    fn reset_timestamp_is_relative_to_now() {
        let now = Utc::now();
        let map = headers(&[(RATE_LIMIT_RESET, (now.timestamp() + 120).to_string())]);

        assert_eq!(throttle_delay(&map, now), Duration::from_secs(120));
    }

    #[test]
    fn reset_in_the_past_waits_one_second() {
        let now = Utc::now();
        let map = headers(&[(RATE_LIMIT_RESET, (now.timestamp() - 30).to_string())]);

        assert_eq!(throttle_delay(&map, now), Duration::from_secs(1));
    }

    #[test]
    fn no_headers_means_default_delay() {
        assert_eq!(throttle_delay(&HeaderMap::new(), Utc::now()), Duration::from_secs(60));
    }

    #[test]
    fn zero_retry_after_is_clamped_to_one_second() {
        let map = headers(&[("retry-after", "0".to_string())]);
        assert_eq!(throttle_delay(&map, Utc::now()), Duration::from_secs(1));
    }

    #[test]
    fn unparseable_retry_after_falls_through_to_reset() {
        let now = Utc::now();
        let map = headers(&[
            ("retry-after", "soon".to_string()),
            (RATE_LIMIT_RESET, (now.timestamp() + 5).to_string()),
        ]);

        assert_eq!(throttle_delay(&map, now), Duration::from_secs(5));
    }

    #[test]
    fn status_dispositions() {
        let now = Utc::now();
        let empty = HeaderMap::new();

        assert_eq!(classify(StatusCode::OK, &empty, now), Disposition::Success);
        assert!(matches!(
            classify(StatusCode::FORBIDDEN, &empty, now),
            Disposition::Throttled(_)
        ));
        assert_eq!(classify(StatusCode::NOT_FOUND, &empty, now), Disposition::Failed);
        assert_eq!(classify(StatusCode::INTERNAL_SERVER_ERROR, &empty, now), Disposition::Failed);
        assert_eq!(classify(StatusCode::TOO_MANY_REQUESTS, &empty, now), Disposition::Failed);
    }
}
