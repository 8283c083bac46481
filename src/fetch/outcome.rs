/// The only two results a caller ever sees from the fetcher.
///
/// Throttling is absorbed inside the retry loop and never surfaces here;
/// everything that is not a decoded 200 payload collapses into
/// `PermanentFailure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The request succeeded and the payload was decoded.
    Success(T),

    /// The request failed in a way that is not worth retrying.
    PermanentFailure,
}

impl<T> FetchOutcome<T> {
    /// Returns `true` if the outcome is `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts this outcome into an `Option`, returning `Some` only for `Success`.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::PermanentFailure => None,
        }
    }
}
