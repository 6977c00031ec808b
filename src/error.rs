//! Error taxonomy for the pagination core

use thiserror::Error;

/// Failure reported by a page or missing-item fetcher.
///
/// Fetchers are implemented by the host app against its own API client, so the
/// payload is a plain message rather than a transport-specific type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a usable response (connectivity, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend refused the request (e.g. content rejected, access denied).
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Errors stored on a paginator or returned from its operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// An initial, refresh or load-more fetch failed. Stored on the paginator
    /// until the caller retries; the item list is left untouched.
    #[error("page fetch failed: {0}")]
    FetchFailed(#[source] FetchError),

    /// `replace_item`/`update_item` targeted an identity key that is not in
    /// the store. Non-fatal; callers may ignore it.
    #[error("no item with key {0} in the list")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Transport("connection reset".into());
        assert_eq!(err.to_string(), "transport error: connection reset");

        let err = FetchError::Rejected("profanity detected".into());
        assert_eq!(err.to_string(), "request rejected: profanity detected");
    }

    #[test]
    fn test_pagination_error_carries_source() {
        use std::error::Error as _;

        let err = PaginationError::FetchFailed(FetchError::Transport("timeout".into()));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "page fetch failed: transport error: timeout");
    }

    #[test]
    fn test_not_found_names_the_key() {
        let err = PaginationError::NotFound("msg-42".into());
        assert_eq!(err.to_string(), "no item with key msg-42 in the list");
    }
}
