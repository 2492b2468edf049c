use std::fmt;

use headlines_core::SearchResponse;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SearchError {
    pub kind: SearchFailureKind,
    pub message: String,
}

impl SearchError {
    pub(crate) fn new(kind: SearchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
    /// The search task went away without reporting an outcome.
    Disconnected,
}

impl fmt::Display for SearchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailureKind::InvalidUrl => write!(f, "invalid url"),
            SearchFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            SearchFailureKind::Timeout => write!(f, "timeout"),
            SearchFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            SearchFailureKind::Decode => write!(f, "malformed response"),
            SearchFailureKind::Network => write!(f, "network error"),
            SearchFailureKind::Disconnected => write!(f, "search task disconnected"),
        }
    }
}

/// What a background search reports back to the UI-side accumulator.
#[derive(Debug)]
pub(crate) enum SearchEvent {
    Batch(SearchResponse),
    Finished(Result<(), SearchError>),
}
