//! Error types for the Marvel API client.
//!
//! # Design
//! The gateway reports most failures inside the JSON envelope rather than
//! through the HTTP status line, so the variants here follow the envelope's
//! `code` field: throttling, rejected query parameters, and lookups that
//! came back empty each get a dedicated variant. Anything else the gateway
//! reports without a `data` container lands in `Upstream` with the raw code
//! and message.

/// Why a list page or a detail lookup produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmptyPage {
    /// The requested page lies beyond the last page of the list.
    #[error("page {page} is empty, the last page is {last_page}")]
    PastLastPage { page: u32, last_page: u32 },

    /// The gateway answered 404 for a detail lookup by id.
    #[error("{status} with id: {id}")]
    IdNotFound { status: String, id: u64 },

    /// A detail lookup by name matched no item.
    #[error("nothing found named {name}")]
    NameNotFound { name: String },
}

/// Errors returned by `MarvelClient` and `Marvel`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The page limit or another configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The gateway answered `RequestThrottled`.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The gateway answered 409 to a list call, e.g. an unknown `orderBy`.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Nothing to return for the requested page or lookup.
    #[error("empty page: {0}")]
    EmptyPage(EmptyPage),

    /// Pages are 1-indexed.
    #[error("invalid page {0}, pages start at 1")]
    InvalidPage(u32),

    /// Any other error envelope (bad credentials, missing parameters, ...).
    #[error("upstream error [{code}]: {message}")]
    Upstream { code: String, message: String },

    /// The HTTP round-trip itself failed.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body did not match the expected envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// The last page carried by a `PastLastPage` error, if that is what this is.
    pub fn last_page(&self) -> Option<u32> {
        match self {
            ApiError::EmptyPage(EmptyPage::PastLastPage { last_page, .. }) => Some(*last_page),
            _ => None,
        }
    }
}
