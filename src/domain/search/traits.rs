//! Trait seams and error taxonomy for the search domain.
//!
//! The traits exist so the service can be exercised in tests with in-memory
//! implementations instead of Postgres.

use async_trait::async_trait;

use crate::domain::models::{SiteId, UserId};
use crate::domain::search::types::{QueryDescriptor, ResultPage, SiteScope};

/// Error taxonomy for search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The identity could not be mapped to site access (unknown or revoked
    /// user). Treated as unauthenticated, never as "no sites".
    #[error("could not resolve site access for user {0}")]
    AccessResolution(UserId),

    /// The caller asked for a site outside their authorized scope. Rejected
    /// loudly instead of narrowing, so an empty page can't masquerade as
    /// "no matches".
    #[error("site {0} is outside the caller's authorized scope")]
    ForbiddenScope(SiteId),

    /// Malformed input, with the offending field named.
    #[error("invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The record store failed (timeout, connection loss). Retry policy
    /// belongs to the caller.
    #[error("search backend unavailable: {0}")]
    Unavailable(String),
}

impl SearchError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SearchError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for SearchError {
    fn from(e: sqlx::Error) -> Self {
        SearchError::Unavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Resolves which sites an authenticated user may query, and the role held
/// at each. Pure read; an empty scope is a valid answer.
#[async_trait]
pub trait SiteAccessResolver: Send + Sync {
    async fn resolve(&self, user_id: UserId) -> Result<SiteScope>;
}

/// Executes one bounded, scope-restricted read against the record store.
///
/// Implementations must honor the descriptor exactly: the site restriction
/// is always applied, ordering is deterministic (sort key, then record id),
/// and soft-deleted rows never surface.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn search(&self, descriptor: &QueryDescriptor) -> Result<ResultPage>;
}

/// Best-effort memoization of executor output keyed by the canonical
/// descriptor. A miss (or an absent cache) degrades to direct execution and
/// is never an error.
pub trait PageCache: Send + Sync {
    fn get(&self, descriptor: &QueryDescriptor) -> Option<ResultPage>;
    fn put(&self, descriptor: QueryDescriptor, page: ResultPage);
}

impl<T: PageCache + ?Sized> PageCache for Box<T> {
    fn get(&self, descriptor: &QueryDescriptor) -> Option<ResultPage> {
        (**self).get(descriptor)
    }

    fn put(&self, descriptor: QueryDescriptor, page: ResultPage) {
        (**self).put(descriptor, page)
    }
}
