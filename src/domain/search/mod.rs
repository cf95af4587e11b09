//! Site-scoped interaction search.
//!
//! The pipeline: [`SiteAccessResolver`] maps an identity to its site scope,
//! [`normalizer`] turns raw input plus scope into a canonical
//! [`QueryDescriptor`], [`SearchService`] consults the [`PageCache`] and
//! finally executes one bounded read through an [`InteractionStore`].

pub mod access;
pub mod cache;
pub mod normalizer;
pub mod store;

mod service;
mod traits;
mod types;

pub use service::{SearchConfig, SearchService};
pub use traits::{InteractionStore, PageCache, SearchError, SiteAccessResolver};
pub use types::{QueryDescriptor, RawQuery, ResultPage, SiteScope, SortDir, SortKey};
