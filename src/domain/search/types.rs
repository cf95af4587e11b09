//! Core types for the site-scoped search domain.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::models::SiteId;
use crate::domain::{Interaction, InteractionKind, SiteRole};

/// The set of sites a caller is authorized to query, with the role held at
/// each. Ordered so that derived scopes are canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteScope {
    entries: BTreeMap<SiteId, SiteRole>,
}

impl SiteScope {
    pub fn new(entries: impl IntoIterator<Item = (SiteId, SiteRole)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, site: SiteId) -> bool {
        self.entries.contains_key(&site)
    }

    pub fn role_at(&self, site: SiteId) -> Option<SiteRole> {
        self.entries.get(&site).copied()
    }

    /// Authorized site ids in ascending order.
    pub fn site_ids(&self) -> Vec<SiteId> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SiteId, SiteRole)> + '_ {
        self.entries.iter().map(|(id, role)| (*id, *role))
    }
}

/// Raw, untrusted search input as received from the HTTP layer.
///
/// Everything here is optional and unvalidated; the normalizer turns it into
/// a [`QueryDescriptor`] or rejects it.
#[derive(Debug, Clone, Default)]
pub struct RawQuery {
    pub term: Option<String>,
    /// Field-level filter predicates, keyed by wire field name.
    pub filters: HashMap<String, String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub site_id: Option<SiteId>,
}

/// Sort keys a caller may request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::EnumString, strum::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    StartsAt,
    Title,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::EnumString, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Canonical, validated representation of one search request.
///
/// Immutable and fully self-describing: the scope restriction is baked into
/// `sites`, so the executor never re-derives authorization. Also serves as
/// the result-cache key, which is why it is `Hash + Eq` — any field
/// difference, page number included, is a different cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    /// Trimmed, length-capped free-text term. `None` means match-all.
    pub term: Option<String>,
    pub kind: Option<InteractionKind>,
    pub participant: Option<String>,
    pub starts_after: Option<OffsetDateTime>,
    pub starts_before: Option<OffsetDateTime>,
    pub sort: SortKey,
    pub dir: SortDir,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    /// Sorted, deduplicated site restriction. Empty means the caller has no
    /// access anywhere; such a descriptor must short-circuit to an empty
    /// page and never reach the store.
    pub sites: Vec<SiteId>,
}

impl QueryDescriptor {
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// One page of search results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub items: Vec<Interaction>,
    /// Total number of matches across all pages.
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl ResultPage {
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
        }
    }
}
