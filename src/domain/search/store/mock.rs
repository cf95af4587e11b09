//! In-memory store implementation for tests.
//!
//! Mirrors the Postgres executor's semantics (scope restriction, filters,
//! deterministic ordering with id tie-break, pagination) so service tests
//! can assert on real paging behavior without a database.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::models::InteractionId;
use crate::domain::search::traits::{InteractionStore, Result, SearchError};
use crate::domain::search::types::{QueryDescriptor, ResultPage, SortDir, SortKey};
use crate::domain::Interaction;

#[derive(Clone, Default)]
pub struct MockInteractionStore {
    interactions: Arc<RwLock<Vec<Interaction>>>,
    deleted: Arc<RwLock<HashSet<InteractionId>>>,
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interactions(self, interactions: Vec<Interaction>) -> Self {
        self.interactions.write().unwrap().extend(interactions);
        self
    }

    /// Mark a record soft-deleted; it must never surface again.
    pub fn mark_deleted(&self, id: InteractionId) {
        self.deleted.write().unwrap().insert(id);
    }

    /// Make every subsequent search fail as unavailable.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, AtomicOrdering::SeqCst);
    }

    /// Number of times `search` hit this store (for cache assertions).
    pub fn search_calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }
}

fn matches(descriptor: &QueryDescriptor, interaction: &Interaction) -> bool {
    if !descriptor.sites.contains(&interaction.site_id) {
        return false;
    }
    if let Some(kind) = descriptor.kind {
        if interaction.kind != kind {
            return false;
        }
    }
    if let Some(ref participant) = descriptor.participant {
        if !interaction.participants.iter().any(|p| p == participant) {
            return false;
        }
    }
    if let Some(after) = descriptor.starts_after {
        if interaction.starts_at < after {
            return false;
        }
    }
    if let Some(before) = descriptor.starts_before {
        if interaction.starts_at >= before {
            return false;
        }
    }
    if let Some(ref term) = descriptor.term {
        let term = term.to_lowercase();
        let in_title = interaction.title.to_lowercase().contains(&term);
        let in_notes = interaction
            .notes
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&term));
        if !in_title && !in_notes {
            return false;
        }
    }
    true
}

fn compare(descriptor: &QueryDescriptor, a: &Interaction, b: &Interaction) -> Ordering {
    let primary = match descriptor.sort {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::StartsAt => a.starts_at.cmp(&b.starts_at),
        SortKey::Title => a.title.cmp(&b.title),
    };
    let ordering = primary.then(a.id.cmp(&b.id));
    match descriptor.dir {
        SortDir::Asc => ordering,
        SortDir::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl InteractionStore for MockInteractionStore {
    async fn search(&self, descriptor: &QueryDescriptor) -> Result<ResultPage> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);

        if self.fail.load(AtomicOrdering::SeqCst) {
            return Err(SearchError::Unavailable("mock store down".into()));
        }

        if descriptor.sites.is_empty() {
            return Ok(ResultPage::empty(descriptor.page, descriptor.page_size));
        }

        let deleted = self.deleted.read().unwrap();
        let mut hits: Vec<Interaction> = self
            .interactions
            .read()
            .unwrap()
            .iter()
            .filter(|i| !deleted.contains(&i.id))
            .filter(|i| matches(descriptor, i))
            .cloned()
            .collect();

        hits.sort_by(|a, b| compare(descriptor, a, b));

        let total = hits.len() as i64;
        let items = hits
            .into_iter()
            .skip(descriptor.offset() as usize)
            .take(descriptor.limit() as usize)
            .collect();

        Ok(ResultPage {
            items,
            total,
            page: descriptor.page,
            page_size: descriptor.page_size,
        })
    }
}
