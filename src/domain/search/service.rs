//! Search service: the composition of access resolution, normalization,
//! caching and execution.

use crate::domain::models::UserId;
use crate::domain::search::normalizer::normalize;
use crate::domain::search::traits::{
    InteractionStore, PageCache, Result, SiteAccessResolver,
};
use crate::domain::search::types::{RawQuery, ResultPage};

/// Tunables for query normalization.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Page size used when the caller doesn't ask for one.
    pub default_page_size: u32,
    /// Hard upper bound; larger requests are clamped, never executed.
    pub max_page_size: u32,
    /// Free-text terms are truncated to this many characters.
    pub max_term_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            max_term_length: 200,
        }
    }
}

/// Site-scoped interaction search.
///
/// Every request follows the same path: resolve the caller's site scope,
/// normalize the raw input against it, short-circuit an empty scope, then
/// serve from cache or execute one bounded store read.
///
/// # Type Parameters
///
/// * `A` - resolver mapping a user id to their site scope
/// * `S` - record store executing the canonical query
/// * `C` - best-effort result cache
pub struct SearchService<A, S, C>
where
    A: SiteAccessResolver,
    S: InteractionStore,
    C: PageCache,
{
    access: A,
    store: S,
    cache: C,
    config: SearchConfig,
}

impl<A, S, C> SearchService<A, S, C>
where
    A: SiteAccessResolver,
    S: InteractionStore,
    C: PageCache,
{
    pub fn new(access: A, store: S, cache: C, config: SearchConfig) -> Self {
        Self {
            access,
            store,
            cache,
            config,
        }
    }

    /// Execute a search on behalf of `user_id`.
    ///
    /// # Errors
    ///
    /// * [`SearchError::AccessResolution`] — unknown/revoked identity
    /// * [`SearchError::ForbiddenScope`] — requested site outside the scope
    /// * [`SearchError::Validation`] — malformed field/sort/page input
    /// * [`SearchError::Unavailable`] — record store failure (no retry here)
    ///
    /// [`SearchError::AccessResolution`]: crate::domain::search::SearchError::AccessResolution
    /// [`SearchError::ForbiddenScope`]: crate::domain::search::SearchError::ForbiddenScope
    /// [`SearchError::Validation`]: crate::domain::search::SearchError::Validation
    /// [`SearchError::Unavailable`]: crate::domain::search::SearchError::Unavailable
    pub async fn search(&self, user_id: UserId, raw: RawQuery) -> Result<ResultPage> {
        let scope = self.access.resolve(user_id).await?;
        let descriptor = normalize(raw, &scope, &self.config)?;

        // No site access resolves to zero results, never to an unscoped query.
        if descriptor.sites.is_empty() {
            tracing::debug!(user = %user_id, "search with empty scope, returning empty page");
            return Ok(ResultPage::empty(descriptor.page, descriptor.page_size));
        }

        if let Some(page) = self.cache.get(&descriptor) {
            tracing::debug!(user = %user_id, page = descriptor.page, "search cache hit");
            return Ok(page);
        }

        let page = self.store.search(&descriptor).await?;
        self.cache.put(descriptor, page.clone());

        Ok(page)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{InteractionId, SiteId};
    use crate::domain::search::access::MockAccessResolver;
    use crate::domain::search::cache::{MokaPageCache, NoopPageCache};
    use crate::domain::search::store::MockInteractionStore;
    use crate::domain::search::traits::SearchError;
    use crate::domain::search::types::SiteScope;
    use crate::domain::{Interaction, InteractionKind, SiteRole};
    use std::collections::HashMap;
    use std::time::Duration;
    use time::macros::datetime;

    const SITE_A: i32 = 1;
    const SITE_B: i32 = 2;
    const SITE_C: i32 = 3;

    fn interaction(id: i64, site: i32, title: &str) -> Interaction {
        let base = datetime!(2026-01-01 09:00 UTC);
        Interaction {
            id: InteractionId::new(id),
            site_id: SiteId::new(site),
            title: title.to_string(),
            kind: InteractionKind::Meeting,
            starts_at: base + time::Duration::hours(id),
            ends_at: None,
            timezone: Some("Europe/Stockholm".to_string()),
            participants: vec!["ana@example.com".to_string()],
            notes: None,
            created_by: crate::domain::models::UserId::new(1),
            created_at: base + time::Duration::minutes(id),
            updated_at: base + time::Duration::minutes(id),
        }
    }

    fn seeded_store() -> MockInteractionStore {
        MockInteractionStore::new().with_interactions(vec![
            interaction(1, SITE_A, "kickoff meeting"),
            interaction(2, SITE_A, "pricing call"),
            interaction(3, SITE_B, "renewal review"),
            interaction(4, SITE_C, "secret other-tenant sync"),
        ])
    }

    fn resolver_ab(user: i32) -> MockAccessResolver {
        MockAccessResolver::new().with_scope(
            UserId::new(user),
            SiteScope::new([
                (SiteId::new(SITE_A), SiteRole::Member),
                (SiteId::new(SITE_B), SiteRole::Admin),
            ]),
        )
    }

    fn service(
        resolver: MockAccessResolver,
        store: MockInteractionStore,
    ) -> SearchService<MockAccessResolver, MockInteractionStore, NoopPageCache> {
        SearchService::new(resolver, store, NoopPageCache, SearchConfig::default())
    }

    #[tokio::test]
    async fn results_never_leak_outside_scope() {
        let svc = service(resolver_ab(7), seeded_store());

        let page = svc.search(UserId::new(7), RawQuery::default()).await.unwrap();

        assert_eq!(page.total, 3);
        assert!(page
            .items
            .iter()
            .all(|i| [SITE_A, SITE_B].contains(&i.site_id.as_i32())));
    }

    #[tokio::test]
    async fn requesting_unauthorized_site_is_forbidden_not_empty() {
        let svc = service(resolver_ab(7), seeded_store());

        let raw = RawQuery {
            site_id: Some(SiteId::new(SITE_C)),
            ..Default::default()
        };
        let err = svc.search(UserId::new(7), raw).await.unwrap_err();
        assert!(matches!(err, SearchError::ForbiddenScope(site) if site.as_i32() == SITE_C));
    }

    #[tokio::test]
    async fn unknown_user_fails_access_resolution() {
        let svc = service(MockAccessResolver::new(), seeded_store());

        let err = svc
            .search(UserId::new(99), RawQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::AccessResolution(user) if user.as_i32() == 99));
    }

    #[tokio::test]
    async fn empty_scope_returns_empty_page_without_store_read() {
        let store = seeded_store();
        let resolver =
            MockAccessResolver::new().with_scope(UserId::new(7), SiteScope::empty());
        let svc = service(resolver, store.clone());

        let page = svc.search(UserId::new(7), RawQuery::default()).await.unwrap();

        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
        assert_eq!(store.search_calls(), 0);
    }

    #[tokio::test]
    async fn identical_requests_return_identical_ordering() {
        // Same created_at on two records forces the id tie-break.
        let mut twin_a = interaction(10, SITE_A, "weekly sync");
        let twin_b = interaction(11, SITE_A, "weekly sync");
        twin_a.created_at = twin_b.created_at;
        twin_a.updated_at = twin_b.updated_at;
        let store = MockInteractionStore::new().with_interactions(vec![twin_b, twin_a]);
        let svc = service(resolver_ab(7), store);

        let first = svc.search(UserId::new(7), RawQuery::default()).await.unwrap();
        let second = svc.search(UserId::new(7), RawQuery::default()).await.unwrap();

        let ids = |p: &ResultPage| p.items.iter().map(|i| i.id.as_i64()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        // Descending default sort: higher id wins the tie.
        assert_eq!(ids(&first), vec![11, 10]);
    }

    #[tokio::test]
    async fn pagination_never_skips_or_duplicates() {
        let store = MockInteractionStore::new().with_interactions(
            (1..=5)
                .map(|i| interaction(i, SITE_A, "touchpoint"))
                .collect(),
        );
        let svc = service(resolver_ab(7), store);

        let mut seen = Vec::new();
        for page_no in 1..=3 {
            let raw = RawQuery {
                page: Some(page_no),
                page_size: Some(2),
                ..Default::default()
            };
            let page = svc.search(UserId::new(7), raw).await.unwrap();
            assert_eq!(page.total, 5);
            seen.extend(page.items.iter().map(|i| i.id.as_i64()));
        }

        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn filters_and_term_narrow_results() {
        let store = seeded_store();
        let svc = service(resolver_ab(7), store);

        let raw = RawQuery {
            term: Some("pricing".into()),
            ..Default::default()
        };
        let page = svc.search(UserId::new(7), raw).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "pricing call");

        let raw = RawQuery {
            filters: HashMap::from([(
                "participant".to_string(),
                "nobody@example.com".to_string(),
            )]),
            ..Default::default()
        };
        let page = svc.search(UserId::new(7), raw).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn soft_deleted_records_stay_hidden() {
        let store = seeded_store();
        store.mark_deleted(InteractionId::new(2));
        let svc = service(resolver_ab(7), store);

        let page = svc.search(UserId::new(7), RawQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|i| i.id.as_i64() != 2));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_unavailable() {
        let store = seeded_store();
        store.set_failing(true);
        let svc = service(resolver_ab(7), store);

        let err = svc
            .search(UserId::new(7), RawQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Unavailable(_)));
    }

    #[tokio::test]
    async fn second_identical_search_within_ttl_hits_cache() {
        let store = seeded_store();
        let svc = SearchService::new(
            resolver_ab(7),
            store.clone(),
            MokaPageCache::new(100, Duration::from_secs(30)),
            SearchConfig::default(),
        );

        let first = svc.search(UserId::new(7), RawQuery::default()).await.unwrap();
        let second = svc.search(UserId::new(7), RawQuery::default()).await.unwrap();

        assert_eq!(store.search_calls(), 1);
        assert_eq!(first.total, second.total);

        // A different page is a different cache key.
        let raw = RawQuery {
            page: Some(2),
            ..Default::default()
        };
        svc.search(UserId::new(7), raw).await.unwrap();
        assert_eq!(store.search_calls(), 2);
    }

    #[tokio::test]
    async fn cache_expires_after_ttl() {
        let store = seeded_store();
        let svc = SearchService::new(
            resolver_ab(7),
            store.clone(),
            MokaPageCache::new(100, Duration::from_millis(40)),
            SearchConfig::default(),
        );

        svc.search(UserId::new(7), RawQuery::default()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        svc.search(UserId::new(7), RawQuery::default()).await.unwrap();

        assert_eq!(store.search_calls(), 2);
    }
}
