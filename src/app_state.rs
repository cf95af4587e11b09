use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::Settings;
use crate::domain::search::access::PgSiteAccessResolver;
use crate::domain::search::cache::{MokaPageCache, NoopPageCache};
use crate::domain::search::store::PgInteractionStore;
use crate::domain::search::{PageCache, SearchService};
use crate::repositories::{InteractionRepositoryImpl, SiteRepositoryImpl};

pub type AppSearchService =
    SearchService<PgSiteAccessResolver, PgInteractionStore, Box<dyn PageCache>>;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub search: Arc<AppSearchService>,
    pub access: Arc<PgSiteAccessResolver>,
    pub interactions: Arc<InteractionRepositoryImpl>,
    pub sites: Arc<SiteRepositoryImpl>,
}

impl AppState {
    pub fn new(db_pool: PgPool, settings: &Settings) -> Self {
        let cache: Box<dyn PageCache> = if settings.search.cache_enabled {
            Box::new(MokaPageCache::new(
                settings.search.cache_capacity,
                Duration::from_secs(settings.search.cache_ttl_seconds),
            ))
        } else {
            Box::new(NoopPageCache)
        };

        let search = SearchService::new(
            PgSiteAccessResolver::new(db_pool.clone()),
            PgInteractionStore::new(db_pool.clone()),
            cache,
            (&settings.search).into(),
        );

        Self {
            search: Arc::new(search),
            access: Arc::new(PgSiteAccessResolver::new(db_pool.clone())),
            interactions: Arc::new(InteractionRepositoryImpl::new(db_pool.clone())),
            sites: Arc::new(SiteRepositoryImpl::new(db_pool.clone())),
            db_pool,
        }
    }
}
