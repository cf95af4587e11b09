//! Result cache implementations.
//!
//! Keyed by the full canonical descriptor; entries expire on a short TTL.
//! There is no write invalidation — interaction lists tolerate a staleness
//! window bounded by the TTL.

use std::time::Duration;

use moka::sync::Cache;

use crate::domain::search::traits::PageCache;
use crate::domain::search::types::{QueryDescriptor, ResultPage};

/// In-process moka cache with TTL expiry and bounded capacity.
#[derive(Clone)]
pub struct MokaPageCache {
    inner: Cache<QueryDescriptor, ResultPage>,
}

impl MokaPageCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl PageCache for MokaPageCache {
    fn get(&self, descriptor: &QueryDescriptor) -> Option<ResultPage> {
        self.inner.get(descriptor)
    }

    fn put(&self, descriptor: QueryDescriptor, page: ResultPage) {
        self.inner.insert(descriptor, page);
    }
}

/// Cache that never hits, for deployments that disable result caching.
#[derive(Clone, Copy, Default)]
pub struct NoopPageCache;

impl PageCache for NoopPageCache {
    fn get(&self, _descriptor: &QueryDescriptor) -> Option<ResultPage> {
        None
    }

    fn put(&self, _descriptor: QueryDescriptor, _page: ResultPage) {}
}
