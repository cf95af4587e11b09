//! In-memory access resolver for tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::models::UserId;
use crate::domain::search::traits::{Result, SearchError, SiteAccessResolver};
use crate::domain::search::types::SiteScope;

/// Resolver backed by a fixed user → scope table. Unknown users fail access
/// resolution, like a revoked identity would.
#[derive(Clone, Default)]
pub struct MockAccessResolver {
    scopes: Arc<RwLock<HashMap<UserId, SiteScope>>>,
}

#[allow(dead_code)]
impl MockAccessResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(self, user_id: UserId, scope: SiteScope) -> Self {
        self.scopes.write().unwrap().insert(user_id, scope);
        self
    }
}

#[async_trait]
impl SiteAccessResolver for MockAccessResolver {
    async fn resolve(&self, user_id: UserId) -> Result<SiteScope> {
        self.scopes
            .read()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(SearchError::AccessResolution(user_id))
    }
}
