//! PostgreSQL site access resolver.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;

use crate::domain::models::{SiteId, UserId};
use crate::domain::search::traits::{Result, SearchError, SiteAccessResolver};
use crate::domain::search::types::SiteScope;
use crate::domain::SiteRole;

/// Resolves scope from `users` + `user_sites`.
///
/// An unknown or revoked user fails with [`SearchError::AccessResolution`];
/// a known user with no memberships resolves to an empty scope, which is a
/// valid "zero results" answer, not an error.
#[derive(Clone)]
pub struct PgSiteAccessResolver {
    pool: PgPool,
}

impl PgSiteAccessResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteAccessResolver for PgSiteAccessResolver {
    async fn resolve(&self, user_id: UserId) -> Result<SiteScope> {
        let user_row = sqlx::query("SELECT revoked_at FROM users WHERE id = $1")
            .bind(user_id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        let Some(user_row) = user_row else {
            return Err(SearchError::AccessResolution(user_id));
        };
        let revoked_at: Option<OffsetDateTime> = user_row.try_get("revoked_at")?;
        if revoked_at.is_some() {
            return Err(SearchError::AccessResolution(user_id));
        }

        let memberships: Vec<(SiteId, SiteRole)> =
            sqlx::query_as("SELECT site_id, role FROM user_sites WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_all(&self.pool)
                .await?;

        Ok(SiteScope::new(memberships))
    }
}
