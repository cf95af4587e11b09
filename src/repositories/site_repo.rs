use serde::Serialize;
use sqlx::PgPool;

use crate::domain::models::{SiteId, UserId};
use crate::domain::{Site, SiteRole};

use super::repo_error::RepositoryError;

/// A site together with the role the caller holds there.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMembership {
    #[serde(flatten)]
    pub site: Site,
    pub role: SiteRole,
}

pub trait SiteRepository {
    async fn sites_for_user(&self, user_id: UserId)
        -> Result<Vec<SiteMembership>, RepositoryError>;
    async fn get_site(&self, id: SiteId) -> Result<Site, RepositoryError>;
}

#[derive(Clone)]
pub struct SiteRepositoryImpl {
    pool: PgPool,
}

impl SiteRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SiteRepository for SiteRepositoryImpl {
    async fn sites_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<SiteMembership>, RepositoryError> {
        let rows: Vec<(SiteId, String, Option<String>, SiteRole)> = sqlx::query_as(
            r#"
            SELECT s.id, s.name, s.description, us.role
            FROM sites s
            JOIN user_sites us ON us.site_id = s.id
            WHERE us.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, description, role)| SiteMembership {
                site: Site {
                    id,
                    name,
                    description,
                },
                role,
            })
            .collect())
    }

    async fn get_site(&self, id: SiteId) -> Result<Site, RepositoryError> {
        sqlx::query_as::<_, Site>(
            r#"
            SELECT id, name, description
            FROM sites
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("site {id}")))
    }
}
