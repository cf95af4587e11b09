use sqlx::PgPool;

use crate::domain::models::{InteractionId, UserId};
use crate::domain::{Interaction, InteractionUpdate, NewInteraction};

use super::repo_error::RepositoryError;

const INTERACTION_COLUMNS: &str = "id, site_id, title, kind, starts_at, ends_at, timezone, \
     participants, notes, created_by, created_at, updated_at";

pub trait InteractionRepository {
    async fn create(
        &self,
        created_by: UserId,
        new: &NewInteraction,
    ) -> Result<Interaction, RepositoryError>;
    async fn get(&self, id: InteractionId) -> Result<Interaction, RepositoryError>;
    async fn update(
        &self,
        id: InteractionId,
        update: &InteractionUpdate,
    ) -> Result<Interaction, RepositoryError>;
    async fn soft_delete(&self, id: InteractionId) -> Result<(), RepositoryError>;
}

#[derive(Clone)]
pub struct InteractionRepositoryImpl {
    pool: PgPool,
}

impl InteractionRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl InteractionRepository for InteractionRepositoryImpl {
    async fn create(
        &self,
        created_by: UserId,
        new: &NewInteraction,
    ) -> Result<Interaction, RepositoryError> {
        let interaction = sqlx::query_as::<_, Interaction>(&format!(
            r#"
            INSERT INTO interactions
                (site_id, title, kind, starts_at, ends_at, timezone, participants, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {INTERACTION_COLUMNS}
            "#
        ))
        .bind(new.site_id)
        .bind(&new.title)
        .bind(new.kind)
        .bind(new.starts_at)
        .bind(new.ends_at)
        .bind(&new.timezone)
        .bind(&new.participants)
        .bind(&new.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(interaction)
    }

    async fn get(&self, id: InteractionId) -> Result<Interaction, RepositoryError> {
        sqlx::query_as::<_, Interaction>(&format!(
            r#"
            SELECT {INTERACTION_COLUMNS}
            FROM interactions
            WHERE id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("interaction {id}")))
    }

    async fn update(
        &self,
        id: InteractionId,
        update: &InteractionUpdate,
    ) -> Result<Interaction, RepositoryError> {
        sqlx::query_as::<_, Interaction>(&format!(
            r#"
            UPDATE interactions
            SET title = COALESCE($2, title),
                kind = COALESCE($3, kind),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                timezone = COALESCE($6, timezone),
                participants = COALESCE($7, participants),
                notes = COALESCE($8, notes),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {INTERACTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.title)
        .bind(update.kind)
        .bind(update.starts_at)
        .bind(update.ends_at)
        .bind(&update.timezone)
        .bind(&update.participants)
        .bind(&update.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("interaction {id}")))
    }

    async fn soft_delete(&self, id: InteractionId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE interactions
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("interaction {id}")));
        }

        Ok(())
    }
}
