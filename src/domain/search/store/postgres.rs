//! PostgreSQL search executor.
//!
//! Composes one bounded, parameterized query pair (count + page) from a
//! canonical descriptor. The site-scope restriction is the first predicate
//! and is never optional; a descriptor with an empty scope returns an empty
//! page without touching the database.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::search::traits::{InteractionStore, Result};
use crate::domain::search::types::{QueryDescriptor, ResultPage, SortDir, SortKey};
use crate::domain::Interaction;

const SELECT_COLUMNS: &str = "id, site_id, title, kind, starts_at, ends_at, timezone, \
     participants, notes, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the WHERE clause shared by the count and page queries.
fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, descriptor: &QueryDescriptor) {
    let site_ids: Vec<i32> = descriptor.sites.iter().map(|s| s.as_i32()).collect();

    builder.push(" WHERE deleted_at IS NULL AND site_id = ANY(");
    builder.push_bind(site_ids);
    builder.push(")");

    if let Some(kind) = descriptor.kind {
        builder.push(" AND kind = ");
        builder.push_bind(kind);
    }

    if let Some(ref participant) = descriptor.participant {
        builder.push(" AND ");
        builder.push_bind(participant.clone());
        builder.push(" = ANY(participants)");
    }

    if let Some(after) = descriptor.starts_after {
        builder.push(" AND starts_at >= ");
        builder.push_bind(after);
    }

    if let Some(before) = descriptor.starts_before {
        builder.push(" AND starts_at < ");
        builder.push_bind(before);
    }

    if let Some(ref term) = descriptor.term {
        let pattern = format!("%{}%", escape_like(term));
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR notes ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

/// Ordering is deterministic: the requested sort key, then the record id in
/// the same direction. Identical descriptors therefore paginate without
/// skipping or duplicating rows even when the sort key has duplicates.
fn push_ordering(builder: &mut QueryBuilder<'_, Postgres>, descriptor: &QueryDescriptor) {
    let column = match descriptor.sort {
        SortKey::CreatedAt => "created_at",
        SortKey::UpdatedAt => "updated_at",
        SortKey::StartsAt => "starts_at",
        SortKey::Title => "title",
    };
    let direction = match descriptor.dir {
        SortDir::Asc => "ASC",
        SortDir::Desc => "DESC",
    };

    builder.push(format!(" ORDER BY {column} {direction}, id {direction}"));
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn search(&self, descriptor: &QueryDescriptor) -> Result<ResultPage> {
        if descriptor.sites.is_empty() {
            // An unscoped query must be impossible by construction.
            return Ok(ResultPage::empty(descriptor.page, descriptor.page_size));
        }

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM interactions");
        push_predicates(&mut count_query, descriptor);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        if total == 0 {
            return Ok(ResultPage::empty(descriptor.page, descriptor.page_size));
        }

        let mut page_query =
            QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM interactions"));
        push_predicates(&mut page_query, descriptor);
        push_ordering(&mut page_query, descriptor);
        page_query.push(" LIMIT ");
        page_query.push_bind(descriptor.limit());
        page_query.push(" OFFSET ");
        page_query.push_bind(descriptor.offset());

        let items: Vec<Interaction> = page_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(ResultPage {
            items,
            total,
            page: descriptor.page,
            page_size: descriptor.page_size,
        })
    }
}
