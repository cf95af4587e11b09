//! Query normalizer: turns raw, untrusted search input into a canonical
//! [`QueryDescriptor`] or rejects it with a field-level error.
//!
//! Everything downstream trusts the descriptor, so all validation and the
//! scope intersection happen here and nowhere else.

use std::str::FromStr;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::search::service::SearchConfig;
use crate::domain::search::traits::{Result, SearchError};
use crate::domain::search::types::{QueryDescriptor, RawQuery, SiteScope, SortDir, SortKey};
use crate::domain::InteractionKind;

/// Filter fields callers may use. Anything else is rejected, not dropped.
pub const FILTER_FIELDS: [&str; 4] = ["kind", "participant", "startsAfter", "startsBefore"];

/// Normalize a raw query against the caller's authorized scope.
///
/// A `siteId` outside the scope yields [`SearchError::ForbiddenScope`];
/// without a `siteId` the descriptor targets the whole scope. An empty
/// scope produces a descriptor with an empty site list, which the service
/// short-circuits — it never reaches the store.
pub fn normalize(
    raw: RawQuery,
    scope: &SiteScope,
    config: &SearchConfig,
) -> Result<QueryDescriptor> {
    let sort = match raw.sort_by.as_deref() {
        None => SortKey::CreatedAt,
        Some(s) => SortKey::from_str(s)
            .map_err(|_| SearchError::validation("sortBy", format!("unknown sort key '{s}'")))?,
    };
    let dir = match raw.sort_dir.as_deref() {
        None => SortDir::Desc,
        Some(s) => SortDir::from_str(s).map_err(|_| {
            SearchError::validation("sortDir", format!("expected 'asc' or 'desc', got '{s}'"))
        })?,
    };

    let page = raw.page.unwrap_or(1);
    if page < 1 {
        return Err(SearchError::validation("page", "page numbers start at 1"));
    }
    let page = u32::try_from(page)
        .map_err(|_| SearchError::validation("page", "page number out of range"))?;

    let page_size = raw.page_size.unwrap_or(config.default_page_size as i64);
    if page_size < 1 {
        return Err(SearchError::validation(
            "pageSize",
            "page size must be at least 1",
        ));
    }
    // Oversized requests are clamped rather than rejected.
    let page_size = (page_size as u64).min(config.max_page_size as u64) as u32;

    let term = raw.term.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let term = term.map(|t| {
        if t.chars().count() > config.max_term_length {
            t.chars().take(config.max_term_length).collect()
        } else {
            t.to_string()
        }
    });

    let sites = match raw.site_id {
        Some(site) => {
            if !scope.contains(site) {
                return Err(SearchError::ForbiddenScope(site));
            }
            vec![site]
        }
        None => scope.site_ids(),
    };

    let mut descriptor = QueryDescriptor {
        term,
        kind: None,
        participant: None,
        starts_after: None,
        starts_before: None,
        sort,
        dir,
        page,
        page_size,
        sites,
    };

    for (field, value) in &raw.filters {
        apply_filter(&mut descriptor, field, value)?;
    }

    if let (Some(after), Some(before)) = (descriptor.starts_after, descriptor.starts_before) {
        if after >= before {
            return Err(SearchError::validation(
                "startsBefore",
                "startsBefore must be later than startsAfter",
            ));
        }
    }

    Ok(descriptor)
}

fn apply_filter(descriptor: &mut QueryDescriptor, field: &str, value: &str) -> Result<()> {
    match field {
        "kind" => {
            descriptor.kind = Some(InteractionKind::from_str(value).map_err(|_| {
                SearchError::validation("kind", format!("unknown interaction kind '{value}'"))
            })?);
        }
        "participant" => {
            let participant = value.trim();
            if participant.is_empty() {
                return Err(SearchError::validation(
                    "participant",
                    "participant filter must not be empty",
                ));
            }
            descriptor.participant = Some(participant.to_string());
        }
        "startsAfter" => descriptor.starts_after = Some(parse_timestamp(field, value)?),
        "startsBefore" => descriptor.starts_before = Some(parse_timestamp(field, value)?),
        other => {
            return Err(SearchError::validation(
                other,
                format!(
                    "unknown filter field (expected one of: {})",
                    FILTER_FIELDS.join(", ")
                ),
            ));
        }
    }
    Ok(())
}

fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| {
        SearchError::validation(field, format!("expected an RFC 3339 timestamp, got '{value}'"))
    })
}
