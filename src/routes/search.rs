use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::search::{RawQuery, ResultPage, SearchError},
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[instrument(name = "GET /interactions/search", skip(app_state, params))]
async fn search(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ResultPage>, ApiError> {
    let raw = raw_query_from_params(params)?;
    let page = app_state.search.search(user.id, raw).await?;

    Ok(Json(page))
}

/// Split the flat query string into the known search controls and the
/// remaining field filters. Integer controls are validated here; filter
/// values stay raw strings for the normalizer to type-check.
fn raw_query_from_params(
    mut params: HashMap<String, String>,
) -> Result<RawQuery, SearchError> {
    let term = params.remove("term");
    let sort_by = params.remove("sortBy");
    let sort_dir = params.remove("sortDir");
    let page = parse_int(params.remove("page"), "page")?;
    let page_size = parse_int(params.remove("pageSize"), "pageSize")?;
    let site_id = params
        .remove("siteId")
        .map(|v| {
            v.parse::<i32>().map_err(|_| {
                SearchError::validation("siteId", format!("expected an integer, got '{v}'"))
            })
        })
        .transpose()?
        .map(crate::domain::models::SiteId::new);

    Ok(RawQuery {
        term,
        filters: params,
        sort_by,
        sort_dir,
        page,
        page_size,
        site_id,
    })
}

fn parse_int(value: Option<String>, field: &str) -> Result<Option<i64>, SearchError> {
    value
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| SearchError::validation(field, format!("expected an integer, got '{v}'")))
        })
        .transpose()
}
