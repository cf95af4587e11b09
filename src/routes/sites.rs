use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use itertools::Itertools;
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::{models::SiteId, search::SiteAccessResolver, Site},
    repositories::{RepositoryError, SiteMembership, SiteRepository},
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_sites))
        .route("/:id", get(get_site))
}

#[instrument(name = "GET /sites", skip(app_state))]
async fn my_sites(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<SiteMembership>>, ApiError> {
    let memberships = app_state
        .sites
        .sites_for_user(user.id)
        .await?
        .into_iter()
        .sorted_by(|a, b| a.site.name.cmp(&b.site.name))
        .collect();

    Ok(Json(memberships))
}

#[instrument(name = "GET /sites/:id", skip(app_state))]
async fn get_site(
    user: AuthUser,
    Path(id): Path<i32>,
    State(app_state): State<AppState>,
) -> Result<Json<Site>, ApiError> {
    let id = SiteId::new(id);
    let scope = app_state.access.resolve(user.id).await?;
    if !scope.contains(id) {
        // Same 404 as a nonexistent site; don't reveal other tenants.
        return Err(RepositoryError::NotFound(format!("site {id}")).into());
    }

    let site = app_state.sites.get_site(id).await?;
    Ok(Json(site))
}
