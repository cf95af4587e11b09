use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::{
        models::InteractionId,
        search::{SiteAccessResolver, SiteScope},
        Interaction, InteractionUpdate, NewInteraction, SiteAction,
    },
    repositories::{InteractionRepository, RepositoryError},
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_interaction))
        .route(
            "/:id",
            get(get_interaction)
                .put(update_interaction)
                .delete(delete_interaction),
        )
}

#[instrument(name = "POST /interactions", skip(app_state, new))]
async fn create_interaction(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(new): Json<NewInteraction>,
) -> Result<(StatusCode, Json<Interaction>), ApiError> {
    let scope = app_state.access.resolve(user.id).await?;
    let role = scope
        .role_at(new.site_id)
        .ok_or_else(|| ApiError::forbidden(format!("no access to site {}", new.site_id)))?;
    if !role.permits(SiteAction::Create) {
        return Err(ApiError::forbidden("role may not create interactions"));
    }

    let interaction = app_state.interactions.create(user.id, &new).await?;
    Ok((StatusCode::CREATED, Json(interaction)))
}

#[instrument(name = "GET /interactions/:id", skip(app_state))]
async fn get_interaction(
    user: AuthUser,
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<Interaction>, ApiError> {
    let scope = app_state.access.resolve(user.id).await?;
    let interaction = fetch_scoped(&app_state, &scope, InteractionId::new(id)).await?;

    Ok(Json(interaction))
}

#[instrument(name = "PUT /interactions/:id", skip(app_state, update))]
async fn update_interaction(
    user: AuthUser,
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    Json(update): Json<InteractionUpdate>,
) -> Result<Json<Interaction>, ApiError> {
    let scope = app_state.access.resolve(user.id).await?;
    let id = InteractionId::new(id);
    let interaction = fetch_scoped(&app_state, &scope, id).await?;
    authorize_modify(&scope, &interaction, &user)?;

    let updated = app_state.interactions.update(id, &update).await?;
    Ok(Json(updated))
}

#[instrument(name = "DELETE /interactions/:id", skip(app_state))]
async fn delete_interaction(
    user: AuthUser,
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let scope = app_state.access.resolve(user.id).await?;
    let id = InteractionId::new(id);
    let interaction = fetch_scoped(&app_state, &scope, id).await?;
    authorize_modify(&scope, &interaction, &user)?;

    app_state.interactions.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a record, answering 404 when it doesn't exist *or* lies outside the
/// caller's scope — a direct id probe must not reveal other tenants' data.
async fn fetch_scoped(
    app_state: &AppState,
    scope: &SiteScope,
    id: InteractionId,
) -> Result<Interaction, ApiError> {
    let interaction = app_state.interactions.get(id).await?;
    if !scope.contains(interaction.site_id) {
        return Err(RepositoryError::NotFound(format!("interaction {id}")).into());
    }
    Ok(interaction)
}

fn authorize_modify(
    scope: &SiteScope,
    interaction: &Interaction,
    user: &AuthUser,
) -> Result<(), ApiError> {
    // fetch_scoped already guaranteed membership
    let role = scope
        .role_at(interaction.site_id)
        .ok_or_else(|| ApiError::forbidden("no access to this site"))?;

    let own_record = interaction.created_by == user.id;
    if !role.permits(SiteAction::Modify { own_record }) {
        return Err(ApiError::forbidden(
            "only site admins or the creator may modify this interaction",
        ));
    }
    Ok(())
}
