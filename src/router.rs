use axum::{http::Method, routing::get, Router};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, auth::USER_ID_HEADER, config::Settings, routes};

pub fn create(connection_pool: PgPool, config: &Settings) -> Router<()> {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest(
            "/interactions",
            routes::interactions::router().merge(routes::search::router()),
        )
        .nest("/sites", routes::sites::router());

    let app_state = AppState::new(connection_pool, config);

    let app_url = config.application.app_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(["content-type".parse().unwrap(), USER_ID_HEADER.parse().unwrap()])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().unwrap_or_default() == app_url
        }));

    app.with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
