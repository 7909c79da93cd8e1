use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use http::{header, Method};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    let fileserver_routes = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.fileserver_root))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::metrics::count_hits,
        ))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/api/healthz", get(handlers::admin::healthz))
        .route(
            "/api/validate_chirp",
            post(handlers::chirps::validate_chirp),
        )
        .route("/api/users", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/chirps", get(handlers::chirps::list_chirps))
        .route("/api/chirps/{chirp_id}", get(handlers::chirps::get_chirp))
        .route("/admin/metrics", get(handlers::admin::metrics))
        .route("/admin/reset", post(handlers::admin::reset))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/users", put(handlers::auth::update_credentials))
        .route("/api/chirps", post(handlers::chirps::create_chirp))
        .route(
            "/api/chirps/{chirp_id}",
            delete(handlers::chirps::delete_chirp),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(fileserver_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
}
