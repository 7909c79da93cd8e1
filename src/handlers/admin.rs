use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Liveness probe.
pub async fn healthz() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "OK",
    )
        .into_response()
}

/// Renders the file server hit count as an HTML page.
#[axum::debug_handler]
pub async fn metrics(State(state): State<AppState>) -> Response {
    let page = format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>",
        state.hits.load()
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        page,
    )
        .into_response()
}

/// Resets the file server hit count.
#[axum::debug_handler]
pub async fn reset(State(state): State<AppState>) -> Response {
    state.hits.reset();
    tracing::info!("🧹 Hit counter reset");

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Hits reset to 0",
    )
        .into_response()
}
