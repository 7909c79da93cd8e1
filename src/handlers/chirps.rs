use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{chirp::SortOrder, session::AuthenticatedUser},
    services::chirps as chirp_service,
    state::AppState,
    validation::chirp::clean_chirp,
};

/// The request payload carrying chirp text.
#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

/// The response payload for chirp validation.
#[derive(Serialize)]
pub struct ValidateChirpResponse {
    pub valid: bool,
    pub cleaned_body: String,
}

/// The query parameters for listing chirps.
#[derive(Deserialize)]
pub struct ListChirpsQuery {
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Checks a chirp's length and returns its censored text without storing it.
#[axum::debug_handler]
pub async fn validate_chirp(
    payload: std::result::Result<Json<ChirpRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    let cleaned_body = clean_chirp(&payload.body)?;

    let response = ValidateChirpResponse {
        valid: true,
        cleaned_body,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Creates a chirp authored by the caller.
#[axum::debug_handler]
pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<ChirpRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;

    let chirp = chirp_service::create_chirp(&state, caller.user_id, &payload.body).await?;

    Ok((StatusCode::CREATED, Json(chirp)).into_response())
}

/// Lists chirps.
#[axum::debug_handler]
pub async fn list_chirps(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListChirpsQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query?;
    let chirps = chirp_service::list_chirps(&state, query.author_id, query.sort).await?;

    Ok((StatusCode::OK, Json(chirps)).into_response())
}

/// Gets a single chirp.
#[axum::debug_handler]
pub async fn get_chirp(
    State(state): State<AppState>,
    chirp_id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Response> {
    let Path(chirp_id) = chirp_id?;
    let chirp = chirp_service::get_chirp(&state, chirp_id).await?;

    Ok((StatusCode::OK, Json(chirp)).into_response())
}

/// Deletes one of the caller's chirps.
#[axum::debug_handler]
pub async fn delete_chirp(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    chirp_id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Response> {
    let Path(chirp_id) = chirp_id?;
    chirp_service::delete_chirp(&state, caller.user_id, chirp_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
