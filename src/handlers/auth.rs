use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{session::AuthenticatedUser, user::UserResponse},
    services::auth as auth_service,
    state::AppState,
    validation::auth::validate_payload,
};

/// The request payload for registration and credential changes.
#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 8, max = 128))]
    pub password: String,
}

/// The request payload for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    tracing::info!("📝 Register attempt for: {}", payload.email);
    validate_payload(&payload)?;

    let user = auth_service::register(&state, &payload.email, payload.password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    tracing::info!("🔐 Login attempt for: {}", payload.email);

    let (user, token) = auth_service::login(
        &state,
        &payload.email,
        payload.password,
        payload.expires_in_seconds,
    )
    .await?;

    let response = LoginResponse {
        user: UserResponse::from(&user),
        token,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles changing the caller's email and password.
#[axum::debug_handler]
pub async fn update_credentials(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    validate_payload(&payload)?;

    let user = auth_service::update_credentials(
        &state,
        caller.user_id,
        &payload.email,
        payload.password,
    )
    .await?;

    Ok((StatusCode::OK, Json(UserResponse::from(&user))).into_response())
}
