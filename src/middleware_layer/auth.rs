use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    middleware_layer::bearer::extract_bearer_token,
    models::session::AuthenticatedUser,
    state::AppState,
};

/// A middleware that requires a valid bearer session token.
///
/// On success the caller is attached to the request as an [`AuthenticatedUser`]
/// extension; on any failure the request is rejected before the handler runs.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response` or an `AppError`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let user_id = {
        let token = extract_bearer_token(request.headers())?;
        state.tokens.verify_subject(token)?
    };
    let user = AuthenticatedUser { user_id };

    tracing::debug!("✅ User authenticated: {}", user.user_id);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
