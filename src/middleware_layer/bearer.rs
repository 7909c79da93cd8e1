use http::{header::AUTHORIZATION, HeaderMap};

use crate::error::AuthError;

/// The authorization scheme session tokens travel under.
pub const BEARER_SCHEME: &str = "Bearer";

/// Extracts the bearer token from the `Authorization` header.
///
/// The header must hold exactly two whitespace-separated fields, the first being
/// `Bearer` (case-sensitive). Whitespace around and between them is tolerated.
///
/// # Arguments
///
/// * `headers` - The request headers.
///
/// # Returns
///
/// The token, or `MissingCredentials` / `MalformedCredentials`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials)?;

    if value.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedCredentials),
    }
}
