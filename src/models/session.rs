use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// The claims carried inside a session token.
///
/// Exists only inside the signed token; nothing is persisted server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The issuing service.
    pub iss: String,
    /// The user id, as a hyphenated UUID.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch (UTC).
    pub iat: i64,
    /// Expires-at, seconds since the Unix epoch (UTC).
    pub exp: i64,
}

impl SessionClaims {
    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSubject)
    }
}

/// The caller of a protected request, attached by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The ID of the user the token was issued to.
    pub user_id: Uuid,
}
