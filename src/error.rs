use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures raised by the authentication core.
///
/// None of the variants carry a password, credential or token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The hashing primitive could not run, or a stored credential is corrupt.
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    /// The signing key was unusable.
    #[error("Token signing failed: {0}")]
    SigningFailure(String),

    /// The token could not be split or decoded into header, claims and signature.
    #[error("Token is malformed")]
    MalformedToken,

    /// The signature did not verify, or the token declared an unexpected algorithm.
    #[error("Token signature does not match")]
    SignatureMismatch,

    /// The current time is at or after the token's expiry.
    #[error("Token has expired")]
    TokenExpired,

    /// The subject claim is not a user identifier.
    #[error("Token subject is not a valid user id")]
    InvalidSubject,

    /// The token is correctly signed but names another issuer.
    #[error("Token issuer is not accepted")]
    InvalidIssuer,

    /// No authorization header on the request.
    #[error("Authorization header is missing")]
    MissingCredentials,

    /// The authorization header is not of the form `Bearer <token>`.
    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedCredentials,
}

impl AuthError {
    /// Whether the failure stems from the caller's credentials rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AuthError::HashingFailure(_) | AuthError::SigningFailure(_)
        )
    }
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A pool construction error.
    #[error("Pool creation error: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    /// An authentication core error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Unknown email or wrong password; the two are never told apart.
    #[error("Incorrect email or password")]
    InvalidLogin,

    /// An authorization error.
    #[error("Authorization failed")]
    Forbidden,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A uniqueness conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A request body that is not the JSON we expect.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),

    /// A query string that does not fit the expected parameters.
    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),

    /// A path segment that cannot be parsed, such as a non-UUID id.
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathRejection),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// The status code and client-facing message for this error.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::CreatePool(e) => {
                tracing::error!("Pool creation error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Auth(e) if e.is_client_error() => {
                tracing::warn!("Authentication rejected: {}", e);
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }

            AppError::Auth(e) => {
                tracing::error!("Authentication core failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }

            AppError::InvalidLogin => {
                tracing::warn!("Login failed");
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AppError::Forbidden => {
                tracing::warn!("Authorization failed");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Conflict(msg) => {
                tracing::debug!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg.clone())
            }

            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::InvalidJson(rejection) => {
                tracing::debug!("Invalid JSON body: {}", rejection);
                (StatusCode::BAD_REQUEST, "Something went wrong".to_string())
            }

            AppError::InvalidQuery(rejection) => {
                tracing::debug!("Invalid query string: {}", rejection);
                (StatusCode::BAD_REQUEST, rejection.body_text())
            }

            AppError::InvalidPath(rejection) => {
                tracing::debug!("Invalid path: {}", rejection);
                (StatusCode::BAD_REQUEST, rejection.body_text())
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn token_failures_are_unauthorized_without_detail() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::MalformedCredentials,
            AuthError::MalformedToken,
            AuthError::SignatureMismatch,
            AuthError::TokenExpired,
            AuthError::InvalidSubject,
            AuthError::InvalidIssuer,
        ] {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body_of(response).await["error"], "Unauthorized");
        }
    }

    #[tokio::test]
    async fn primitive_failures_are_internal() {
        let response =
            AppError::from(AuthError::HashingFailure("out of memory".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await["error"], "Internal server error");

        let response =
            AppError::from(AuthError::SigningFailure("empty key".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_login_does_not_reveal_which_part_failed() {
        let response = AppError::InvalidLogin.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_of(response).await["error"],
            "Incorrect email or password"
        );
    }

    #[tokio::test]
    async fn validation_is_bad_request() {
        let response = AppError::Validation("Chirp is too long".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await["error"], "Chirp is too long");
    }
}
