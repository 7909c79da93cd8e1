use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use uuid::Uuid;

use crate::{error::AuthError, models::session::SessionClaims};

/// The only signing algorithm this service issues or accepts.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies HMAC-signed session tokens.
///
/// Built once from the shared secret at startup and cloned into request handlers.
/// Holds no mutable state.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl TokenCodec {
    /// Creates a codec bound to `secret` that stamps and requires `issuer`.
    ///
    /// Fails with `SigningFailure` when the secret is empty.
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::SigningFailure(
                "signing secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
        })
    }

    /// Issues a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    fn issue_at(&self, subject: Uuid, ttl: Duration, now: DateTime<Utc>) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::SigningFailure(format!("ttl out of range: {}", e)))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::SigningFailure("ttl out of range".to_string()))?;

        let claims = SessionClaims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        tracing::debug!(
            user_id = %subject,
            exp_timestamp = claims.exp,
            "Issuing session token"
        );

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session token");
            AuthError::SigningFailure(e.to_string())
        })
    }

    /// Verifies `token` and returns its claims.
    ///
    /// The algorithm is pinned to [`SIGNING_ALGORITHM`] regardless of what the token
    /// header declares. Signature is checked before any claim, so a forged token
    /// never reports `TokenExpired` or `InvalidSubject`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked below without leeway: a token is dead at its exp second.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                let err = match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        AuthError::SignatureMismatch
                    }
                    ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::MalformedToken,
                };
                tracing::debug!(error = %e, "Session token rejected");
                err
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        claims.user_id()?;
        Ok(claims)
    }

    /// Verifies `token` and returns only the user it was issued to.
    pub fn verify_subject(&self, token: &str) -> Result<Uuid, AuthError> {
        self.verify(token)?.user_id()
    }
}
