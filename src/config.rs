use std::{env, fmt, net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Issuer placed in every session token unless overridden.
pub const DEFAULT_TOKEN_ISSUER: &str = "chirpy";
/// Session lifetime when the client does not ask for one.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
/// Longest session lifetime a client may ask for.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 3600;
/// Secrets shorter than this are accepted with a warning.
const RECOMMENDED_SECRET_LEN: usize = 32;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database. In-memory storage is used when unset.
    pub database_url: Option<String>,
    /// The shared secret used to sign and verify session tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// The issuer written to and required of session tokens.
    pub token_issuer: String,
    /// The session lifetime used when none (or a non-positive one) is requested.
    pub default_token_ttl: Duration,
    /// The upper bound on a requested session lifetime.
    pub max_token_ttl: Duration,
    /// The directory served under `/app/`.
    pub fileserver_root: PathBuf,
    /// The address the HTTP server listens on.
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `Config` reading each variable through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = Zeroizing::new(
            lookup("JWT_SECRET")
                .context("JWT_SECRET must be set (generate with: openssl rand -base64 64)")?
                .into_bytes(),
        );

        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        if jwt_secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                "⚠️ JWT_SECRET is shorter than {} bytes; use a longer secret in production",
                RECOMMENDED_SECRET_LEN
            );
        }

        let default_token_ttl = Duration::from_secs(
            lookup("DEFAULT_TOKEN_TTL_SECONDS")
                .unwrap_or_else(|| DEFAULT_TOKEN_TTL_SECONDS.to_string())
                .parse()
                .context("Invalid DEFAULT_TOKEN_TTL_SECONDS")?,
        );

        let max_token_ttl = Duration::from_secs(
            lookup("MAX_TOKEN_TTL_SECONDS")
                .unwrap_or_else(|| MAX_TOKEN_TTL_SECONDS.to_string())
                .parse()
                .context("Invalid MAX_TOKEN_TTL_SECONDS")?,
        );

        if default_token_ttl.is_zero() {
            anyhow::bail!("DEFAULT_TOKEN_TTL_SECONDS must be positive");
        }

        if max_token_ttl < default_token_ttl {
            anyhow::bail!("MAX_TOKEN_TTL_SECONDS must be at least DEFAULT_TOKEN_TTL_SECONDS");
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            jwt_secret,
            token_issuer: lookup("TOKEN_ISSUER")
                .unwrap_or_else(|| DEFAULT_TOKEN_ISSUER.to_string()),
            default_token_ttl,
            max_token_ttl,
            fileserver_root: PathBuf::from(
                lookup("FILESERVER_ROOT").unwrap_or_else(|| ".".to_string()),
            ),
            bind_addr: lookup("BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:8080".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field("token_issuer", &self.token_issuer)
            .field("default_token_ttl", &self.default_token_ttl)
            .field("max_token_ttl", &self.max_token_ttl)
            .field("fileserver_root", &self.fileserver_root)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.jwt_secret.as_slice(), b"s3cret");
        assert_eq!(config.token_issuer, "chirpy");
        assert_eq!(config.default_token_ttl, Duration::from_secs(3600));
        assert_eq!(config.max_token_ttl, Duration::from_secs(3600));
        assert!(config.database_url.is_none());
        assert_eq!(config.fileserver_root, PathBuf::from("."));
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn secret_is_required_and_non_empty() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("JWT_SECRET", "")])).is_err());
    }

    #[test]
    fn max_ttl_cannot_be_below_default() {
        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DEFAULT_TOKEN_TTL_SECONDS", "600"),
            ("MAX_TOKEN_TTL_SECONDS", "60"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "super-secret-value"),
            ("DATABASE_URL", "postgres://user:pw@localhost/chirpy"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("super-secret-value"));
        assert!(!rendered.contains("pw@localhost"));
        assert!(rendered.contains("<redacted>"));
    }
}
