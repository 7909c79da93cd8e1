use std::sync::Arc;

use crate::config::Config;
use crate::crypto::token::TokenCodec;
use crate::error::Result;
use crate::metrics::HitCounter;
use crate::repositories::{
    chirp::{ChirpRepository, InMemoryChirpRepository, PgChirpRepository},
    user::{InMemoryUserRepository, PgUserRepository, UserRepository},
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Issues and verifies session tokens with the shared secret.
    pub tokens: TokenCodec,
    /// User storage.
    pub users: Arc<dyn UserRepository + Send + Sync>,
    /// Chirp storage.
    pub chirps: Arc<dyn ChirpRepository + Send + Sync>,
    /// Static file server hits.
    pub hits: HitCounter,
}

impl AppState {
    /// Creates a new `AppState`, connecting to PostgreSQL when configured.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: Config) -> Result<Self> {
        let (users, chirps): (
            Arc<dyn UserRepository + Send + Sync>,
            Arc<dyn ChirpRepository + Send + Sync>,
        ) = match config.database_url.as_deref() {
            Some(url) => {
                let pool = crate::db::create_pool(url)?;
                crate::db::ensure_schema(&pool).await?;
                tracing::info!("✅ PostgreSQL pool initialized");
                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgChirpRepository::new(pool)),
                )
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL not set, using in-memory storage");
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryChirpRepository::new()),
                )
            }
        };

        Self::with_repositories(config, users, chirps)
    }

    /// Creates an `AppState` over the given repositories.
    pub fn with_repositories(
        config: Config,
        users: Arc<dyn UserRepository + Send + Sync>,
        chirps: Arc<dyn ChirpRepository + Send + Sync>,
    ) -> Result<Self> {
        let tokens = TokenCodec::new(&config.jwt_secret, config.token_issuer.clone())?;
        tracing::info!("✅ Token codec initialized (issuer: {})", config.token_issuer);

        Ok(AppState {
            config: Arc::new(config),
            tokens,
            users,
            chirps,
            hits: HitCounter::new(),
        })
    }
}
