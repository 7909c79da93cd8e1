use std::{sync::OnceLock, time::Duration};

use uuid::Uuid;

use crate::{
    config::Config,
    crypto::password,
    error::{AppError, AuthError, Result},
    models::user::User,
    state::AppState,
    validation::auth::normalize_email,
};

/// Credential verified when the email is unknown, so both failures cost the same.
static DUMMY_CREDENTIAL: OnceLock<String> = OnceLock::new();

/// Hashes on the blocking pool; Argon2 is deliberately slow.
async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| AuthError::HashingFailure(format!("hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

/// Verifies on the blocking pool.
async fn verify_password(password: String, credential: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &credential))
        .await
        .map_err(|e| AuthError::HashingFailure(format!("verification task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn dummy_credential() -> Result<String> {
    if let Some(credential) = DUMMY_CREDENTIAL.get() {
        return Ok(credential.clone());
    }
    let credential = hash_password("not-a-real-password".to_string()).await?;
    Ok(DUMMY_CREDENTIAL.get_or_init(|| credential).clone())
}

/// Picks the lifetime of a new session token.
///
/// Missing or non-positive requests get the configured default rather than an
/// already-expired token; requests above the cap are clamped to it.
pub fn resolve_session_ttl(requested_seconds: Option<i64>, config: &Config) -> Duration {
    match requested_seconds {
        Some(seconds) if seconds > 0 => {
            Duration::from_secs(seconds as u64).min(config.max_token_ttl)
        }
        _ => config.default_token_ttl,
    }
}

/// Creates a new user.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The user's email.
/// * `password` - The user's password.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn register(state: &AppState, email: &str, password: String) -> Result<User> {
    let email = normalize_email(email);
    tracing::debug!("🔐 Creating user: {}", email);

    let credential = hash_password(password).await?;
    let user = state.users.create(&email, &credential).await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user and issues a session token.
///
/// Unknown email and wrong password both yield `InvalidLogin`.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The user's email.
/// * `password` - The user's password.
/// * `requested_ttl_seconds` - The lifetime the client asked for, if any.
///
/// # Returns
///
/// A `Result` containing the authenticated `User` and their token.
pub async fn login(
    state: &AppState,
    email: &str,
    password: String,
    requested_ttl_seconds: Option<i64>,
) -> Result<(User, String)> {
    let email = normalize_email(email);
    tracing::debug!("🔐 Authenticating user: {}", email);

    let user = match state.users.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            verify_password(password, dummy_credential().await?).await?;
            return Err(AppError::InvalidLogin);
        }
    };

    if !verify_password(password, user.hashed_password.clone()).await? {
        return Err(AppError::InvalidLogin);
    }

    let ttl = resolve_session_ttl(requested_ttl_seconds, &state.config);
    let token = state.tokens.issue(user.id, ttl)?;

    tracing::info!("✅ User authenticated: {} (session {}s)", user.id, ttl.as_secs());
    Ok((user, token))
}

/// Replaces a user's email and password.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user_id` - The ID of the user.
/// * `email` - The new email.
/// * `password` - The new password.
///
/// # Returns
///
/// A `Result` containing the updated `User`.
pub async fn update_credentials(
    state: &AppState,
    user_id: Uuid,
    email: &str,
    password: String,
) -> Result<User> {
    tracing::info!("🔑 Changing credentials for user: {}", user_id);

    let email = normalize_email(email);
    let credential = hash_password(password).await?;
    let user = state
        .users
        .update_credentials(user_id, &email, &credential)
        .await?;

    tracing::info!("✅ Credentials changed for user: {}", user_id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        chirp::InMemoryChirpRepository, user::InMemoryUserRepository,
    };
    use std::sync::Arc;

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("unit-test-secret".to_string()),
            "DEFAULT_TOKEN_TTL_SECONDS" => Some("600".to_string()),
            "MAX_TOKEN_TTL_SECONDS" => Some("3600".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn test_state() -> AppState {
        AppState::with_repositories(
            test_config(),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryChirpRepository::new()),
        )
        .unwrap()
    }

    #[test]
    fn ttl_resolution() {
        let config = test_config();

        assert_eq!(resolve_session_ttl(None, &config), Duration::from_secs(600));
        assert_eq!(resolve_session_ttl(Some(0), &config), Duration::from_secs(600));
        assert_eq!(resolve_session_ttl(Some(-30), &config), Duration::from_secs(600));
        assert_eq!(resolve_session_ttl(Some(90), &config), Duration::from_secs(90));
        assert_eq!(
            resolve_session_ttl(Some(i64::MAX), &config),
            Duration::from_secs(3600)
        );
    }

    #[tokio::test]
    async fn register_stores_a_credential_not_the_password() {
        let state = test_state();
        let user = register(&state, "Walt@Example.com", "correcthorse".to_string())
            .await
            .unwrap();

        assert_eq!(user.email, "walt@example.com");
        assert_ne!(user.hashed_password, "correcthorse");
        assert!(password::verify_password("correcthorse", &user.hashed_password).unwrap());
        assert!(!password::verify_password("wrongpass", &user.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn login_issues_a_token_for_the_user() {
        let state = test_state();
        let user = register(&state, "walt@example.com", "correcthorse".to_string())
            .await
            .unwrap();

        let (logged_in, token) = login(
            &state,
            "walt@example.com",
            "correcthorse".to_string(),
            Some(3600),
        )
        .await
        .unwrap();

        assert_eq!(logged_in.id, user.id);
        let claims = state.tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn login_failures_look_the_same() {
        let state = test_state();
        register(&state, "walt@example.com", "correcthorse".to_string())
            .await
            .unwrap();

        let wrong_password =
            login(&state, "walt@example.com", "wrongpass".to_string(), None).await;
        let unknown_email =
            login(&state, "jesse@example.com", "correcthorse".to_string(), None).await;

        assert!(matches!(wrong_password, Err(AppError::InvalidLogin)));
        assert!(matches!(unknown_email, Err(AppError::InvalidLogin)));
    }

    #[tokio::test]
    async fn changed_password_replaces_the_old_one() {
        let state = test_state();
        let user = register(&state, "walt@example.com", "correcthorse".to_string())
            .await
            .unwrap();

        update_credentials(&state, user.id, "walt@example.com", "batterystaple".to_string())
            .await
            .unwrap();

        assert!(
            login(&state, "walt@example.com", "batterystaple".to_string(), None)
                .await
                .is_ok()
        );
        assert!(matches!(
            login(&state, "walt@example.com", "correcthorse".to_string(), None).await,
            Err(AppError::InvalidLogin)
        ));
    }
}
