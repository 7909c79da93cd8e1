use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::chirp::{Chirp, SortOrder},
    state::AppState,
    validation::chirp::clean_chirp,
};

/// Creates a new chirp.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user_id` - The ID of the author.
/// * `body` - The chirp text, validated and censored before storage.
///
/// # Returns
///
/// A `Result` containing the created `Chirp`.
pub async fn create_chirp(state: &AppState, user_id: Uuid, body: &str) -> Result<Chirp> {
    let cleaned = clean_chirp(body)?;
    let chirp = state.chirps.create(user_id, &cleaned).await?;

    tracing::info!("✅ Chirp {} created by {}", chirp.id, user_id);
    Ok(chirp)
}

/// Lists chirps.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `author_id` - Restricts the listing to one author when set.
/// * `order` - Creation-time ordering.
///
/// # Returns
///
/// A `Result` containing the chirps.
pub async fn list_chirps(
    state: &AppState,
    author_id: Option<Uuid>,
    order: SortOrder,
) -> Result<Vec<Chirp>> {
    state.chirps.list(author_id, order).await
}

/// Gets a chirp by ID.
pub async fn get_chirp(state: &AppState, chirp_id: Uuid) -> Result<Chirp> {
    state
        .chirps
        .find_by_id(chirp_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Deletes a chirp on behalf of its author.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user_id` - The ID of the caller.
/// * `chirp_id` - The ID of the chirp.
///
/// # Returns
///
/// `NotFound` when the chirp does not exist, `Forbidden` when the caller is not its author.
pub async fn delete_chirp(state: &AppState, user_id: Uuid, chirp_id: Uuid) -> Result<()> {
    let chirp = get_chirp(state, chirp_id).await?;

    if chirp.user_id != user_id {
        tracing::warn!("❌ User {} tried to delete chirp {} of {}", user_id, chirp_id, chirp.user_id);
        return Err(AppError::Forbidden);
    }

    if !state.chirps.delete(chirp_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!("✅ Chirp {} deleted", chirp_id);
    Ok(())
}
