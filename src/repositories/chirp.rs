use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::Pool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::Result,
    models::chirp::{Chirp, SortOrder},
};

/// Storage operations for chirps.
#[async_trait]
pub trait ChirpRepository {
    /// Inserts a new chirp authored by `user_id`.
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp>;
    /// Lists chirps, optionally restricted to one author, ordered by creation time.
    async fn list(&self, author_id: Option<Uuid>, order: SortOrder) -> Result<Vec<Chirp>>;
    /// Finds a chirp by its ID.
    async fn find_by_id(&self, chirp_id: Uuid) -> Result<Option<Chirp>>;
    /// Deletes a chirp. Returns whether a row was removed.
    async fn delete(&self, chirp_id: Uuid) -> Result<bool>;
}

/// PostgreSQL implementation of [`ChirpRepository`].
pub struct PgChirpRepository {
    pool: Pool,
}

impl PgChirpRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChirpRepository for PgChirpRepository {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO chirps (id, created_at, updated_at, body, user_id)
                VALUES ($1, NOW(), NOW(), $2, $3)
                RETURNING id, created_at, updated_at, body, user_id
                "#,
                &[&Uuid::new_v4(), &body, &user_id],
            )
            .await?;
        Ok(Chirp::from(&row))
    }

    async fn list(&self, author_id: Option<Uuid>, order: SortOrder) -> Result<Vec<Chirp>> {
        let client = self.pool.get().await?;
        let query = match order {
            SortOrder::Asc => {
                r#"
                SELECT id, created_at, updated_at, body, user_id
                FROM chirps
                WHERE $1::uuid IS NULL OR user_id = $1
                ORDER BY created_at ASC
                "#
            }
            SortOrder::Desc => {
                r#"
                SELECT id, created_at, updated_at, body, user_id
                FROM chirps
                WHERE $1::uuid IS NULL OR user_id = $1
                ORDER BY created_at DESC
                "#
            }
        };
        let rows = client.query(query, &[&author_id]).await?;
        Ok(rows.iter().map(Chirp::from).collect())
    }

    async fn find_by_id(&self, chirp_id: Uuid) -> Result<Option<Chirp>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, created_at, updated_at, body, user_id
                FROM chirps
                WHERE id = $1
                "#,
                &[&chirp_id],
            )
            .await?;
        Ok(row.as_ref().map(Chirp::from))
    }

    async fn delete(&self, chirp_id: Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let removed = client
            .execute("DELETE FROM chirps WHERE id = $1", &[&chirp_id])
            .await?;
        Ok(removed > 0)
    }
}

/// In-memory implementation of [`ChirpRepository`] for tests and database-less runs.
#[derive(Default)]
pub struct InMemoryChirpRepository {
    chirps: RwLock<HashMap<Uuid, Chirp>>,
}

impl InMemoryChirpRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChirpRepository for InMemoryChirpRepository {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.write().await.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn list(&self, author_id: Option<Uuid>, order: SortOrder) -> Result<Vec<Chirp>> {
        let chirps = self.chirps.read().await;
        let mut listed: Vec<Chirp> = chirps
            .values()
            .filter(|c| author_id.is_none_or(|id| c.user_id == id))
            .cloned()
            .collect();

        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if order == SortOrder::Desc {
            listed.reverse();
        }
        Ok(listed)
    }

    async fn find_by_id(&self, chirp_id: Uuid) -> Result<Option<Chirp>> {
        Ok(self.chirps.read().await.get(&chirp_id).cloned())
    }

    async fn delete(&self, chirp_id: Uuid) -> Result<bool> {
        Ok(self.chirps.write().await.remove(&chirp_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_filters_by_author_and_sorts() {
        let repo = InMemoryChirpRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let first = repo.create(alice, "first").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.create(bob, "from bob").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let last = repo.create(alice, "last").await.unwrap();

        let asc = repo.list(Some(alice), SortOrder::Asc).await.unwrap();
        assert_eq!(asc, vec![first.clone(), last.clone()]);

        let desc = repo.list(Some(alice), SortOrder::Desc).await.unwrap();
        assert_eq!(desc, vec![last, first]);

        assert_eq!(repo.list(None, SortOrder::Asc).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let repo = InMemoryChirpRepository::new();
        let chirp = repo.create(Uuid::new_v4(), "hello").await.unwrap();

        assert!(repo.delete(chirp.id).await.unwrap());
        assert!(!repo.delete(chirp.id).await.unwrap());
        assert!(repo.find_by_id(chirp.id).await.unwrap().is_none());
    }
}
