use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Represents a chirp in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    /// The unique identifier for the chirp.
    pub id: Uuid,
    /// The timestamp when the chirp was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the chirp was last updated.
    pub updated_at: DateTime<Utc>,
    /// The censored text of the chirp.
    pub body: String,
    /// The ID of the user who wrote the chirp.
    pub user_id: Uuid,
}

impl From<&Row> for Chirp {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            body: row.get("body"),
            user_id: row.get("user_id"),
        }
    }
}

/// Ordering of chirp listings by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}
