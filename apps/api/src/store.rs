//! Storage error shared by the session and resume-analysis stores.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// `update` was called with a stale version; someone else wrote first.
    #[error("Version conflict on {id}: expected version {expected}")]
    VersionConflict { id: Uuid, expected: i64 },

    #[error("Record {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
