//! Session storage behind a narrow trait so the engine stays storage-agnostic.
//!
//! Every backend enforces optimistic concurrency: `update` only succeeds when
//! the caller's `version` matches the stored one, and bumps it by one.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::interview::models::{InterviewSession, SessionSummary};
use crate::models::interview::InterviewSessionRow;
use crate::store::StoreError;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &InterviewSession) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<InterviewSession>, StoreError>;

    /// Writes `session` if its `version` is current. Returns the stored copy
    /// carrying the new version.
    async fn update(&self, session: &InterviewSession) -> Result<InterviewSession, StoreError>;

    /// Summaries of every session owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SessionSummary>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend (no DATABASE_URL, tests)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, InterviewSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &InterviewSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::AlreadyExists(session.id));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InterviewSession>, StoreError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn update(&self, session: &InterviewSession) -> Result<InterviewSession, StoreError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&session.id)
            .filter(|stored| stored.version == session.version)
            .ok_or(StoreError::VersionConflict {
                id: session.id,
                expected: session.version,
            })?;

        let mut next = session.clone();
        next.version += 1;
        *stored = next.clone();
        Ok(next)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SessionSummary>, StoreError> {
        let sessions = self.sessions.read().await;
        let mut summaries: Vec<SessionSummary> = sessions
            .values()
            .filter(|s| s.is_owned_by(user_id))
            .map(InterviewSession::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL backend
// ────────────────────────────────────────────────────────────────────────────

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn session_from_row(row: InterviewSessionRow) -> Result<InterviewSession, StoreError> {
    let mut session: InterviewSession = serde_json::from_value(row.data)?;
    // The column is authoritative; the JSON copy may lag one bump behind.
    session.version = row.version;
    Ok(session)
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: &InterviewSession) -> Result<(), StoreError> {
        let data = serde_json::to_value(session)?;
        let inserted = sqlx::query(
            r#"
            INSERT INTO interview_sessions (id, user_id, version, status, data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.version)
        .bind(session.status.as_str())
        .bind(data)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(session.id));
        }
        debug!("Created interview session {}", session.id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InterviewSession>, StoreError> {
        let row: Option<InterviewSessionRow> =
            sqlx::query_as("SELECT * FROM interview_sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(session_from_row).transpose()
    }

    async fn update(&self, session: &InterviewSession) -> Result<InterviewSession, StoreError> {
        let mut next = session.clone();
        next.version += 1;
        let data = serde_json::to_value(&next)?;

        // Compare-and-swap on the version column
        let updated = sqlx::query(
            r#"
            UPDATE interview_sessions
            SET data = $1, status = $2, version = $3, updated_at = NOW()
            WHERE id = $4 AND version = $5
            "#,
        )
        .bind(data)
        .bind(next.status.as_str())
        .bind(next.version)
        .bind(session.id)
        .bind(session.version)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::VersionConflict {
                id: session.id,
                expected: session.version,
            });
        }
        Ok(next)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SessionSummary>, StoreError> {
        let rows: Vec<InterviewSessionRow> = sqlx::query_as(
            "SELECT * FROM interview_sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| session_from_row(row).map(|s| s.summary()))
            .collect()
    }
}
