//! Resume analyses are append-only: inserted once, read back, never updated.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::resume::ResumeAnalysisRow;
use crate::resume::models::ResumeAnalysisRecord;
use crate::store::StoreError;

#[async_trait]
pub trait ResumeAnalysisStore: Send + Sync {
    async fn insert(&self, record: &ResumeAnalysisRecord) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<ResumeAnalysisRecord>, StoreError>;

    /// Every analysis owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: Uuid)
        -> Result<Vec<ResumeAnalysisRecord>, StoreError>;
}

#[derive(Default)]
pub struct InMemoryResumeStore {
    records: RwLock<HashMap<Uuid, ResumeAnalysisRecord>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeAnalysisStore for InMemoryResumeStore {
    async fn insert(&self, record: &ResumeAnalysisRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ResumeAnalysisRecord>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ResumeAnalysisRecord>, StoreError> {
        let records = self.records.read().await;
        let mut owned: Vec<ResumeAnalysisRecord> = records
            .values()
            .filter(|r| r.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeAnalysisStore for PgResumeStore {
    async fn insert(&self, record: &ResumeAnalysisRecord) -> Result<(), StoreError> {
        let row = ResumeAnalysisRow::from(record.clone());
        let inserted = sqlx::query(
            r#"
            INSERT INTO resume_analyses (
                id, user_id, score, strengths, weaknesses, missing_sections,
                detected_skills, summary_feedback, detailed_suggestions,
                rewritten_examples, file_name, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.score)
        .bind(row.strengths)
        .bind(row.weaknesses)
        .bind(row.missing_sections)
        .bind(row.detected_skills)
        .bind(row.summary_feedback)
        .bind(row.detailed_suggestions)
        .bind(row.rewritten_examples)
        .bind(row.file_name)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(record.id));
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ResumeAnalysisRecord>, StoreError> {
        let row: Option<ResumeAnalysisRow> =
            sqlx::query_as("SELECT * FROM resume_analyses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(ResumeAnalysisRecord::from))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ResumeAnalysisRecord>, StoreError> {
        let rows: Vec<ResumeAnalysisRow> = sqlx::query_as(
            "SELECT * FROM resume_analyses WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ResumeAnalysisRecord::from).collect())
    }
}
