use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeAnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_sections: Vec<String>,
    pub detected_skills: Vec<String>,
    pub summary_feedback: String,
    pub detailed_suggestions: Vec<String>,
    pub rewritten_examples: Vec<String>,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
