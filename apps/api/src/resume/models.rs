use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resume::ResumeAnalysisRow;
use crate::resume::scorer::ResumeAnalysis;

/// Narrative feedback layered on top of the deterministic score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeFeedback {
    pub summary_feedback: String,
    pub detailed_suggestions: Vec<String>,
    pub rewritten_examples: Vec<String>,
}

/// A persisted resume analysis: the score, its feedback and who asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysisRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub analysis: ResumeAnalysis,
    pub ai_feedback: ResumeFeedback,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ResumeAnalysisRecord {
    pub fn new(
        user_id: Uuid,
        analysis: ResumeAnalysis,
        ai_feedback: ResumeFeedback,
        file_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            analysis,
            ai_feedback,
            file_name,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

impl From<ResumeAnalysisRecord> for ResumeAnalysisRow {
    fn from(record: ResumeAnalysisRecord) -> Self {
        ResumeAnalysisRow {
            id: record.id,
            user_id: record.user_id,
            score: record.analysis.score as i32,
            strengths: record.analysis.strengths,
            weaknesses: record.analysis.weaknesses,
            missing_sections: record.analysis.missing_sections,
            detected_skills: record.analysis.detected_skills,
            summary_feedback: record.ai_feedback.summary_feedback,
            detailed_suggestions: record.ai_feedback.detailed_suggestions,
            rewritten_examples: record.ai_feedback.rewritten_examples,
            file_name: record.file_name,
            created_at: record.created_at,
        }
    }
}

impl From<ResumeAnalysisRow> for ResumeAnalysisRecord {
    fn from(row: ResumeAnalysisRow) -> Self {
        ResumeAnalysisRecord {
            id: row.id,
            user_id: row.user_id,
            analysis: ResumeAnalysis {
                score: row.score.clamp(0, 100) as u32,
                strengths: row.strengths,
                weaknesses: row.weaknesses,
                missing_sections: row.missing_sections,
                detected_skills: row.detected_skills,
            },
            ai_feedback: ResumeFeedback {
                summary_feedback: row.summary_feedback,
                detailed_suggestions: row.detailed_suggestions,
                rewritten_examples: row.rewritten_examples,
            },
            file_name: row.file_name,
            created_at: row.created_at,
        }
    }
}
