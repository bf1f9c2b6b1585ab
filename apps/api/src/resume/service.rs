use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::feedback::{review_with_fallback, ResumeFeedbackGenerator};
use crate::resume::models::ResumeAnalysisRecord;
use crate::resume::scorer;
use crate::resume::store::ResumeAnalysisStore;

/// Shorter text is treated as a failed extraction rather than a resume.
pub const MIN_RESUME_CHARS: usize = 50;

pub struct ResumeService {
    store: Arc<dyn ResumeAnalysisStore>,
    reviewer: Arc<dyn ResumeFeedbackGenerator>,
    collaborator_timeout: Duration,
}

impl ResumeService {
    pub fn new(
        store: Arc<dyn ResumeAnalysisStore>,
        reviewer: Arc<dyn ResumeFeedbackGenerator>,
        collaborator_timeout: Duration,
    ) -> Self {
        Self {
            store,
            reviewer,
            collaborator_timeout,
        }
    }

    /// Scores `text`, attaches reviewer feedback and stores the result.
    pub async fn analyze(
        &self,
        user_id: Uuid,
        text: &str,
        file_name: Option<String>,
    ) -> Result<ResumeAnalysisRecord, AppError> {
        if text.trim().chars().count() < MIN_RESUME_CHARS {
            return Err(AppError::Validation(
                "Resume content seems too short or empty".to_string(),
            ));
        }

        let analysis = scorer::analyze(text);
        let feedback = review_with_fallback(
            self.reviewer.as_ref(),
            self.collaborator_timeout,
            text,
            &analysis,
        )
        .await;

        let record = ResumeAnalysisRecord::new(user_id, analysis, feedback, file_name);
        self.store.insert(&record).await?;

        info!(
            "Resume analysis {} for user {}: score {}, {} skills detected",
            record.id,
            user_id,
            record.analysis.score,
            record.analysis.detected_skills.len()
        );
        Ok(record)
    }

    pub async fn history(&self, user_id: Uuid) -> Result<Vec<ResumeAnalysisRecord>, AppError> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    pub async fn get(&self, id: Uuid, requester: Uuid) -> Result<ResumeAnalysisRecord, AppError> {
        self.store
            .get(id)
            .await?
            .filter(|r| r.is_owned_by(requester))
            .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::collaborator::CollaboratorError;
    use crate::llm_client::LlmError;
    use crate::resume::feedback::unconfigured_feedback;
    use crate::resume::models::ResumeFeedback;
    use crate::resume::scorer::ResumeAnalysis;
    use crate::resume::store::InMemoryResumeStore;

    const RESUME: &str = "Summary: backend developer.\n\
        Experience: Developed and Optimized Python services with SQL and Docker, \
        serving 500 users.\nEducation: BSc.\nSkills: Python, SQL, Docker, Git.";

    struct CountingReviewer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResumeFeedbackGenerator for CountingReviewer {
        async fn review(
            &self,
            _resume_text: &str,
            analysis: &ResumeAnalysis,
        ) -> Result<ResumeFeedback, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ResumeFeedback {
                summary_feedback: format!("Scored {}", analysis.score),
                detailed_suggestions: vec![],
                rewritten_examples: vec![],
            })
        }
    }

    struct KeylessReviewer;

    #[async_trait]
    impl ResumeFeedbackGenerator for KeylessReviewer {
        async fn review(
            &self,
            _resume_text: &str,
            _analysis: &ResumeAnalysis,
        ) -> Result<ResumeFeedback, CollaboratorError> {
            Err(LlmError::MissingApiKey.into())
        }
    }

    fn service_with(reviewer: Arc<dyn ResumeFeedbackGenerator>) -> ResumeService {
        ResumeService::new(
            Arc::new(InMemoryResumeStore::new()),
            reviewer,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_analyze_scores_and_persists() {
        let reviewer = Arc::new(CountingReviewer {
            calls: AtomicUsize::new(0),
        });
        let service = service_with(reviewer.clone());
        let user = Uuid::new_v4();

        let record = service
            .analyze(user, RESUME, Some("cv.pdf".to_string()))
            .await
            .unwrap();
        assert_eq!(record.analysis, scorer::analyze(RESUME));
        assert_eq!(
            record.ai_feedback.summary_feedback,
            format!("Scored {}", record.analysis.score)
        );
        assert_eq!(record.file_name.as_deref(), Some("cv.pdf"));
        assert_eq!(reviewer.calls.load(Ordering::SeqCst), 1);

        assert_eq!(service.get(record.id, user).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_analyze_rejects_short_text() {
        let reviewer = Arc::new(CountingReviewer {
            calls: AtomicUsize::new(0),
        });
        let service = service_with(reviewer.clone());
        let padded = format!("   {}   ", "x".repeat(MIN_RESUME_CHARS - 1));

        let result = service.analyze(Uuid::new_v4(), &padded, None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(reviewer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_without_key_uses_unconfigured_feedback() {
        let service = service_with(Arc::new(KeylessReviewer));
        let record = service.analyze(Uuid::new_v4(), RESUME, None).await.unwrap();
        assert_eq!(record.ai_feedback, unconfigured_feedback(&record.analysis));
    }

    #[tokio::test]
    async fn test_get_hides_foreign_records() {
        let service = service_with(Arc::new(KeylessReviewer));
        let owner = Uuid::new_v4();
        let record = service.analyze(owner, RESUME, None).await.unwrap();

        let result = service.get(record.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        let result = service.get(Uuid::new_v4(), owner).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_history_is_per_user_newest_first() {
        let service = service_with(Arc::new(KeylessReviewer));
        let user = Uuid::new_v4();
        let first = service.analyze(user, RESUME, None).await.unwrap();
        let second = service.analyze(user, RESUME, None).await.unwrap();
        service.analyze(Uuid::new_v4(), RESUME, None).await.unwrap();

        let history = service.history(user).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].created_at >= history[1].created_at);
        let ids: Vec<Uuid> = history.iter().map(|r| r.id).collect();
        assert!(ids.contains(&first.id) && ids.contains(&second.id));
    }
}
