//! External collaborators the interview engine delegates to, and the
//! deterministic fallbacks used when they fail or time out.
//!
//! The engine holds each collaborator as `Arc<dyn Trait>`; the production
//! implementations live in `interview::llm`, tests inject doubles.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::collaborator::CollaboratorError;
use crate::interview::models::{
    Difficulty, Evaluation, InterviewSummary, InterviewType, Question, ReadinessLevel,
    QUESTIONS_PER_SESSION,
};

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        role: &str,
        difficulty: Difficulty,
        interview_type: InterviewType,
    ) -> Result<Vec<String>, CollaboratorError>;
}

#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        role: &str,
    ) -> Result<Evaluation, CollaboratorError>;
}

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn summarize(
        &self,
        role: &str,
        questions: &[Question],
    ) -> Result<InterviewSummary, CollaboratorError>;
}

/// Awaits a collaborator call under `timeout`. Any error or timeout is logged
/// and replaced by `fallback()`; the caller never sees the failure.
pub async fn with_fallback<T, F>(
    collaborator: &'static str,
    timeout: Duration,
    call: F,
    fallback: impl FnOnce() -> T,
) -> T
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(timeout)),
    };

    match outcome {
        Ok(value) => value,
        Err(e) => {
            warn!("{collaborator} failed, using fallback: {e}");
            fallback()
        }
    }
}

/// Checks generator output: exactly five non-blank questions.
pub fn validate_questions(
    questions: Vec<String>,
) -> Result<[String; QUESTIONS_PER_SESSION], CollaboratorError> {
    let questions: Vec<String> = questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .collect();
    if questions.iter().any(|q| q.is_empty()) {
        return Err(CollaboratorError::Malformed(
            "question generator returned a blank question".to_string(),
        ));
    }
    let count = questions.len();
    questions.try_into().map_err(|_| {
        CollaboratorError::Malformed(format!(
            "expected {QUESTIONS_PER_SESSION} questions, got {count}"
        ))
    })
}

/// Generic questions used when generation is unavailable. Only the role varies.
pub fn fallback_questions(role: &str) -> [String; QUESTIONS_PER_SESSION] {
    [
        format!("Can you describe your experience working with {role} technologies?"),
        "What is the most challenging project you've worked on recently?".to_string(),
        "How do you handle tight deadlines and shifting priorities?".to_string(),
        "Explain a core concept in your field to a non-technical person.".to_string(),
        "Where do you see yourself professionally in the next 3 years?".to_string(),
    ]
}

/// Neutral evaluation used when scoring is unavailable: every sub-score 5.
pub fn fallback_evaluation() -> Evaluation {
    Evaluation {
        technical_score: 5,
        structure_score: 5,
        depth_score: 5,
        confidence_score: 5,
        strengths: vec!["Provided an answer".to_string()],
        weaknesses: vec!["AI evaluation unavailable".to_string()],
        improved_answer:
            "AI feedback is currently unavailable. Try again later to see a model answer."
                .to_string(),
    }
}

pub fn fallback_summary() -> InterviewSummary {
    InterviewSummary {
        feedback: "Session completed. Great effort on practicing!".to_string(),
        readiness_level: ReadinessLevel::Intermediate,
        next_steps: vec![
            "Keep practicing core concepts".to_string(),
            "Work on structuring answers".to_string(),
        ],
        recommended_courses: vec!["Data Structures".to_string(), "System Design".to_string()],
    }
}
