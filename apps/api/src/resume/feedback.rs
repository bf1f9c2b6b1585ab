//! Resume Feedback — optional AI commentary on a scored resume.
//!
//! The score never depends on this collaborator. A missing API key and a
//! failed call produce different fixed feedback so the client can tell
//! "not configured" apart from "temporarily broken".

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::collaborator::CollaboratorError;
use crate::llm_client::prompts::{json_system, render};
use crate::llm_client::{LlmClient, LlmError};
use crate::resume::models::ResumeFeedback;
use crate::resume::prompts::{
    MAX_RESUME_PROMPT_CHARS, RESUME_REVIEW_PERSONA, RESUME_REVIEW_PROMPT,
};
use crate::resume::scorer::ResumeAnalysis;

const UNCONFIGURED_SUMMARY: &str =
    "AI provider key missing. Algorithmic analysis complete, but AI-driven feedback is unavailable.";
const UNCONFIGURED_EXAMPLE: &str = "Example: 'Led a team of 5' instead of 'Was in charge of people'";
const FAILED_SUMMARY: &str = "Unable to generate AI feedback at this time.";

#[async_trait]
pub trait ResumeFeedbackGenerator: Send + Sync {
    async fn review(
        &self,
        resume_text: &str,
        analysis: &ResumeAnalysis,
    ) -> Result<ResumeFeedback, CollaboratorError>;
}

/// Runs the reviewer under `timeout`; every failure maps to fixed feedback.
pub async fn review_with_fallback(
    reviewer: &dyn ResumeFeedbackGenerator,
    timeout: Duration,
    resume_text: &str,
    analysis: &ResumeAnalysis,
) -> ResumeFeedback {
    let outcome = match tokio::time::timeout(timeout, reviewer.review(resume_text, analysis)).await
    {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(timeout)),
    };

    match outcome {
        Ok(feedback) => feedback,
        Err(CollaboratorError::Llm(LlmError::MissingApiKey)) => unconfigured_feedback(analysis),
        Err(e) => {
            warn!("resume reviewer failed, using fallback: {e}");
            failed_feedback(analysis)
        }
    }
}

pub fn unconfigured_feedback(analysis: &ResumeAnalysis) -> ResumeFeedback {
    ResumeFeedback {
        summary_feedback: UNCONFIGURED_SUMMARY.to_string(),
        detailed_suggestions: analysis.weaknesses.clone(),
        rewritten_examples: vec![UNCONFIGURED_EXAMPLE.to_string()],
    }
}

pub fn failed_feedback(analysis: &ResumeAnalysis) -> ResumeFeedback {
    ResumeFeedback {
        summary_feedback: FAILED_SUMMARY.to_string(),
        detailed_suggestions: analysis.weaknesses.clone(),
        rewritten_examples: Vec::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed reviewer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct LlmResumeReviewer {
    llm: LlmClient,
}

impl LlmResumeReviewer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackPayload {
    summary_feedback: String,
    #[serde(default)]
    detailed_suggestions: Vec<String>,
    #[serde(default)]
    rewritten_examples: Vec<String>,
}

impl From<FeedbackPayload> for ResumeFeedback {
    fn from(p: FeedbackPayload) -> Self {
        ResumeFeedback {
            summary_feedback: p.summary_feedback,
            detailed_suggestions: p.detailed_suggestions,
            rewritten_examples: p.rewritten_examples,
        }
    }
}

fn review_prompt(resume_text: &str, analysis: &ResumeAnalysis) -> String {
    let excerpt: String = resume_text.chars().take(MAX_RESUME_PROMPT_CHARS).collect();
    let score = analysis.score.to_string();
    let weaknesses = analysis.weaknesses.join(", ");
    let missing_sections = analysis.missing_sections.join(", ");
    render(
        RESUME_REVIEW_PROMPT,
        &[
            ("resume_text", excerpt.as_str()),
            ("score", score.as_str()),
            ("weaknesses", weaknesses.as_str()),
            ("missing_sections", missing_sections.as_str()),
        ],
    )
}

#[async_trait]
impl ResumeFeedbackGenerator for LlmResumeReviewer {
    async fn review(
        &self,
        resume_text: &str,
        analysis: &ResumeAnalysis,
    ) -> Result<ResumeFeedback, CollaboratorError> {
        let payload: FeedbackPayload = self
            .llm
            .call_json(
                &review_prompt(resume_text, analysis),
                &json_system(RESUME_REVIEW_PERSONA),
            )
            .await?;
        Ok(payload.into())
    }
}
