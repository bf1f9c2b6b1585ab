//! LLM-backed interview collaborators.
//!
//! One `LlmInterviewer` implements all three collaborator traits on top of the
//! shared `LlmClient`. Model output is parsed into lenient wire payloads and
//! normalised (scores rounded and clamped to 0 – 10) before reaching the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::collaborator::CollaboratorError;
use crate::interview::collaborators::{AnswerEvaluator, QuestionGenerator, SummaryGenerator};
use crate::interview::models::{
    Difficulty, Evaluation, InterviewSummary, InterviewType, Question, ReadinessLevel,
};
use crate::interview::prompts::{
    EVALUATION_PERSONA, EVALUATION_PROMPT, QUESTION_GEN_PERSONA, QUESTION_GEN_PROMPT,
    SUMMARY_PERSONA, SUMMARY_PROMPT,
};
use crate::llm_client::prompts::{json_system, render};
use crate::llm_client::LlmClient;

const MAX_SUB_SCORE: f64 = 10.0;

#[derive(Clone)]
pub struct LlmInterviewer {
    llm: LlmClient,
}

impl LlmInterviewer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

/// Models sometimes wrap the list in an object; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionsPayload {
    List(Vec<String>),
    Wrapped { questions: Vec<String> },
}

impl From<QuestionsPayload> for Vec<String> {
    fn from(payload: QuestionsPayload) -> Self {
        match payload {
            QuestionsPayload::List(questions) | QuestionsPayload::Wrapped { questions } => {
                questions
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationPayload {
    technical_score: f64,
    structure_score: f64,
    depth_score: f64,
    confidence_score: f64,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    improved_answer: String,
}

impl From<EvaluationPayload> for Evaluation {
    fn from(p: EvaluationPayload) -> Self {
        Evaluation {
            technical_score: clamp_sub_score(p.technical_score),
            structure_score: clamp_sub_score(p.structure_score),
            depth_score: clamp_sub_score(p.depth_score),
            confidence_score: clamp_sub_score(p.confidence_score),
            strengths: p.strengths,
            weaknesses: p.weaknesses,
            improved_answer: p.improved_answer,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPayload {
    feedback: String,
    readiness_level: ReadinessLevel,
    #[serde(default)]
    next_steps: Vec<String>,
    #[serde(default)]
    recommended_courses: Vec<String>,
}

impl TryFrom<SummaryPayload> for InterviewSummary {
    type Error = CollaboratorError;

    fn try_from(p: SummaryPayload) -> Result<Self, Self::Error> {
        if p.readiness_level == ReadinessLevel::NotEvaluated {
            return Err(CollaboratorError::Malformed(
                "summary must assign a readiness level".to_string(),
            ));
        }
        Ok(InterviewSummary {
            feedback: p.feedback,
            readiness_level: p.readiness_level,
            next_steps: p.next_steps,
            recommended_courses: p.recommended_courses,
        })
    }
}

/// Compact per-question data fed to the summary prompt.
#[derive(Serialize)]
struct PerformanceEntry<'a> {
    q: &'a str,
    score: u32,
    weaknesses: &'a [String],
}

fn clamp_sub_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, MAX_SUB_SCORE) as u8
}

fn performance_json(questions: &[Question]) -> Result<String, CollaboratorError> {
    let entries: Vec<PerformanceEntry<'_>> = questions
        .iter()
        .map(|q| PerformanceEntry {
            q: &q.question_text,
            score: q.score,
            weaknesses: q
                .evaluation
                .as_ref()
                .map(|e| e.weaknesses.as_slice())
                .unwrap_or(&[]),
        })
        .collect();
    serde_json::to_string(&entries).map_err(|e| CollaboratorError::Malformed(e.to_string()))
}

fn evaluation_prompt(question: &str, answer: &str, role: &str) -> String {
    render(
        EVALUATION_PROMPT,
        &[("role", role), ("question", question), ("answer", answer)],
    )
}

#[async_trait]
impl QuestionGenerator for LlmInterviewer {
    async fn generate(
        &self,
        role: &str,
        difficulty: Difficulty,
        interview_type: InterviewType,
    ) -> Result<Vec<String>, CollaboratorError> {
        let prompt = render(
            QUESTION_GEN_PROMPT,
            &[
                ("role", role),
                ("difficulty", difficulty.as_str()),
                ("interview_type", interview_type.as_str()),
            ],
        );
        let payload: QuestionsPayload = self
            .llm
            .call_json(&prompt, &json_system(QUESTION_GEN_PERSONA))
            .await?;
        Ok(payload.into())
    }
}

#[async_trait]
impl AnswerEvaluator for LlmInterviewer {
    async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        role: &str,
    ) -> Result<Evaluation, CollaboratorError> {
        let prompt = evaluation_prompt(question, answer, role);
        let payload: EvaluationPayload = self
            .llm
            .call_json(&prompt, &json_system(EVALUATION_PERSONA))
            .await?;
        Ok(payload.into())
    }
}

#[async_trait]
impl SummaryGenerator for LlmInterviewer {
    async fn summarize(
        &self,
        role: &str,
        questions: &[Question],
    ) -> Result<InterviewSummary, CollaboratorError> {
        let performance = performance_json(questions)?;
        let prompt = render(
            SUMMARY_PROMPT,
            &[("role", role), ("performance", performance.as_str())],
        );
        let payload: SummaryPayload = self
            .llm
            .call_json(&prompt, &json_system(SUMMARY_PERSONA))
            .await?;
        payload.try_into()
    }
}
