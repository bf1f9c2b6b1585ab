//! Interview session aggregate and the value types embedded in it.
//!
//! The aggregate only exposes state transitions (`record_answer`, `finalize`);
//! the engine applies them to a copy of the stored session and persists the result.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every session has exactly this many questions, for its whole lifetime.
pub const QUESTIONS_PER_SESSION: usize = 5;

/// Aggregated strengths/weaknesses are capped at this many items.
pub const MAX_AGGREGATED_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewType {
    Technical,
    Behavioral,
    Mixed,
}

/// Serialized with display names; `as_str` gives the storage column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "In Progress", alias = "in_progress")]
    InProgress,
    #[serde(alias = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    Beginner,
    Intermediate,
    #[serde(rename = "Interview Ready", alias = "InterviewReady")]
    InterviewReady,
    #[default]
    #[serde(rename = "Not Evaluated")]
    NotEvaluated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{other}' (expected Easy, Medium or Hard)"
            )),
        }
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "behavioral" | "behavioural" => Ok(InterviewType::Behavioral),
            "mixed" => Ok(InterviewType::Mixed),
            other => Err(format!(
                "unknown interview type '{other}' (expected Technical, Behavioral or Mixed)"
            )),
        }
    }
}

/// Per-answer evaluation. Sub-scores are 0 – 10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub technical_score: u8,
    pub structure_score: u8,
    pub depth_score: u8,
    pub confidence_score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improved_answer: String,
}

impl Evaluation {
    /// Rounded mean of the four sub-scores.
    pub fn question_score(&self) -> u32 {
        rounded_mean(&[
            self.technical_score as u32,
            self.structure_score as u32,
            self.depth_score as u32,
            self.confidence_score as u32,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_text: String,
    pub user_answer: String,
    pub evaluation: Option<Evaluation>,
    pub score: u32,
}

impl Question {
    fn unanswered(question_text: String) -> Self {
        Self {
            question_text,
            user_answer: String::new(),
            evaluation: None,
            score: 0,
        }
    }

    pub fn is_answered(&self) -> bool {
        !self.user_answer.trim().is_empty()
    }
}

/// What the summary collaborator hands back for a finished interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSummary {
    pub feedback: String,
    pub readiness_level: ReadinessLevel,
    pub next_steps: Vec<String>,
    pub recommended_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSummary {
    pub feedback: String,
    pub next_steps: Vec<String>,
    pub recommended_courses: Vec<String>,
}

/// Parameters fixed at session creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    pub role: String,
    pub difficulty: Difficulty,
    pub interview_type: InterviewType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub questions: [Question; QUESTIONS_PER_SESSION],
    pub status: SessionStatus,
    /// Set exactly once, when the session completes.
    pub overall_score: Option<u32>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub readiness_level: ReadinessLevel,
    pub ai_summary: Option<AiSummary>,
    /// Optimistic-concurrency token; bumped by the store on every update.
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// History projection: no per-question detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub role: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub overall_score: Option<u32>,
    pub readiness_level: ReadinessLevel,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(
        user_id: Uuid,
        setup: SessionSetup,
        question_texts: [String; QUESTIONS_PER_SESSION],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            role: setup.role,
            difficulty: setup.difficulty,
            interview_type: setup.interview_type,
            questions: question_texts.map(Question::unanswered),
            status: SessionStatus::InProgress,
            overall_score: None,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            readiness_level: ReadinessLevel::NotEvaluated,
            ai_summary: None,
            version: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    pub fn all_answered(&self) -> bool {
        self.questions.iter().all(Question::is_answered)
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Stores an answer and its evaluation on one question, returning the
    /// derived question score. Callers validate the index and status first.
    pub fn record_answer(&mut self, index: usize, answer: String, evaluation: Evaluation) -> u32 {
        let score = evaluation.question_score();
        let question = &mut self.questions[index];
        question.user_answer = answer;
        question.evaluation = Some(evaluation);
        question.score = score;
        score
    }

    /// InProgress → Completed. Aggregates per-question results and copies the
    /// summary in. Callers check `all_answered` and `is_completed` first.
    pub fn finalize(&mut self, summary: InterviewSummary) {
        let scores: Vec<u32> = self.questions.iter().map(|q| q.score).collect();
        self.overall_score = Some(rounded_mean(&scores));

        let evaluations: Vec<&Evaluation> = self
            .questions
            .iter()
            .filter_map(|q| q.evaluation.as_ref())
            .collect();
        let strengths = dedup_first_seen(
            evaluations.iter().flat_map(|e| e.strengths.iter()),
            MAX_AGGREGATED_ITEMS,
        );
        let weaknesses = dedup_first_seen(
            evaluations.iter().flat_map(|e| e.weaknesses.iter()),
            MAX_AGGREGATED_ITEMS,
        );
        self.strengths = strengths;
        self.weaknesses = weaknesses;

        self.readiness_level = summary.readiness_level;
        self.ai_summary = Some(AiSummary {
            feedback: summary.feedback,
            next_steps: summary.next_steps,
            recommended_courses: summary.recommended_courses,
        });
        self.status = SessionStatus::Completed;
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            role: self.role.clone(),
            difficulty: self.difficulty,
            interview_type: self.interview_type,
            overall_score: self.overall_score,
            readiness_level: self.readiness_level,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Round-half-up mean of non-negative integers; 0 for an empty slice.
pub fn rounded_mean(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let n = values.len() as u64;
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    ((2 * sum + n) / (2 * n)) as u32
}

/// Union of `items` in first-seen order, truncated to `limit`.
fn dedup_first_seen<'a>(items: impl Iterator<Item = &'a String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(item.as_str()))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(scores: [u8; 4], strengths: &[&str], weaknesses: &[&str]) -> Evaluation {
        Evaluation {
            technical_score: scores[0],
            structure_score: scores[1],
            depth_score: scores[2],
            confidence_score: scores[3],
            strengths: strengths.iter().map(|s| s.to_string()).collect(),
            weaknesses: weaknesses.iter().map(|s| s.to_string()).collect(),
            improved_answer: "better".to_string(),
        }
    }

    fn session() -> InterviewSession {
        InterviewSession::new(
            Uuid::new_v4(),
            SessionSetup {
                role: "Backend Engineer".to_string(),
                difficulty: Difficulty::Medium,
                interview_type: InterviewType::Technical,
            },
            std::array::from_fn(|i| format!("Question {}", i + 1)),
        )
    }

    fn summary() -> InterviewSummary {
        InterviewSummary {
            feedback: "Solid".to_string(),
            readiness_level: ReadinessLevel::InterviewReady,
            next_steps: vec!["a".into(), "b".into(), "c".into()],
            recommended_courses: vec!["x".into(), "y".into()],
        }
    }

    #[test]
    fn test_new_session_is_unanswered_and_in_progress() {
        let s = session();
        assert_eq!(s.questions.len(), QUESTIONS_PER_SESSION);
        assert_eq!(s.status, SessionStatus::InProgress);
        assert_eq!(s.overall_score, None);
        assert_eq!(s.readiness_level, ReadinessLevel::NotEvaluated);
        assert!(s.questions.iter().all(|q| q.score == 0 && q.evaluation.is_none()));
        assert!(!s.all_answered());
    }

    #[test]
    fn test_question_score_rounds_half_up() {
        assert_eq!(evaluation([8, 7, 6, 8], &[], &[]).question_score(), 7); // 7.25
        assert_eq!(evaluation([8, 7, 7, 8], &[], &[]).question_score(), 8); // 7.5
        assert_eq!(evaluation([0, 0, 0, 1], &[], &[]).question_score(), 0); // 0.25
        assert_eq!(evaluation([10, 10, 10, 10], &[], &[]).question_score(), 10);
    }

    #[test]
    fn test_rounded_mean() {
        assert_eq!(rounded_mean(&[]), 0);
        assert_eq!(rounded_mean(&[7, 8, 6, 9, 7]), 7); // 7.4
        assert_eq!(rounded_mean(&[7, 8, 8, 9, 7]), 8); // 7.8
    }

    #[test]
    fn test_blank_answer_is_not_answered() {
        let mut s = session();
        s.record_answer(0, "   ".to_string(), evaluation([5, 5, 5, 5], &[], &[]));
        assert!(!s.questions[0].is_answered());
    }

    #[test]
    fn test_finalize_aggregates_and_completes() {
        let mut s = session();
        let per_question = vec![
            (vec!["Clear", "Concise"], vec!["Shallow"]),
            (vec!["Clear", "Examples"], vec!["Shallow", "Rushed"]),
            (vec!["Structured"], vec!["Vague"]),
            (vec!["Confident", "Concise"], vec!["Rushed", "No metrics"]),
            (vec!["Honest", "Curious"], vec!["Off topic"]),
        ];
        for (i, (strengths, weaknesses)) in per_question.iter().enumerate() {
            s.record_answer(
                i,
                format!("answer {i}"),
                evaluation([6, 7, 8, 9], strengths, weaknesses),
            );
        }
        assert!(s.all_answered());

        s.finalize(summary());

        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.overall_score, Some(8)); // every question scores round(7.5) = 8
        assert_eq!(
            s.strengths,
            vec!["Clear", "Concise", "Examples", "Structured", "Confident"]
        );
        assert_eq!(
            s.weaknesses,
            vec!["Shallow", "Rushed", "Vague", "No metrics", "Off topic"]
        );
        assert_eq!(s.readiness_level, ReadinessLevel::InterviewReady);
        let ai = s.ai_summary.as_ref().unwrap();
        assert_eq!(ai.feedback, "Solid");
        assert_eq!(ai.recommended_courses.len(), 2);
    }

    #[test]
    fn test_readiness_serde_uses_display_names() {
        let json = serde_json::to_string(&ReadinessLevel::InterviewReady).unwrap();
        assert_eq!(json, r#""Interview Ready""#);
        let parsed: ReadinessLevel = serde_json::from_str(r#""Beginner""#).unwrap();
        assert_eq!(parsed, ReadinessLevel::Beginner);
    }

    #[test]
    fn test_status_serde_uses_display_names() {
        let json = serde_json::to_string(&SessionStatus::InProgress).unwrap();
        assert_eq!(json, r#""In Progress""#);
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            r#""Completed""#
        );
        assert_eq!(SessionStatus::InProgress.as_str(), "in_progress");
        let legacy: SessionStatus = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(legacy, SessionStatus::Completed);
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" Mixed ".parse::<InterviewType>().unwrap(), InterviewType::Mixed);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_session_json_rejects_wrong_question_count() {
        let s = session();
        let mut value = serde_json::to_value(&s).unwrap();
        value["questions"].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<InterviewSession>(value).is_err());
    }

    #[test]
    fn test_summary_projection() {
        let s = session();
        let summary = s.summary();
        assert_eq!(summary.id, s.id);
        assert_eq!(summary.role, "Backend Engineer");
        assert_eq!(summary.status, SessionStatus::InProgress);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("questions").is_none());
        assert_eq!(json["type"], "Technical");
    }
}
