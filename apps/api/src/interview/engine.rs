//! Interview Session Engine — the InProgress → Completed state machine.
//!
//! Flow: start_session → submit_answer × 5 → get_results (finalizes once).
//!
//! Every collaborator call is bounded by a timeout and degrades to a fixed
//! fallback. Every mutation is "load, apply transition to a copy, compare-and-swap
//! persist", serialized per session in-process and version-checked in the store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::interview::collaborators::{
    fallback_evaluation, fallback_questions, fallback_summary, validate_questions,
    with_fallback, AnswerEvaluator, QuestionGenerator, SummaryGenerator,
};
use crate::interview::models::{
    Evaluation, InterviewSession, SessionSetup, SessionSummary, QUESTIONS_PER_SESSION,
};
use crate::interview::store::SessionStore;
use crate::store::StoreError;

/// Compare-and-swap attempts before a write is reported as a conflict.
const MAX_UPDATE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub collaborator_timeout: Duration,
    pub allow_answer_resubmission: bool,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            collaborator_timeout: config.collaborator_timeout,
            allow_answer_resubmission: config.allow_answer_resubmission,
        }
    }
}

/// Raw setup parameters as supplied by the caller; validated by the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartSessionRequest {
    pub role: Option<String>,
    pub difficulty: Option<String>,
    #[serde(rename = "type")]
    pub interview_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub total_questions: usize,
    pub first_question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub evaluation: Evaluation,
    pub score: u32,
    pub is_last_question: bool,
    pub next_question: Option<String>,
}

/// Per-session async locks. Entries nobody holds are pruned on each acquire.
#[derive(Default)]
struct SessionLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(&self, session_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|id, lock| *id == session_id || Arc::strong_count(lock) > 1);
            locks.entry(session_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

pub struct InterviewEngine {
    store: Arc<dyn SessionStore>,
    question_generator: Arc<dyn QuestionGenerator>,
    answer_evaluator: Arc<dyn AnswerEvaluator>,
    summary_generator: Arc<dyn SummaryGenerator>,
    settings: EngineSettings,
    locks: SessionLocks,
}

impl InterviewEngine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        question_generator: Arc<dyn QuestionGenerator>,
        answer_evaluator: Arc<dyn AnswerEvaluator>,
        summary_generator: Arc<dyn SummaryGenerator>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            question_generator,
            answer_evaluator,
            summary_generator,
            settings,
            locks: SessionLocks::default(),
        }
    }

    /// Creates a session with five generated (or fallback) questions.
    pub async fn start_session(
        &self,
        user_id: Uuid,
        request: StartSessionRequest,
    ) -> Result<StartedSession, AppError> {
        let setup = parse_setup(request)?;

        let questions = with_fallback(
            "question generator",
            self.settings.collaborator_timeout,
            async {
                let generated = self
                    .question_generator
                    .generate(&setup.role, setup.difficulty, setup.interview_type)
                    .await?;
                validate_questions(generated)
            },
            || fallback_questions(&setup.role),
        )
        .await;

        let session = InterviewSession::new(user_id, setup, questions);
        self.store.create(&session).await?;

        info!(
            "Started interview session {} for user {} ({}, {}, {})",
            session.id, user_id, session.role, session.difficulty, session.interview_type
        );

        Ok(StartedSession {
            session_id: session.id,
            total_questions: QUESTIONS_PER_SESSION,
            first_question: session.questions[0].question_text.clone(),
        })
    }

    /// Evaluates and records one answer. Never completes the session.
    pub async fn submit_answer(
        &self,
        requester: Uuid,
        session_id: Uuid,
        question_index: i64,
        answer: String,
    ) -> Result<AnswerOutcome, AppError> {
        let session = self.load_owned(session_id, requester).await?;
        let index = self.check_answerable(&session, question_index, &answer)?;
        let question_text = session.questions[index].question_text.clone();

        // Evaluate outside the session lock; only the write is serialized.
        let evaluation = with_fallback(
            "answer evaluator",
            self.settings.collaborator_timeout,
            self.answer_evaluator
                .evaluate(&question_text, &answer, &session.role),
            fallback_evaluation,
        )
        .await;

        let _guard = self.locks.acquire(session_id).await;
        let stored = self
            .apply_with_retry(session_id, requester, |current| {
                self.check_answerable(current, question_index, &answer)?;
                current.record_answer(index, answer.clone(), evaluation.clone());
                Ok(true)
            })
            .await?;

        let score = stored.questions[index].score;
        let is_last_question = index == QUESTIONS_PER_SESSION - 1;
        let next_question = stored
            .question(index + 1)
            .map(|q| q.question_text.clone());

        info!(
            "Session {session_id}: question {} answered, score {score}/10",
            index + 1
        );

        Ok(AnswerOutcome {
            evaluation,
            score,
            is_last_question,
            next_question,
        })
    }

    /// Returns the session, finalizing it first if every question is answered.
    /// Completed sessions and partially answered ones are returned untouched.
    pub async fn get_results(
        &self,
        session_id: Uuid,
        requester: Uuid,
    ) -> Result<InterviewSession, AppError> {
        let session = self.load_owned(session_id, requester).await?;
        if !ready_to_finalize(&session) {
            return Ok(session);
        }

        // Held across the summary call so concurrent pollers summarize once.
        let _guard = self.locks.acquire(session_id).await;
        let session = self.load_owned(session_id, requester).await?;
        if !ready_to_finalize(&session) {
            return Ok(session);
        }

        let summary = with_fallback(
            "summary generator",
            self.settings.collaborator_timeout,
            self.summary_generator
                .summarize(&session.role, &session.questions),
            fallback_summary,
        )
        .await;

        let stored = self
            .apply_with_retry(session_id, requester, |current| {
                if !ready_to_finalize(current) {
                    return Ok(false);
                }
                current.finalize(summary.clone());
                Ok(true)
            })
            .await?;

        info!(
            "Session {session_id} completed: overall {:?}, readiness {:?}",
            stored.overall_score, stored.readiness_level
        );
        Ok(stored)
    }

    pub async fn get_history(&self, user_id: Uuid) -> Result<Vec<SessionSummary>, AppError> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    /// Loads a session, hiding sessions owned by someone else as not found.
    async fn load_owned(
        &self,
        session_id: Uuid,
        requester: Uuid,
    ) -> Result<InterviewSession, AppError> {
        self.store
            .get(session_id)
            .await?
            .filter(|s| s.is_owned_by(requester))
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
    }

    fn check_answerable(
        &self,
        session: &InterviewSession,
        question_index: i64,
        answer: &str,
    ) -> Result<usize, AppError> {
        if session.is_completed() {
            return Err(AppError::InvalidState(
                "Session is already completed".to_string(),
            ));
        }

        let index = usize::try_from(question_index)
            .ok()
            .filter(|i| *i < QUESTIONS_PER_SESSION)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "question_index must be between 0 and {}, got {question_index}",
                    QUESTIONS_PER_SESSION - 1
                ))
            })?;

        if answer.trim().is_empty() {
            return Err(AppError::Validation("answer cannot be empty".to_string()));
        }

        if !self.settings.allow_answer_resubmission && session.questions[index].is_answered() {
            return Err(AppError::InvalidState(format!(
                "Question {index} has already been answered"
            )));
        }

        Ok(index)
    }

    /// Loads the latest state, applies `transition` and persists with a version
    /// check, reloading on conflict. `transition` returns `false` to skip the write.
    async fn apply_with_retry<F>(
        &self,
        session_id: Uuid,
        requester: Uuid,
        mut transition: F,
    ) -> Result<InterviewSession, AppError>
    where
        F: FnMut(&mut InterviewSession) -> Result<bool, AppError> + Send,
    {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let mut session = self.load_owned(session_id, requester).await?;
            if !transition(&mut session)? {
                return Ok(session);
            }
            match self.store.update(&session).await {
                Ok(stored) => return Ok(stored),
                Err(StoreError::VersionConflict { .. }) => {
                    warn!("Session {session_id}: version conflict on attempt {attempt}, reloading");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(format!(
            "Session {session_id} kept changing; gave up after {MAX_UPDATE_ATTEMPTS} attempts"
        )))
    }
}

fn ready_to_finalize(session: &InterviewSession) -> bool {
    !session.is_completed() && session.all_answered()
}

fn parse_setup(request: StartSessionRequest) -> Result<SessionSetup, AppError> {
    fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Validation(format!("Missing required field: {field}")))
    }

    let role = required(request.role, "role")?;
    let difficulty = required(request.difficulty, "difficulty")?
        .parse()
        .map_err(AppError::Validation)?;
    let interview_type = required(request.interview_type, "type")?
        .parse()
        .map_err(AppError::Validation)?;

    Ok(SessionSetup {
        role,
        difficulty,
        interview_type,
    })
}
