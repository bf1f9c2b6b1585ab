use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::engine::{AnswerOutcome, StartSessionRequest, StartedSession};
use crate::interview::models::{InterviewSession, SessionSummary};
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StartInterviewRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub setup: StartSessionRequest,
}

#[derive(Deserialize)]
pub struct SubmitAnswerRequest {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub question_index: i64,
    pub answer: String,
}

/// POST /api/v1/interviews/start
pub async fn handle_start(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<StartedSession>), AppError> {
    let started = state.interviews.start_session(req.user_id, req.setup).await?;
    Ok((StatusCode::CREATED, Json(started)))
}

/// POST /api/v1/interviews/answer
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerOutcome>, AppError> {
    let outcome = state
        .interviews
        .submit_answer(req.user_id, req.session_id, req.question_index, req.answer)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/interviews/:id/results
pub async fn handle_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<InterviewSession>, AppError> {
    Ok(Json(state.interviews.get_results(id, params.user_id).await?))
}

/// GET /api/v1/interviews/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    Ok(Json(state.interviews.get_history(params.user_id).await?))
}
