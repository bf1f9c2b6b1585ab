use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::models::ResumeAnalysisRecord;
use crate::routes::UserIdQuery;
use crate::state::AppState;

/// Text extraction happens client-side; the API receives plain text.
#[derive(Deserialize)]
pub struct AnalyzeResumeRequest {
    pub user_id: Uuid,
    pub text: String,
    pub file_name: Option<String>,
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeResumeRequest>,
) -> Result<(StatusCode, Json<ResumeAnalysisRecord>), AppError> {
    let record = state
        .resumes
        .analyze(req.user_id, &req.text, req.file_name)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/resumes/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeAnalysisRecord>>, AppError> {
    Ok(Json(state.resumes.history(params.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeAnalysisRecord>, AppError> {
    Ok(Json(state.resumes.get(id, params.user_id).await?))
}
