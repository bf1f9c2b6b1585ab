//! Failure type shared by every AI collaborator (interview and resume).
//! Callers never surface it: each failure is logged and replaced by a fallback.

use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed collaborator output: {0}")]
    Malformed(String),
}
