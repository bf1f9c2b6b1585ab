use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::interview::engine::{EngineSettings, InterviewEngine};
use crate::interview::llm::LlmInterviewer;
use crate::interview::store::{InMemorySessionStore, PgSessionStore, SessionStore};
use crate::llm_client::LlmClient;
use crate::resume::feedback::LlmResumeReviewer;
use crate::resume::service::ResumeService;
use crate::resume::store::{InMemoryResumeStore, PgResumeStore, ResumeAnalysisStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub interviews: Arc<InterviewEngine>,
    pub resumes: Arc<ResumeService>,
}

impl AppState {
    /// Wires stores and collaborators. Without a pool everything lives in memory.
    pub fn new(config: Config, db: Option<PgPool>, llm: LlmClient) -> Self {
        let (sessions, analyses): (Arc<dyn SessionStore>, Arc<dyn ResumeAnalysisStore>) = match db
        {
            Some(pool) => (
                Arc::new(PgSessionStore::new(pool.clone())),
                Arc::new(PgResumeStore::new(pool)),
            ),
            None => {
                info!("DATABASE_URL not set, using in-memory stores");
                (
                    Arc::new(InMemorySessionStore::new()),
                    Arc::new(InMemoryResumeStore::new()),
                )
            }
        };

        let interviewer = Arc::new(LlmInterviewer::new(llm.clone()));
        let interviews = InterviewEngine::new(
            sessions,
            interviewer.clone(),
            interviewer.clone(),
            interviewer,
            EngineSettings::from(&config),
        );
        let resumes = ResumeService::new(
            analyses,
            Arc::new(LlmResumeReviewer::new(llm)),
            config.collaborator_timeout,
        );

        Self {
            config,
            interviews: Arc::new(interviews),
            resumes: Arc::new(resumes),
        }
    }
}
