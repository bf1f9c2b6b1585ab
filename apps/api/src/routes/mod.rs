pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::interview::handlers as interviews;
use crate::resume::handlers as resumes;
use crate::state::AppState;

/// Requester identity for read endpoints. Authentication happens upstream.
#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes/analyze", post(resumes::handle_analyze))
        .route("/api/v1/resumes/history", get(resumes::handle_history))
        .route("/api/v1/resumes/:id", get(resumes::handle_get_analysis))
        // Mock interview API
        .route("/api/v1/interviews/start", post(interviews::handle_start))
        .route(
            "/api/v1/interviews/answer",
            post(interviews::handle_submit_answer),
        )
        .route("/api/v1/interviews/history", get(interviews::handle_history))
        .route(
            "/api/v1/interviews/:id/results",
            get(interviews::handle_results),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::interview::collaborators::fallback_questions;
    use crate::llm_client::LlmClient;

    // No API key: every collaborator degrades to its fallback, so the whole
    // stack is deterministic.
    fn app() -> Router {
        let llm = LlmClient::new(None, Duration::from_secs(1)).unwrap();
        build_router(AppState::new(Config::default(), None, llm))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn start_interview(app: &Router, user: Uuid) -> Uuid {
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/interviews/start",
            Some(json!({
                "user_id": user,
                "role": "Data Engineer",
                "difficulty": "Hard",
                "type": "Mixed"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().parse().unwrap()
    }

    async fn answer(app: &Router, user: Uuid, session: Uuid, index: i64) -> (StatusCode, Value) {
        send(
            app,
            "POST",
            "/api/v1/interviews/answer",
            Some(json!({
                "user_id": user,
                "session_id": session,
                "question_index": index,
                "answer": format!("My answer to question {index}")
            })),
        )
        .await
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ai_enabled"], false);
    }

    #[tokio::test]
    async fn test_start_returns_first_question() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/interviews/start",
            Some(json!({
                "user_id": Uuid::new_v4(),
                "role": "Data Engineer",
                "difficulty": "easy",
                "type": "Technical"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["total_questions"], 5);
        assert_eq!(
            body["first_question"],
            fallback_questions("Data Engineer")[0].as_str()
        );
    }

    #[tokio::test]
    async fn test_start_without_role_is_bad_request() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/interviews/start",
            Some(json!({"user_id": Uuid::new_v4(), "difficulty": "Easy", "type": "Mixed"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_full_interview_flow() {
        let app = app();
        let user = Uuid::new_v4();
        let session = start_interview(&app, user).await;

        let uri = format!("/api/v1/interviews/{session}/results?user_id={user}");
        for index in 0..5 {
            if index == 4 {
                let (_, partial) = send(&app, "GET", &uri, None).await;
                assert_eq!(partial["status"], "In Progress");
                assert_eq!(partial["readiness_level"], "Not Evaluated");
            }
            let (status, body) = answer(&app, user, session, index).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["score"], 5);
            assert_eq!(body["is_last_question"], index == 4);
            assert_eq!(body["next_question"].is_null(), index == 4);
        }

        let (status, results) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["status"], "Completed");
        assert_eq!(results["overall_score"], 5);
        assert_eq!(results["readiness_level"], "Intermediate");
        assert_eq!(results["strengths"], json!(["Provided an answer"]));

        let (_, again) = send(&app, "GET", &uri, None).await;
        assert_eq!(again, results);

        let (status, body) = answer(&app, user, session, 0).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_STATE");

        let uri = format!("/api/v1/interviews/history?user_id={user}");
        let (status, history) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["overall_score"], 5);
        assert!(history[0].get("questions").is_none());
    }

    #[tokio::test]
    async fn test_answer_out_of_range_is_bad_request() {
        let app = app();
        let user = Uuid::new_v4();
        let session = start_interview(&app, user).await;
        let (status, _) = answer(&app, user, session, 5).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_results_of_other_users_session_are_not_found() {
        let app = app();
        let session = start_interview(&app, Uuid::new_v4()).await;
        let uri = format!(
            "/api/v1/interviews/{session}/results?user_id={}",
            Uuid::new_v4()
        );
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_resume_analyze_history_and_get() {
        let app = app();
        let user = Uuid::new_v4();
        let text = "Summary\nExperience: Built React and Node.js apps used by 500 users.\n\
                    Education\nSkills: JavaScript, SQL, Git\nProjects";

        let (status, record) = send(
            &app,
            "POST",
            "/api/v1/resumes/analyze",
            Some(json!({"user_id": user, "text": text, "file_name": "cv.pdf"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(record["score"].as_u64().unwrap() <= 100);
        assert_eq!(record["missing_sections"], json!([]));
        assert_eq!(record["ai_feedback"]["detailed_suggestions"], record["weaknesses"]);

        let id = record["id"].as_str().unwrap();
        let (status, fetched) = send(
            &app,
            "GET",
            &format!("/api/v1/resumes/{id}?user_id={user}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, record);

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/v1/resumes/{id}?user_id={}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, history) = send(
            &app,
            "GET",
            &format!("/api/v1/resumes/history?user_id={user}"),
            None,
        )
        .await;
        assert_eq!(history.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resume_too_short_is_bad_request() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/resumes/analyze",
            Some(json!({"user_id": Uuid::new_v4(), "text": "Too short"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
