mod admin;

use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use deep_interview::assistant::{self, FollowUp};
use deep_interview::candidates::Registration;
use deep_interview::error::AppError;
use deep_interview::interview::ChatReply;
use deep_interview::repository::{AnswerRepository, CandidateRepository};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::Ordering;

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) full_name: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct RegisterResponse {
    pub(crate) status: &'static str,
    pub(crate) message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) processes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    pub(crate) full_name: String,
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FollowUpRequest {
    pub(crate) question: String,
    pub(crate) answer: String,
    #[serde(default)]
    pub(crate) step_counter: usize,
}

pub(crate) fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/admin/dashboard", get(admin::dashboard))
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/analytics", get(admin::analytics))
        .route("/api/admin/upload", post(admin::upload_roster))
        .route("/api/admin/export", get(admin::export))
        .route("/api/admin/report/:candidate_id", get(admin::report_json))
        .route("/api/admin/report/:candidate_id/text", get(admin::report_text))
        .route("/api/admin/report/:candidate_id/csv", get(admin::report_csv))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin,
        ));

    Router::new()
        .route("/", get(root))
        .route("/api/ping", get(ping))
        .route("/health", get(healthcheck))
        .route("/api/health", get(api_health))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/register", post(register))
        .route("/api/chat", post(chat))
        .route("/api/interview/ai-helper", post(follow_up))
        .route("/api/admin/login", post(admin::login))
        .merge(protected)
        .with_state(state)
}

pub(crate) async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "DeepInterview API is running" }))
}

pub(crate) async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn api_health(State(state): State<AppState>) -> impl IntoResponse {
    let interviews = &state.interviews;
    let counts = interviews
        .candidates()
        .list()
        .and_then(|candidates| Ok((candidates.len(), interviews.answers().all()?.len())));

    match counts {
        Ok((candidates, answers)) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "storage": "in-memory",
                "candidates": candidates,
                "answers": answers,
            })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "storage": "unavailable",
                "error": err.to_string(),
            })),
        ),
    }
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            String::new(),
        ),
    }
}

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let response = match state.interviews.register(&payload.full_name)? {
        Registration::Allowed { processes } => RegisterResponse {
            status: "ok",
            message: "allowed",
            processes: Some(processes),
        },
        Registration::Forbidden => RegisterResponse {
            status: "error",
            message: "forbidden",
            processes: None,
        },
    };
    Ok(Json(response))
}

pub(crate) async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = state.interviews.chat(&payload.full_name, &payload.message)?;
    Ok(Json(reply))
}

pub(crate) async fn follow_up(Json(payload): Json<FollowUpRequest>) -> Json<FollowUp> {
    Json(assistant::follow_up(
        &payload.question,
        &payload.answer,
        payload.step_counter,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use deep_interview::candidates::NewCandidate;
    use deep_interview::config::AdminConfig;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    pub(super) fn test_state() -> AppState {
        let state = AppState::new(
            &AdminConfig {
                username: "admin".to_string(),
                password: "secret".to_string(),
                token_ttl_minutes: 30,
            },
            0.5,
        );
        state
            .interviews
            .candidates()
            .insert(NewCandidate::new("Grace Hopper", "Compiling, Debugging"))
            .expect("seed candidate");
        state
    }

    pub(super) async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("request handled");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collected")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub(super) fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn register_allows_roster_members_only() {
        let app = router(test_state());
        let (status, body) = send(
            app.clone(),
            post_json("/api/register", json!({ "full_name": "Grace Hopper" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "allowed");
        assert_eq!(body["processes"], json!(["Compiling", "Debugging"]));

        let (_, body) = send(
            app,
            post_json("/api/register", json!({ "full_name": "Someone Else" })),
        )
        .await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "forbidden");
        assert!(body.get("processes").is_none());
    }

    #[tokio::test]
    async fn chat_walks_through_the_script() {
        let app = router(test_state());
        let (status, body) = send(
            app.clone(),
            post_json(
                "/api/chat",
                json!({ "full_name": "Grace Hopper", "message": "start interview" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["bot_message"],
            "Process: Compiling\n\nHow does the process start?"
        );
        assert_eq!(body["progress"], 0);

        let (_, body) = send(
            app.clone(),
            post_json(
                "/api/chat",
                json!({ "full_name": "Grace Hopper", "message": "A compile job is queued" }),
            ),
        )
        .await;
        assert_eq!(body["progress"], 8);

        let (_, body) = send(
            app,
            post_json(
                "/api/chat",
                json!({ "full_name": "Grace Hopper", "message": "sometimes long" }),
            ),
        )
        .await;
        assert_eq!(
            body["bot_message"],
            "Please be more precise (in minutes or as a count)."
        );
        assert_eq!(body["progress"], 8);
    }

    #[tokio::test]
    async fn chat_errors_carry_status_codes() {
        let app = router(test_state());
        let (status, body) = send(
            app.clone(),
            post_json(
                "/api/chat",
                json!({ "full_name": "Nobody", "message": "start interview" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "candidate not found");

        let (status, _) = send(
            app,
            post_json(
                "/api/chat",
                json!({ "full_name": "Grace Hopper", "message": "an answer" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn follow_up_endpoint_suggests_next_prompt() {
        let app = router(test_state());
        let (status, body) = send(
            app,
            post_json(
                "/api/interview/ai-helper",
                json!({
                    "question": "How does the process start?",
                    "answer": "Email",
                    "context": { "role": "ignored" },
                    "step_counter": 1
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["follow_up_question"],
            "Could you tell a bit more: how does the process start?"
        );
        assert!(body["motivation_phrase"].as_str().is_some());
    }

    #[tokio::test]
    async fn readiness_reflects_flag_and_health_reports_roster() {
        let state = test_state();
        let app = router(state.clone());
        let request = || Request::get("/ready").body(Body::empty()).expect("request");

        let (status, body) = send(app.clone(), request()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        state.readiness.store(true, Ordering::Release);
        let (status, _) = send(app.clone(), request()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            app,
            Request::get("/api/health").body(Body::empty()).expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidates"], 1);
        assert_eq!(body["answers"], 0);
    }
}
