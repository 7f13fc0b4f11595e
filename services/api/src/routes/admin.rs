use crate::infra::AppState;
use axum::extract::{Multipart, Path, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use deep_interview::admin::{self, AdminStats, AnalyticsEntry, CandidateStatusView};
use deep_interview::auth::{AdminAuth, AdminToken, AuthError};
use deep_interview::candidates::CandidateId;
use deep_interview::error::AppError;
use deep_interview::report::{build_report, CandidateReport};
use deep_interview::roster::{self, RosterUpdate};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    pub(crate) message: &'static str,
    #[serde(flatten)]
    pub(crate) update: RosterUpdate,
    pub(crate) restarted_interviews: usize,
}

pub(crate) async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(AdminAuth::bearer_token)
        .ok_or(AuthError::InvalidToken)?;

    let username = state.auth.authorize(token)?;
    debug!(admin = %username, path = %request.uri().path(), "admin request authorized");
    Ok(next.run(request).await)
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AdminToken>, AppError> {
    let token = state.auth.login(&payload.username, &payload.password)?;
    Ok(Json(token))
}

pub(crate) async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateStatusView>>, AppError> {
    let interviews = &state.interviews;
    let statuses =
        admin::candidate_statuses(interviews.candidates(), interviews.answers(), state.script())?;
    Ok(Json(statuses))
}

pub(crate) async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>, AppError> {
    let interviews = &state.interviews;
    let stats = admin::admin_stats(interviews.candidates(), interviews.answers(), state.script())?;
    Ok(Json(stats))
}

pub(crate) async fn analytics(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalyticsEntry>>, AppError> {
    let interviews = &state.interviews;
    let entries = admin::analytics(
        interviews.candidates(),
        interviews.answers(),
        state.rate_per_minute,
    )?;
    Ok(Json(entries))
}

pub(crate) async fn upload_roster(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let is_csv = field
            .file_name()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".csv"));
        if !is_csv {
            return Err(AppError::BadRequest("File must be CSV".to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        let update = roster::upsert_roster(Cursor::new(bytes), state.interviews.candidates())?;
        let restarted_interviews = state.interviews.restart_interviews(&update.reassigned)?;
        info!(
            inserted = update.inserted,
            updated = update.updated,
            restarted_interviews,
            "roster upload applied"
        );

        return Ok(Json(UploadResponse {
            message: "CSV uploaded successfully",
            update,
            restarted_interviews,
        }));
    }

    Err(AppError::BadRequest(
        "multipart field 'file' is required".to_string(),
    ))
}

pub(crate) async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let interviews = &state.interviews;
    let mut buffer = Vec::new();
    roster::export_candidates(
        interviews.candidates(),
        interviews.answers(),
        state.script(),
        &mut buffer,
    )?;

    Ok(attachment(
        "text/csv; charset=utf-8",
        "candidates_export.csv",
        buffer,
    ))
}

fn load_report(state: &AppState, candidate_id: u64) -> Result<CandidateReport, AppError> {
    let interviews = &state.interviews;
    build_report(
        interviews.candidates(),
        interviews.answers(),
        CandidateId(candidate_id),
        state.rate_per_minute,
    )?
    .ok_or_else(|| AppError::NotFound(format!("candidate {candidate_id}")))
}

pub(crate) async fn report_json(
    State(state): State<AppState>,
    Path(candidate_id): Path<u64>,
) -> Result<Json<CandidateReport>, AppError> {
    Ok(Json(load_report(&state, candidate_id)?))
}

pub(crate) async fn report_text(
    State(state): State<AppState>,
    Path(candidate_id): Path<u64>,
) -> Result<Response, AppError> {
    let report = load_report(&state, candidate_id)?;
    Ok(attachment(
        "text/plain; charset=utf-8",
        &format!("report_candidate_{candidate_id}.txt"),
        report.to_text().into_bytes(),
    ))
}

pub(crate) async fn report_csv(
    State(state): State<AppState>,
    Path(candidate_id): Path<u64>,
) -> Result<Response, AppError> {
    let report = load_report(&state, candidate_id)?;
    let mut buffer = Vec::new();
    report
        .write_csv(&mut buffer)
        .map_err(|err| AppError::Io(err.into()))?;
    Ok(attachment(
        "text/csv; charset=utf-8",
        &format!("report_candidate_{candidate_id}.csv"),
        buffer,
    ))
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
        .into_response()
}
