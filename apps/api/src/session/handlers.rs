//! Axum route handlers for interactive optimization sessions.
//!
//! Each handler locks only its own session. Generation holds that lock for the
//! duration of the strategy call, so calls against one session serialize.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::options::OptionSet;
use crate::models::json_resume::JsonResume;
use crate::models::resume::{ResumeDocument, UnitId};
use crate::scoring::engine::{ScoreReport, ScoringOptions};
use crate::session::state::{
    AcceptResult, CandidateSelector, GenerationParams, NextOptimization, OptimizationSession,
    SessionSummary, UnitStatus,
};
use crate::state::AppState;
use crate::storage::handlers::ResumeSource;
use crate::storage::StoredVersion;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    #[serde(flatten)]
    pub source: ResumeSource,
    /// Job text, or an http(s) URL to fetch it from.
    pub job_description: String,
    #[serde(default)]
    pub options: ScoringOptions,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub baseline: ScoreReport,
    pub next: Option<NextOptimization>,
    pub summary: SessionSummary,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptionsRequest {
    pub count: Option<usize>,
    /// Free-text steer for the next round, e.g. "shorter" or "more metrics".
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    /// Index into the current option set, or the candidate text itself.
    pub candidate: CandidateSelector,
}

#[derive(Debug, Serialize)]
pub struct UnitStatusResponse {
    pub unit_id: UnitId,
    pub status: UnitStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub skip_current: bool,
}

#[derive(Debug, Serialize)]
pub struct NextOptimizationResponse {
    pub next: Option<NextOptimization>,
    /// Unit passed over by `skip_current`. Its status is unchanged.
    pub skipped: Option<UnitId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FinalizeRequest {
    /// Defaults to true. Only meaningful for sessions started from a stored résumé.
    pub persist: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub resume: ResumeDocument,
    pub json_resume: JsonResume,
    pub baseline: ScoreReport,
    pub report: ScoreReport,
    pub persisted: Option<StoredVersion>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), AppError> {
    let config = state.scoring.with_options(&request.options)?;
    let (doc, source_id) = request.source.resolve(&state).await?;
    let job_text = state.fetcher.resolve(&request.job_description).await?;

    let session = OptimizationSession::start(doc, &job_text, config, source_id)?;
    let baseline = session.baseline().clone();
    let next = session.next_optimization()?;
    let summary = session.summary()?;
    let session_id = state.sessions.insert(session).await;

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id,
            baseline,
            next,
            summary,
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_session_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.summary()?))
}

/// GET /api/v1/sessions/:id/next?skip_current=true
pub async fn handle_next_optimization(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<NextQuery>,
) -> Result<Json<NextOptimizationResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let session = handle.lock().await;
    let (skipped, next) = if query.skip_current {
        session.skip_current()?
    } else {
        (None, session.next_optimization()?)
    };
    Ok(Json(NextOptimizationResponse { next, skipped }))
}

/// POST /api/v1/sessions/:id/units/:unit/options
pub async fn handle_generate_options(
    State(state): State<AppState>,
    Path((session_id, unit)): Path<(Uuid, u64)>,
    request: Option<Json<OptionsRequest>>,
) -> Result<Json<OptionSet>, AppError> {
    let params = generation_params(&state, request.map(|Json(r)| r).unwrap_or_default())?;
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let set = session
        .generate_options(state.generator.as_ref(), UnitId(unit), &params)
        .await?;
    Ok(Json(set.clone()))
}

/// POST /api/v1/sessions/:id/summary/options
///
/// Options for the professional summary, without knowing its unit id.
pub async fn handle_generate_summary_options(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    request: Option<Json<OptionsRequest>>,
) -> Result<Json<OptionSet>, AppError> {
    let params = generation_params(&state, request.map(|Json(r)| r).unwrap_or_default())?;
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let summary_id = session
        .working_document()?
        .basics
        .summary
        .as_ref()
        .map(|s| s.id)
        .ok_or_else(|| AppError::NotFound("Résumé has no professional summary".to_string()))?;
    let set = session
        .generate_options(state.generator.as_ref(), summary_id, &params)
        .await?;
    Ok(Json(set.clone()))
}

/// POST /api/v1/sessions/:id/units/:unit/regenerate
pub async fn handle_regenerate_options(
    State(state): State<AppState>,
    Path((session_id, unit)): Path<(Uuid, u64)>,
    request: Option<Json<OptionsRequest>>,
) -> Result<Json<OptionSet>, AppError> {
    let params = generation_params(&state, request.map(|Json(r)| r).unwrap_or_default())?;
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let set = session
        .regenerate_options(state.generator.as_ref(), UnitId(unit), &params)
        .await?;
    Ok(Json(set.clone()))
}

/// POST /api/v1/sessions/:id/units/:unit/accept
pub async fn handle_accept(
    State(state): State<AppState>,
    Path((session_id, unit)): Path<(Uuid, u64)>,
    Json(request): Json<AcceptRequest>,
) -> Result<Json<AcceptResult>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    Ok(Json(session.accept(UnitId(unit), &request.candidate)?))
}

/// POST /api/v1/sessions/:id/units/:unit/reject
pub async fn handle_reject(
    State(state): State<AppState>,
    Path((session_id, unit)): Path<(Uuid, u64)>,
) -> Result<Json<UnitStatusResponse>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let status = session.reject(UnitId(unit))?;
    Ok(Json(UnitStatusResponse {
        unit_id: UnitId(unit),
        status,
    }))
}

/// POST /api/v1/sessions/:id/finalize
///
/// Re-scores the working copy. For a session started from a stored résumé the
/// result is saved (previous version kept) unless `persist` is false. The
/// session closes only after the save succeeds.
pub async fn handle_finalize(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    request: Option<Json<FinalizeRequest>>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let persist = request
        .and_then(|Json(r)| r.persist)
        .unwrap_or(true);
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;

    let (result, persisted) = match session.source_resume_id() {
        Some(_) if persist => {
            let result = session.prepare_finalize()?;
            let version = state.store.save(&result.document).await?;
            session.mark_finalized(&result.report)?;
            (result, Some(version))
        }
        _ => (session.finalize()?, None),
    };

    info!(
        "Finalized session {session_id}: {:.1} -> {:.1}{}",
        result.baseline.overall,
        result.report.overall,
        persisted
            .map(|v| format!(", saved as version {}", v.version))
            .unwrap_or_default()
    );
    Ok(Json(FinalizeResponse {
        json_resume: result.document.to_json_resume(),
        resume: result.document,
        baseline: result.baseline,
        report: result.report,
        persisted,
    }))
}

/// POST /api/v1/sessions/:id/abandon
///
/// Discards the working copy. Storage is never touched.
pub async fn handle_abandon(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    session.abandon()?;
    Ok(Json(session.summary()?))
}

fn generation_params(state: &AppState, request: OptionsRequest) -> Result<GenerationParams, AppError> {
    let max = state.config.max_option_count;
    let count = request.count.unwrap_or(state.config.default_option_count);
    if count == 0 || count > max {
        return Err(AppError::InvalidInput(format!(
            "count must be between 1 and {max}"
        )));
    }
    Ok(GenerationParams {
        count,
        feedback: request.feedback.filter(|f| !f.trim().is_empty()),
        timeout: state.config.generation_timeout,
    })
}
