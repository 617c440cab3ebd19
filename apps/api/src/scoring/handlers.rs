//! Axum route handlers for job analysis and scoring.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::scoring::completeness::{compute_completeness_report, CompletenessReport};
use crate::scoring::engine::{keyword_gaps, score, KeywordGapReport, ScoreReport, ScoringOptions};
use crate::scoring::jd_parser::JobDescription;
use crate::state::AppState;
use crate::storage::handlers::ResumeSource;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    /// Job text, or an http(s) URL to fetch it from.
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub job: JobDescription,
    pub fingerprint: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(flatten)]
    pub source: ResumeSource,
    pub job_description: String,
    #[serde(default)]
    pub options: ScoringOptions,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub report: ScoreReport,
    pub completeness: CompletenessReport,
}

#[derive(Debug, Deserialize)]
pub struct MissingKeywordsRequest {
    #[serde(flatten)]
    pub source: ResumeSource,
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/analyze
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    let text = state.fetcher.resolve(&request.job_description).await?;
    let job = JobDescription::parse(&text)?;
    let fingerprint = job.fingerprint();
    Ok(Json(AnalyzeJobResponse { job, fingerprint }))
}

/// POST /api/v1/score
///
/// Pure evaluation: nothing is stored, not even a score-history record.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let config = state.scoring.with_options(&request.options)?;
    let (doc, _) = request.source.resolve(&state).await?;
    let text = state.fetcher.resolve(&request.job_description).await?;
    let job = JobDescription::parse(&text)?;
    let report = score(&doc, &job, &config)?;
    Ok(Json(ScoreResponse {
        report,
        completeness: compute_completeness_report(&doc),
    }))
}

/// POST /api/v1/score/missing-keywords
pub async fn handle_missing_keywords(
    State(state): State<AppState>,
    Json(request): Json<MissingKeywordsRequest>,
) -> Result<Json<KeywordGapReport>, AppError> {
    let (doc, _) = request.source.resolve(&state).await?;
    let text = state.fetcher.resolve(&request.job_description).await?;
    let job = JobDescription::parse(&text)?;
    Ok(Json(keyword_gaps(&doc, &job)))
}
