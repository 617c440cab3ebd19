//! Axum route handlers for the Résumé API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::json_resume::JsonResume;
use crate::models::resume::{ContentUnit, ResumeDocument};
use crate::render::TemplateId;
use crate::state::AppState;
use crate::storage::{ResumeListing, StoredVersion};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A résumé named by id or passed inline as JSON Resume. Exactly one is required.
#[derive(Debug, Default, Deserialize)]
pub struct ResumeSource {
    pub resume_id: Option<Uuid>,
    pub resume: Option<JsonResume>,
}

impl ResumeSource {
    /// Loads or converts the document and checks it is well formed.
    pub async fn resolve(self, state: &AppState) -> Result<(ResumeDocument, Option<Uuid>), AppError> {
        let (doc, id) = match (self.resume_id, self.resume) {
            (Some(id), None) => (state.store.load(id).await?, Some(id)),
            (None, Some(resume)) => (ResumeDocument::from_json_resume(resume), None),
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "Provide either resume_id or resume, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "One of resume_id or resume is required".to_string(),
                ))
            }
        };
        doc.validate()?;
        Ok((doc, id))
    }
}

#[derive(Debug, Serialize)]
pub struct StoreResumeResponse {
    pub resume_id: Uuid,
    pub version: u32,
    pub content_units: Vec<ContentUnit>,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub resume: ResumeDocument,
    pub content_units: Vec<ContentUnit>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub resume_id: Uuid,
    pub version: u32,
    pub resume: ResumeDocument,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub template: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Stores a JSON Resume body as a new résumé with fresh identifiers.
pub async fn handle_store_resume(
    State(state): State<AppState>,
    Json(resume): Json<JsonResume>,
) -> Result<(StatusCode, Json<StoreResumeResponse>), AppError> {
    let doc = ResumeDocument::from_json_resume(resume);
    let StoredVersion { id, version } = state.store.save(&doc).await?;
    info!("Stored résumé {id} with {} content units", doc.content_units().len());
    Ok((
        StatusCode::CREATED,
        Json(StoreResumeResponse {
            resume_id: id,
            version,
            content_units: doc.content_units(),
        }),
    ))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeListing>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/v1/resumes/:id
///
/// Returns the internal document with identifiers so callers can address content units.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let resume = state.store.load(resume_id).await?;
    let content_units = resume.content_units();
    Ok(Json(ResumeDetailResponse {
        resume,
        content_units,
    }))
}

/// DELETE /api/v1/resumes/:id
///
/// Removes the résumé and its version history. Open sessions keep their working copies.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete(resume_id).await?;
    info!("Deleted résumé {resume_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/import-pdf
///
/// Raw PDF bytes in the body. The imported document is stored immediately;
/// `warnings` lists what the importer had to guess.
pub async fn handle_import_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ImportResponse>), AppError> {
    let imported = state.importer.import(&body).await?;
    let StoredVersion { id, version } = state.store.save(&imported.document).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            resume_id: id,
            version,
            resume: imported.document,
            warnings: imported.warnings,
        }),
    ))
}

/// GET /api/v1/resumes/:id/export?template=modern|classic|executive
pub async fn handle_export_text(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let template = match query.template.as_deref() {
        Some(t) => t.parse::<TemplateId>()?,
        None => TemplateId::default(),
    };
    let doc = state.store.load(resume_id).await?;
    let rendered = state.renderer.render(&doc, template);
    Ok(([(header::CONTENT_TYPE, rendered.content_type)], rendered.body).into_response())
}
