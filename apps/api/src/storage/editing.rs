//! Section-level editing of stored résumés.
//!
//! Each edit loads the current version, applies one change and saves a new
//! version. Entries are addressed by their `UnitId`, never by list position,
//! so an identifier held by a client keeps naming the same entry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::json_resume::JsonResume;
use crate::models::resume::{ContentUnit, ResumeDocument, UnitId};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub resume_id: Uuid,
    pub version: u32,
    /// The entry created or changed, absent for basics, target and deletes.
    pub entry_id: Option<UnitId>,
    pub content_units: Vec<ContentUnit>,
}

/// Fields left out are unchanged. A blank string clears an optional field.
#[derive(Debug, Default, Deserialize)]
pub struct BasicsPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub industry: Option<String>,
    #[serde(default)]
    pub target_roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddWorkRequest {
    pub company: String,
    pub position: String,
    pub start_date: Option<String>,
    /// Omitted means the role is current.
    pub end_date: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// `highlights`, when present, replaces the whole list with fresh identifiers.
#[derive(Debug, Default, Deserialize)]
pub struct WorkPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    /// Blank or "present" marks the role as current.
    pub end_date: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AddEducationRequest {
    pub institution: String,
    pub study_type: Option<String>,
    pub area: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub score: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
}

/// Merged into an existing category of the same name.
#[derive(Debug, Deserialize)]
pub struct AddSkillRequest {
    pub category: String,
    pub keywords: Vec<String>,
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddProjectRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddCertificateRequest {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLanguageRequest {
    pub language: String,
    pub fluency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddInterestRequest {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn patch_field(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *field = non_blank(value);
    }
}

impl BasicsPatch {
    fn apply(self, doc: &mut ResumeDocument) {
        if let Some(name) = self.name {
            doc.basics.name = name.trim().to_string();
        }
        let basics = &mut doc.basics;
        patch_field(&mut basics.label, self.label);
        patch_field(&mut basics.email, self.email);
        patch_field(&mut basics.phone, self.phone);
        patch_field(&mut basics.url, self.url);
        if self.city.is_some() || self.region.is_some() {
            let location = basics.location.get_or_insert_with(Default::default);
            patch_field(&mut location.city, self.city);
            patch_field(&mut location.region, self.region);
        }
        match self.summary.map(non_blank) {
            Some(Some(text)) => {
                doc.set_summary(text);
            }
            Some(None) => doc.basics.summary = None,
            None => {}
        }
    }
}

impl WorkPatch {
    fn apply(self, doc: &mut ResumeDocument, work_id: UnitId) -> Result<(), AppError> {
        let work = doc.work_mut(work_id)?;
        if let Some(company) = self.company {
            work.name = company.trim().to_string();
        }
        if let Some(position) = self.position {
            work.position = position.trim().to_string();
        }
        patch_field(&mut work.start_date, self.start_date);
        if let Some(end) = self.end_date {
            work.end_date = non_blank(end).filter(|e| !e.eq_ignore_ascii_case("present"));
        }
        patch_field(&mut work.summary, self.summary);
        patch_field(&mut work.url, self.url);
        if let Some(highlights) = self.highlights {
            doc.set_work_highlights(work_id, highlights)?;
        }
        Ok(())
    }
}

/// Loads, edits, validates and saves. Nothing is written if `edit` or
/// validation fails.
async fn apply_edit<F>(
    state: &AppState,
    resume_id: Uuid,
    edit: F,
) -> Result<EditResponse, AppError>
where
    F: FnOnce(&mut ResumeDocument) -> Result<Option<UnitId>, AppError>,
{
    let mut doc = state.store.load(resume_id).await?;
    let entry_id = edit(&mut doc)?;
    doc.touch();
    let stored = state.store.save(&doc).await?;
    Ok(EditResponse {
        resume_id,
        version: stored.version,
        entry_id,
        content_units: doc.content_units(),
    })
}

fn created(response: EditResponse) -> (StatusCode, Json<EditResponse>) {
    (StatusCode::CREATED, Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/resumes/:id/basics
pub async fn handle_update_basics(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(patch): Json<BasicsPatch>,
) -> Result<Json<EditResponse>, AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        patch.apply(doc);
        Ok(None)
    })
    .await?;
    Ok(Json(response))
}

/// PUT /api/v1/resumes/:id/target
///
/// Records the industry and roles the résumé is aimed at.
pub async fn handle_set_target(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<TargetRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        doc.set_target(req.industry, req.target_roles);
        Ok(None)
    })
    .await?;
    info!("Set target for résumé {resume_id}");
    Ok(Json(response))
}

/// POST /api/v1/resumes/:id/work
pub async fn handle_add_work(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<AddWorkRequest>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        let id = doc.add_work(req.company.trim(), req.position.trim());
        let work = doc.work_mut(id)?;
        work.start_date = req.start_date.and_then(non_blank);
        work.end_date = req.end_date.and_then(non_blank);
        work.summary = req.summary.and_then(non_blank);
        work.url = req.url.and_then(non_blank);
        for text in req.highlights {
            doc.add_work_highlight(id, text)?;
        }
        Ok(Some(id))
    })
    .await?;
    Ok(created(response))
}

/// PATCH /api/v1/resumes/:id/work/:entry
pub async fn handle_update_work(
    State(state): State<AppState>,
    Path((resume_id, entry)): Path<(Uuid, u64)>,
    Json(patch): Json<WorkPatch>,
) -> Result<Json<EditResponse>, AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        patch.apply(doc, UnitId(entry))?;
        Ok(Some(UnitId(entry)))
    })
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/resumes/:id/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<AddEducationRequest>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        let id = doc.add_education(req.institution.trim());
        if let Some(edu) = doc.education.last_mut() {
            edu.study_type = req.study_type.and_then(non_blank);
            edu.area = req.area.and_then(non_blank);
            edu.start_date = req.start_date.and_then(non_blank);
            edu.end_date = req.end_date.and_then(non_blank);
            edu.score = req.score.and_then(non_blank);
            edu.courses = req.courses.into_iter().filter_map(non_blank).collect();
        }
        Ok(Some(id))
    })
    .await?;
    Ok(created(response))
}

/// POST /api/v1/resumes/:id/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<AddSkillRequest>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        Ok(Some(doc.merge_skill(
            req.category.trim(),
            req.keywords,
            req.level.and_then(non_blank),
        )))
    })
    .await?;
    Ok(created(response))
}

/// POST /api/v1/resumes/:id/projects
pub async fn handle_add_project(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<AddProjectRequest>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        let id = doc.add_project(req.name.trim());
        for text in req.highlights {
            doc.add_project_highlight(id, text)?;
        }
        if let Some(project) = doc.projects.iter_mut().find(|p| p.id == id) {
            project.description = req.description.and_then(non_blank);
            project.keywords = req.keywords.into_iter().filter_map(non_blank).collect();
            project.url = req.url.and_then(non_blank);
            project.start_date = req.start_date.and_then(non_blank);
            project.end_date = req.end_date.and_then(non_blank);
        }
        Ok(Some(id))
    })
    .await?;
    Ok(created(response))
}

/// POST /api/v1/resumes/:id/certificates
pub async fn handle_add_certificate(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<AddCertificateRequest>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        let id = doc.add_certificate(req.name.trim(), req.issuer.and_then(non_blank));
        if let Some(cert) = doc.certificates.last_mut() {
            cert.date = req.date.and_then(non_blank);
            cert.url = req.url.and_then(non_blank);
        }
        Ok(Some(id))
    })
    .await?;
    Ok(created(response))
}

/// POST /api/v1/resumes/:id/languages
pub async fn handle_add_language(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<AddLanguageRequest>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        Ok(Some(doc.add_language(
            req.language.trim(),
            req.fluency.and_then(non_blank),
        )))
    })
    .await?;
    Ok(created(response))
}

/// POST /api/v1/resumes/:id/interests
pub async fn handle_add_interest(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<AddInterestRequest>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        Ok(Some(doc.merge_interest(req.name.trim(), req.keywords)))
    })
    .await?;
    Ok(created(response))
}

/// DELETE /api/v1/resumes/:id/entries/:entry
///
/// Removes any entry, highlight or the summary by identifier.
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path((resume_id, entry)): Path<(Uuid, u64)>,
) -> Result<Json<EditResponse>, AppError> {
    let response = apply_edit(&state, resume_id, |doc| {
        doc.remove(UnitId(entry))?;
        Ok(None)
    })
    .await?;
    info!("Removed entry {entry} from résumé {resume_id}");
    Ok(Json(response))
}

/// GET /api/v1/resumes/:id/json-resume
pub async fn handle_export_json_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<JsonResume>, AppError> {
    let doc = state.store.load(resume_id).await?;
    Ok(Json(doc.to_json_resume()))
}
