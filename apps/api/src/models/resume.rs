//! Résumé document model: JSON Resume v1.0.0 sections plus stable content-unit identifiers.
//!
//! Every entry and every addressable piece of text (summary, work highlight,
//! project highlight) carries a `UnitId` drawn from a per-document counter.
//! The counter is persisted with the document and only ever moves forward,
//! so an identifier is never handed out twice, even after deletion.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::errors::AppError;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12]\d|3[01]))?)?$").expect("valid date regex")
});

/// Stable identifier of an entry or content unit within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single addressable line of résumé text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: UnitId,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub network: String,
    pub username: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Basics {
    pub name: String,
    pub label: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    /// The professional summary is itself a content unit.
    pub summary: Option<Bullet>,
    pub location: Option<Location>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub id: UnitId,
    /// Company name.
    pub name: String,
    pub position: String,
    pub url: Option<String>,
    pub start_date: Option<String>,
    /// `None` means "Present".
    pub end_date: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub highlights: Vec<Bullet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: UnitId,
    pub institution: String,
    pub url: Option<String>,
    pub area: Option<String>,
    pub study_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub score: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: UnitId,
    /// Category name, e.g. "Programming Languages".
    pub name: String,
    pub level: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: UnitId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<Bullet>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateEntry {
    pub id: UnitId,
    pub name: String,
    pub date: Option<String>,
    pub issuer: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub id: UnitId,
    pub title: String,
    pub date: Option<String>,
    pub awarder: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub id: UnitId,
    pub language: String,
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestEntry {
    pub id: UnitId,
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A historical ATS score attached to the document at finalize time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub timestamp: DateTime<Utc>,
    pub job_fingerprint: String,
    pub overall: f64,
    pub criteria: BTreeMap<String, f64>,
}

/// Internal metadata, stripped on JSON Resume export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: Uuid,
    pub industry: Option<String>,
    #[serde(default)]
    pub target_roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub score_history: Vec<ScoreRecord>,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            industry: None,
            target_roles: vec![],
            created_at: now,
            updated_at: now,
            score_history: vec![],
        }
    }
}

/// Which part of the document a content unit lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Summary,
    WorkHighlight,
    ProjectHighlight,
}

/// A read-only view of one addressable piece of résumé text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentUnit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub text: String,
    /// Human-readable location, e.g. "Backend Engineer at Acme".
    pub context: String,
    /// Owning entry, if the unit is a highlight.
    pub entry_id: Option<UnitId>,
}

/// Résumé document. The session works on a clone; storage persists it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub basics: Basics,
    #[serde(default)]
    pub work: Vec<WorkEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub certificates: Vec<CertificateEntry>,
    #[serde(default)]
    pub awards: Vec<AwardEntry>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(default)]
    pub interests: Vec<InterestEntry>,
    #[serde(default)]
    pub meta: DocumentMeta,
    /// Next identifier to hand out. Never decreases.
    pub next_id: u64,
}

impl ResumeDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            basics: Basics {
                name: name.into(),
                ..Basics::default()
            },
            work: vec![],
            education: vec![],
            skills: vec![],
            projects: vec![],
            certificates: vec![],
            awards: vec![],
            languages: vec![],
            interests: vec![],
            meta: DocumentMeta::default(),
            next_id: 1,
        }
    }

    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    pub fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn touch(&mut self) {
        self.meta.updated_at = Utc::now();
    }

    // ── Editing ────────────────────────────────────────────────────────────

    /// Sets the summary text. An existing summary keeps its identifier.
    pub fn set_summary(&mut self, text: impl Into<String>) -> UnitId {
        let text = text.into();
        if let Some(summary) = self.basics.summary.as_mut() {
            summary.text = text;
            return summary.id;
        }
        let id = self.allocate_id();
        self.basics.summary = Some(Bullet { id, text });
        id
    }

    pub fn add_work(&mut self, company: impl Into<String>, position: impl Into<String>) -> UnitId {
        let id = self.allocate_id();
        self.work.push(WorkEntry {
            id,
            name: company.into(),
            position: position.into(),
            url: None,
            start_date: None,
            end_date: None,
            summary: None,
            highlights: vec![],
        });
        id
    }

    pub fn add_work_highlight(
        &mut self,
        work_id: UnitId,
        text: impl Into<String>,
    ) -> Result<UnitId, AppError> {
        let idx = self
            .work
            .iter()
            .position(|w| w.id == work_id)
            .ok_or_else(|| AppError::NotFound(format!("Work entry {work_id} not found")))?;
        let id = self.allocate_id();
        self.work[idx].highlights.push(Bullet {
            id,
            text: text.into(),
        });
        Ok(id)
    }

    pub fn add_project(&mut self, name: impl Into<String>) -> UnitId {
        let id = self.allocate_id();
        self.projects.push(ProjectEntry {
            id,
            name: name.into(),
            description: None,
            highlights: vec![],
            keywords: vec![],
            start_date: None,
            end_date: None,
            url: None,
            roles: vec![],
        });
        id
    }

    pub fn add_project_highlight(
        &mut self,
        project_id: UnitId,
        text: impl Into<String>,
    ) -> Result<UnitId, AppError> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?;
        let id = self.allocate_id();
        self.projects[idx].highlights.push(Bullet {
            id,
            text: text.into(),
        });
        Ok(id)
    }

    pub fn add_education(&mut self, institution: impl Into<String>) -> UnitId {
        let id = self.allocate_id();
        self.education.push(EducationEntry {
            id,
            institution: institution.into(),
            url: None,
            area: None,
            study_type: None,
            start_date: None,
            end_date: None,
            score: None,
            courses: vec![],
        });
        id
    }

    pub fn add_skill(&mut self, name: impl Into<String>, keywords: Vec<String>) -> UnitId {
        let id = self.allocate_id();
        self.skills.push(SkillEntry {
            id,
            name: name.into(),
            level: None,
            keywords,
        });
        id
    }

    pub fn add_certificate(&mut self, name: impl Into<String>, issuer: Option<String>) -> UnitId {
        let id = self.allocate_id();
        self.certificates.push(CertificateEntry {
            id,
            name: name.into(),
            date: None,
            issuer,
            url: None,
        });
        id
    }

    /// Adds keywords to the skill category named `category` (case-insensitive),
    /// creating it if absent. Keywords already listed are not repeated.
    pub fn merge_skill(
        &mut self,
        category: impl Into<String>,
        keywords: Vec<String>,
        level: Option<String>,
    ) -> UnitId {
        let category = category.into();
        if let Some(skill) = self
            .skills
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(category.trim()))
        {
            merge_keywords(&mut skill.keywords, keywords);
            if level.is_some() {
                skill.level = level;
            }
            return skill.id;
        }
        let id = self.add_skill(category, vec![]);
        if let Some(skill) = self.skills.last_mut() {
            merge_keywords(&mut skill.keywords, keywords);
            skill.level = level;
        }
        id
    }

    pub fn add_language(&mut self, language: impl Into<String>, fluency: Option<String>) -> UnitId {
        let id = self.allocate_id();
        self.languages.push(LanguageEntry {
            id,
            language: language.into(),
            fluency,
        });
        id
    }

    /// Same merge rule as `merge_skill`, keyed by interest name.
    pub fn merge_interest(&mut self, name: impl Into<String>, keywords: Vec<String>) -> UnitId {
        let name = name.into();
        if let Some(interest) = self
            .interests
            .iter_mut()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
        {
            merge_keywords(&mut interest.keywords, keywords);
            return interest.id;
        }
        let id = self.allocate_id();
        let mut merged = vec![];
        merge_keywords(&mut merged, keywords);
        self.interests.push(InterestEntry {
            id,
            name,
            keywords: merged,
        });
        id
    }

    pub fn work_mut(&mut self, work_id: UnitId) -> Result<&mut WorkEntry, AppError> {
        self.work
            .iter_mut()
            .find(|w| w.id == work_id)
            .ok_or_else(|| AppError::NotFound(format!("Work entry {work_id} not found")))
    }

    /// Replaces all highlights of a work entry. The old identifiers are retired.
    pub fn set_work_highlights(
        &mut self,
        work_id: UnitId,
        texts: Vec<String>,
    ) -> Result<Vec<UnitId>, AppError> {
        self.work_mut(work_id)?.highlights.clear();
        texts
            .into_iter()
            .map(|text| self.add_work_highlight(work_id, text))
            .collect()
    }

    /// Target industry and roles used to steer optimization.
    pub fn set_target(&mut self, industry: Option<String>, roles: Vec<String>) {
        self.meta.industry = industry.filter(|i| !i.trim().is_empty());
        self.meta.target_roles = roles
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
    }

    /// Removes an entry, a highlight or the summary. The identifier is retired.
    pub fn remove(&mut self, id: UnitId) -> Result<(), AppError> {
        if self.basics.summary.as_ref().is_some_and(|s| s.id == id) {
            self.basics.summary = None;
            return Ok(());
        }
        let before = self.entry_count();
        self.work.retain(|e| e.id != id);
        self.education.retain(|e| e.id != id);
        self.skills.retain(|e| e.id != id);
        self.projects.retain(|e| e.id != id);
        self.certificates.retain(|e| e.id != id);
        self.awards.retain(|e| e.id != id);
        self.languages.retain(|e| e.id != id);
        self.interests.retain(|e| e.id != id);
        if self.entry_count() != before {
            return Ok(());
        }
        for work in &mut self.work {
            if let Some(pos) = work.highlights.iter().position(|b| b.id == id) {
                work.highlights.remove(pos);
                return Ok(());
            }
        }
        for project in &mut self.projects {
            if let Some(pos) = project.highlights.iter().position(|b| b.id == id) {
                project.highlights.remove(pos);
                return Ok(());
            }
        }
        Err(AppError::NotFound(format!("Entry {id} not found")))
    }

    fn entry_count(&self) -> usize {
        self.work.len()
            + self.education.len()
            + self.skills.len()
            + self.projects.len()
            + self.certificates.len()
            + self.awards.len()
            + self.languages.len()
            + self.interests.len()
    }

    // ── Content units ──────────────────────────────────────────────────────

    /// All content units in document order: summary, work highlights, project highlights.
    pub fn content_units(&self) -> Vec<ContentUnit> {
        let mut units = Vec::new();
        if let Some(summary) = &self.basics.summary {
            units.push(ContentUnit {
                id: summary.id,
                kind: UnitKind::Summary,
                text: summary.text.clone(),
                context: "Professional summary".to_string(),
                entry_id: None,
            });
        }
        for work in &self.work {
            let context = format!("{} at {}", work.position, work.name);
            for bullet in &work.highlights {
                units.push(ContentUnit {
                    id: bullet.id,
                    kind: UnitKind::WorkHighlight,
                    text: bullet.text.clone(),
                    context: context.clone(),
                    entry_id: Some(work.id),
                });
            }
        }
        for project in &self.projects {
            let context = format!("Project {}", project.name);
            for bullet in &project.highlights {
                units.push(ContentUnit {
                    id: bullet.id,
                    kind: UnitKind::ProjectHighlight,
                    text: bullet.text.clone(),
                    context: context.clone(),
                    entry_id: Some(project.id),
                });
            }
        }
        units
    }

    pub fn unit(&self, id: UnitId) -> Option<ContentUnit> {
        self.content_units().into_iter().find(|u| u.id == id)
    }

    /// Highlight bullets only (work and project), excluding the summary.
    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.work
            .iter()
            .flat_map(|w| w.highlights.iter())
            .chain(self.projects.iter().flat_map(|p| p.highlights.iter()))
    }

    /// Replaces the text of one content unit, leaving every other unit untouched.
    pub fn replace_unit_text(&mut self, id: UnitId, text: impl Into<String>) -> Result<(), AppError> {
        let text = text.into();
        if let Some(summary) = self.basics.summary.as_mut().filter(|s| s.id == id) {
            summary.text = text;
            return Ok(());
        }
        let bullet = self
            .work
            .iter_mut()
            .flat_map(|w| w.highlights.iter_mut())
            .chain(self.projects.iter_mut().flat_map(|p| p.highlights.iter_mut()))
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Content unit {id} not found")))?;
        bullet.text = text;
        Ok(())
    }

    /// All résumé text joined for keyword matching.
    pub fn full_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(label) = &self.basics.label {
            parts.push(label.clone());
        }
        if let Some(summary) = &self.basics.summary {
            parts.push(summary.text.clone());
        }
        for work in &self.work {
            parts.push(format!("{} at {}", work.position, work.name));
            if let Some(summary) = &work.summary {
                parts.push(summary.clone());
            }
            parts.extend(work.highlights.iter().map(|b| b.text.clone()));
        }
        for edu in &self.education {
            parts.push(format!(
                "{} {} at {}",
                edu.study_type.as_deref().unwrap_or(""),
                edu.area.as_deref().unwrap_or(""),
                edu.institution
            ));
            parts.extend(edu.courses.iter().cloned());
        }
        for skill in &self.skills {
            parts.push(skill.name.clone());
            parts.extend(skill.keywords.iter().cloned());
        }
        for project in &self.projects {
            parts.push(project.name.clone());
            if let Some(description) = &project.description {
                parts.push(description.clone());
            }
            parts.extend(project.highlights.iter().map(|b| b.text.clone()));
            parts.extend(project.keywords.iter().cloned());
        }
        for cert in &self.certificates {
            parts.push(format!(
                "{} from {}",
                cert.name,
                cert.issuer.as_deref().unwrap_or("Unknown")
            ));
        }
        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    // ── Validation ─────────────────────────────────────────────────────────

    /// Checks the document-model invariants. Fails with `AppError::Validation`
    /// naming the first malformed section.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.basics.name.trim().is_empty() {
            return Err(AppError::Validation("basics.name must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for id in self.all_ids() {
            if id.0 >= self.next_id {
                return Err(AppError::Validation(format!(
                    "identifier {id} was never allocated (next_id = {})",
                    self.next_id
                )));
            }
            if !seen.insert(id) {
                return Err(AppError::Validation(format!(
                    "identifier {id} is used more than once"
                )));
            }
        }

        if let Some(summary) = &self.basics.summary {
            if summary.text.trim().is_empty() {
                return Err(AppError::Validation("basics.summary must not be blank".into()));
            }
        }

        for (i, work) in self.work.iter().enumerate() {
            require(&work.name, &format!("work[{i}].name"))?;
            require(&work.position, &format!("work[{i}].position"))?;
            check_date(work.start_date.as_deref(), &format!("work[{i}].start_date"))?;
            check_date(work.end_date.as_deref(), &format!("work[{i}].end_date"))?;
            for (j, bullet) in work.highlights.iter().enumerate() {
                require(&bullet.text, &format!("work[{i}].highlights[{j}]"))?;
            }
        }
        for (i, edu) in self.education.iter().enumerate() {
            require(&edu.institution, &format!("education[{i}].institution"))?;
            check_date(edu.start_date.as_deref(), &format!("education[{i}].start_date"))?;
            check_date(edu.end_date.as_deref(), &format!("education[{i}].end_date"))?;
        }
        for (i, skill) in self.skills.iter().enumerate() {
            require(&skill.name, &format!("skills[{i}].name"))?;
        }
        for (i, project) in self.projects.iter().enumerate() {
            require(&project.name, &format!("projects[{i}].name"))?;
            check_date(project.start_date.as_deref(), &format!("projects[{i}].start_date"))?;
            check_date(project.end_date.as_deref(), &format!("projects[{i}].end_date"))?;
            for (j, bullet) in project.highlights.iter().enumerate() {
                require(&bullet.text, &format!("projects[{i}].highlights[{j}]"))?;
            }
        }
        for (i, cert) in self.certificates.iter().enumerate() {
            require(&cert.name, &format!("certificates[{i}].name"))?;
            check_date(cert.date.as_deref(), &format!("certificates[{i}].date"))?;
        }
        for (i, award) in self.awards.iter().enumerate() {
            require(&award.title, &format!("awards[{i}].title"))?;
        }
        for (i, lang) in self.languages.iter().enumerate() {
            require(&lang.language, &format!("languages[{i}].language"))?;
        }
        for (i, interest) in self.interests.iter().enumerate() {
            require(&interest.name, &format!("interests[{i}].name"))?;
        }
        Ok(())
    }

    fn all_ids(&self) -> Vec<UnitId> {
        let mut ids = Vec::new();
        ids.extend(self.basics.summary.as_ref().map(|s| s.id));
        for work in &self.work {
            ids.push(work.id);
            ids.extend(work.highlights.iter().map(|b| b.id));
        }
        ids.extend(self.education.iter().map(|e| e.id));
        ids.extend(self.skills.iter().map(|e| e.id));
        for project in &self.projects {
            ids.push(project.id);
            ids.extend(project.highlights.iter().map(|b| b.id));
        }
        ids.extend(self.certificates.iter().map(|e| e.id));
        ids.extend(self.awards.iter().map(|e| e.id));
        ids.extend(self.languages.iter().map(|e| e.id));
        ids.extend(self.interests.iter().map(|e| e.id));
        ids
    }
}

/// Appends `new` keywords not already present (case-insensitive), keeping order.
fn merge_keywords(existing: &mut Vec<String>, new: Vec<String>) {
    for keyword in new {
        let keyword = keyword.trim().to_string();
        if !keyword.is_empty() && !existing.iter().any(|k| k.eq_ignore_ascii_case(&keyword)) {
            existing.push(keyword);
        }
    }
}

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or "present" for open-ended ranges.
fn check_date(value: Option<&str>, field: &str) -> Result<(), AppError> {
    match value {
        None => Ok(()),
        Some(v) if v.eq_ignore_ascii_case("present") => Ok(()),
        Some(v) if DATE_RE.is_match(v.trim()) => Ok(()),
        Some(v) => Err(AppError::Validation(format!(
            "{field} '{v}' is not an ISO date (YYYY, YYYY-MM or YYYY-MM-DD)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ResumeDocument, UnitId, UnitId) {
        let mut doc = ResumeDocument::new("Ada Lovelace");
        let work = doc.add_work("Acme", "Backend Engineer");
        let b1 = doc.add_work_highlight(work, "Worked on backend systems").unwrap();
        let b2 = doc.add_work_highlight(work, "Reduced p99 latency by 40%").unwrap();
        (doc, b1, b2)
    }

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let (doc, b1, b2) = sample();
        assert!(b2 > b1);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_removed_ids_are_never_reused() {
        let (mut doc, b1, _) = sample();
        doc.remove(b1).unwrap();
        let work_id = doc.work[0].id;
        let b3 = doc.add_work_highlight(work_id, "Shipped a new API").unwrap();
        assert_ne!(b3, b1);
        assert!(b3.0 > b1.0);
    }

    #[test]
    fn test_replace_unit_text_touches_only_target() {
        let (mut doc, b1, b2) = sample();
        let summary = doc.set_summary("Backend engineer");
        doc.replace_unit_text(b1, "Architected distributed systems")
            .unwrap();
        assert_eq!(doc.unit(b1).unwrap().text, "Architected distributed systems");
        assert_eq!(doc.unit(b2).unwrap().text, "Reduced p99 latency by 40%");
        assert_eq!(doc.unit(summary).unwrap().text, "Backend engineer");
    }

    #[test]
    fn test_replace_unknown_unit_is_not_found() {
        let (mut doc, _, _) = sample();
        let err = doc.replace_unit_text(UnitId(999), "x").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_set_summary_keeps_identifier() {
        let mut doc = ResumeDocument::new("Ada");
        let first = doc.set_summary("One");
        let second = doc.set_summary("Two");
        assert_eq!(first, second);
        assert_eq!(doc.basics.summary.as_ref().unwrap().text, "Two");
    }

    #[test]
    fn test_content_units_in_document_order() {
        let (mut doc, b1, b2) = sample();
        let summary = doc.set_summary("Engineer");
        let project = doc.add_project("Cache");
        let p1 = doc.add_project_highlight(project, "Built an LRU cache").unwrap();
        let ids: Vec<_> = doc.content_units().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![summary, b1, b2, p1]);
        assert_eq!(doc.unit(b1).unwrap().context, "Backend Engineer at Acme");
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let (mut doc, b1, _) = sample();
        doc.work[0].highlights[1].id = b1;
        assert!(matches!(doc.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_unallocated_ids() {
        let (mut doc, _, _) = sample();
        doc.next_id = 2;
        assert!(matches!(doc.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_blank_highlight() {
        let (mut doc, _, _) = sample();
        doc.work[0].highlights[0].text = "   ".to_string();
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("work[0].highlights[0]"));
    }

    #[test]
    fn test_validate_rejects_bad_dates() {
        let (mut doc, _, _) = sample();
        doc.work[0].start_date = Some("March 2020".to_string());
        assert!(doc.validate().is_err());
        doc.work[0].start_date = Some("2020-03".to_string());
        doc.work[0].end_date = Some("Present".to_string());
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_full_text_includes_skills_and_highlights() {
        let (mut doc, _, _) = sample();
        doc.add_skill("Infrastructure", vec!["Kubernetes".to_string()]);
        let text = doc.full_text();
        assert!(text.contains("Kubernetes"));
        assert!(text.contains("Worked on backend systems"));
    }

    #[test]
    fn test_merge_skill_dedupes_case_insensitively() {
        let mut doc = ResumeDocument::new("Ada");
        let first = doc.merge_skill("Languages", vec!["Rust".into(), "Go".into()], None);
        let second = doc.merge_skill(
            "languages",
            vec!["rust".into(), "Python".into()],
            Some("Expert".into()),
        );
        assert_eq!(first, second);
        assert_eq!(doc.skills.len(), 1);
        assert_eq!(doc.skills[0].keywords, vec!["Rust", "Go", "Python"]);
        assert_eq!(doc.skills[0].level.as_deref(), Some("Expert"));
    }

    #[test]
    fn test_merge_interest_and_remove() {
        let mut doc = ResumeDocument::new("Ada");
        let id = doc.merge_interest("Chess", vec!["Openings".into()]);
        doc.merge_interest("chess", vec!["Endgames".into(), "openings".into()]);
        assert_eq!(doc.interests[0].keywords, vec!["Openings", "Endgames"]);
        assert!(doc.validate().is_ok());
        doc.remove(id).unwrap();
        assert!(doc.interests.is_empty());
        assert!(matches!(doc.remove(id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_set_work_highlights_retires_old_ids() {
        let (mut doc, b1, b2) = sample();
        let work = doc.work[0].id;
        let ids = doc
            .set_work_highlights(work, vec!["Led a team of four".into()])
            .unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids[0] > b2);
        assert!(doc.unit(b1).is_none());
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_set_target_drops_blank_values() {
        let mut doc = ResumeDocument::new("Ada");
        doc.set_target(Some("fintech".into()), vec![" SRE ".into(), "".into()]);
        assert_eq!(doc.meta.industry.as_deref(), Some("fintech"));
        assert_eq!(doc.meta.target_roles, vec!["SRE"]);
        doc.set_target(Some("  ".into()), vec![]);
        assert_eq!(doc.meta.industry, None);
    }
}
