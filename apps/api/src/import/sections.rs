//! Best-effort structure recovery from plain résumé text.
//!
//! Line based: headers switch the current section, bullet markers make
//! highlights, other lines open or describe entries. Nothing here promises
//! accuracy; the caller reviews the imported document.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::resume::{Profile, ResumeDocument, UnitId};

const MAX_NAME_CHARS: usize = 50;
const MAX_FLAT_SKILLS: usize = 30;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid phone regex")
});

static LINKEDIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)linkedin\.com/in/[\w-]+").expect("valid linkedin regex"));

static GITHUB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)github\.com/[\w-]+").expect("valid github regex"));

static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)((?:[a-z]{3,9}\.?\s+)?\d{4})\s*(?:-|–|—|to)\s*((?:[a-z]{3,9}\.?\s+)?\d{4}|present|current|now)",
    )
    .expect("valid date range regex")
});

static DEGREE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(bachelor|master|ph\.?d|associate|b\.?s\b|m\.?s\b|b\.?a\b|m\.?b\.?a|b\.?sc|m\.?sc)")
        .expect("valid degree regex")
});

const BULLET_MARKERS: &[char] = &['•', '▪', '●', '◦', '‣', '-', '*', '–'];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

fn section_for(line: &str) -> Option<Section> {
    let key = line
        .trim()
        .trim_end_matches(':')
        .to_lowercase();
    let section = match key.as_str() {
        "summary" | "profile" | "professional summary" | "about" | "about me" | "objective" => {
            Section::Summary
        }
        "experience" | "work experience" | "professional experience" | "employment"
        | "employment history" | "work history" => Section::Experience,
        "education" | "academic background" => Section::Education,
        "skills" | "technical skills" | "core competencies" | "technologies" => Section::Skills,
        "projects" | "personal projects" | "selected projects" => Section::Projects,
        "certifications" | "certificates" | "licenses & certifications" => Section::Certifications,
        _ => return None,
    };
    Some(section)
}

fn bullet_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let first = trimmed.chars().next()?;
    if !BULLET_MARKERS.contains(&first) {
        return None;
    }
    let rest = trimmed[first.len_utf8()..].trim();
    (!rest.is_empty()).then_some(rest)
}

/// "Jan 2020" → "2020-01", "2020" → "2020", "Present" → `None`.
fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_end_matches('.');
    let lower = raw.to_lowercase();
    if matches!(lower.as_str(), "present" | "current" | "now") {
        return None;
    }
    let mut parts = lower.split_whitespace();
    let (month, year) = match (parts.next(), parts.next()) {
        (Some(m), Some(y)) => (Some(m), y),
        (Some(y), None) => (None, y),
        _ => return None,
    };
    let month = month.and_then(|m| {
        let m = m.trim_end_matches('.');
        [
            "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
        ]
        .iter()
        .position(|prefix| m.starts_with(prefix))
        .map(|i| i + 1)
    });
    match month {
        Some(m) => Some(format!("{year}-{m:02}")),
        None => Some(year.to_string()),
    }
}

/// Splits a trailing or embedded date range off a line.
fn take_date_range(line: &str) -> (String, Option<(Option<String>, Option<String>)>) {
    match DATE_RANGE_RE.captures(line) {
        Some(caps) => {
            let start = normalize_date(&caps[1]);
            let end = normalize_date(&caps[2]);
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let mut rest = String::new();
            rest.push_str(&line[..whole.start]);
            rest.push_str(&line[whole.end..]);
            let rest = rest
                .trim()
                .trim_matches(|c: char| c == '|' || c == ',' || c == '(' || c == ')')
                .trim()
                .to_string();
            (rest, Some((start, end)))
        }
        None => (line.trim().to_string(), None),
    }
}

/// What the importer recovered plus what it had to guess.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedResume {
    pub document: ResumeDocument,
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct PendingWork {
    lines: Vec<String>,
    dates: Option<(Option<String>, Option<String>)>,
    highlights: Vec<String>,
}

impl PendingWork {
    fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.highlights.is_empty()
    }
}

struct Builder {
    doc: ResumeDocument,
    warnings: Vec<String>,
    summary: Vec<String>,
    work: PendingWork,
    project: Option<UnitId>,
    education: Option<UnitId>,
    flat_skills: Vec<String>,
}

impl Builder {
    fn flush_work(&mut self) {
        let pending = std::mem::take(&mut self.work);
        if pending.is_empty() {
            return;
        }
        let mut lines = pending.lines.into_iter();
        let company = lines.next().unwrap_or_default();
        let position = lines.next().unwrap_or_default();
        let (company, position) = match (company.is_empty(), position.is_empty()) {
            (false, false) => (company, position),
            (false, true) => {
                self.warnings
                    .push(format!("No position found for work entry '{company}'"));
                (company, "Unknown Position".to_string())
            }
            _ => {
                self.warnings
                    .push("Highlights found before any company line".to_string());
                ("Unknown Company".to_string(), "Unknown Position".to_string())
            }
        };
        let id = self.doc.add_work(company, position);
        if let Some(entry) = self.doc.work.last_mut() {
            if let Some((start, end)) = pending.dates {
                entry.start_date = start;
                entry.end_date = end;
            }
            let extra: Vec<String> = lines.collect();
            if !extra.is_empty() {
                entry.summary = Some(extra.join(" "));
            }
        }
        for text in pending.highlights {
            // The entry was just added; the id is valid.
            let _ = self.doc.add_work_highlight(id, text);
        }
    }

    fn experience_line(&mut self, line: &str) {
        if let Some(text) = bullet_text(line) {
            self.work.highlights.push(text.to_string());
            return;
        }
        if !self.work.highlights.is_empty() {
            self.flush_work();
        }
        let (rest, dates) = take_date_range(line);
        if dates.is_some() {
            self.work.dates = dates;
        }
        if !rest.is_empty() {
            self.work.lines.push(rest);
        }
    }

    fn project_line(&mut self, line: &str) {
        match (bullet_text(line), self.project) {
            (Some(text), Some(id)) => {
                let _ = self.doc.add_project_highlight(id, text);
            }
            (Some(text), None) => {
                let id = self.doc.add_project("Untitled Project");
                self.warnings
                    .push("Project highlights found before any project name".to_string());
                let _ = self.doc.add_project_highlight(id, text);
                self.project = Some(id);
            }
            (None, _) => {
                let (name, dates) = take_date_range(line);
                if let Some((title, description)) = name.split_once(':') {
                    self.project = Some(self.doc.add_project(title.trim()));
                    if let Some(p) = self.doc.projects.last_mut() {
                        p.description = Some(description.trim().to_string());
                    }
                } else if !name.is_empty() {
                    self.project = Some(self.doc.add_project(name.as_str()));
                }
                if let (Some((start, end)), Some(p)) = (dates, self.doc.projects.last_mut()) {
                    p.start_date = start;
                    p.end_date = end;
                }
            }
        }
    }

    fn education_line(&mut self, line: &str) {
        let (text, dates) = take_date_range(bullet_text(line).unwrap_or(line));
        let starts_entry = self.education.is_none() || DEGREE_RE.is_match(&text) && {
            // A degree line right after an institution describes that institution.
            self.doc
                .education
                .last()
                .is_some_and(|e| e.study_type.is_some())
        };
        if starts_entry && !text.is_empty() {
            self.education = Some(self.doc.add_education(text.clone()));
        } else if let Some(entry) = self.doc.education.last_mut() {
            if DEGREE_RE.is_match(&text) && entry.study_type.is_none() {
                entry.study_type = Some(text.clone());
            } else if entry.area.is_none() && !text.is_empty() {
                entry.area = Some(text.clone());
            }
        }
        if let (Some((start, end)), Some(entry)) = (dates, self.doc.education.last_mut()) {
            entry.start_date = start;
            entry.end_date = end;
        }
        if let Some(entry) = self.doc.education.last_mut() {
            if entry.study_type.is_none() && DEGREE_RE.is_match(&entry.institution) {
                entry.study_type = Some(entry.institution.clone());
            }
        }
    }

    fn skills_line(&mut self, line: &str) {
        let line = bullet_text(line).unwrap_or(line);
        if let Some((category, list)) = line.split_once(':') {
            let keywords = split_list(list);
            if !category.trim().is_empty() && !keywords.is_empty() {
                self.doc.add_skill(category.trim(), keywords);
                return;
            }
        }
        self.flat_skills.extend(split_list(line));
    }

    fn certification_line(&mut self, line: &str) {
        let line = bullet_text(line).unwrap_or(line);
        let (name, issuer) = match line.split_once(" - ").or_else(|| line.split_once(',')) {
            Some((name, issuer)) => (name.trim(), Some(issuer.trim().to_string())),
            None => (line.trim(), None),
        };
        if !name.is_empty() {
            self.doc.add_certificate(name, issuer.filter(|i| !i.is_empty()));
        }
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split([',', ';', '|', '•', '·'])
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.chars().count() < MAX_NAME_CHARS)
        .map(str::to_string)
        .collect()
}

/// Turns extracted résumé text into a document with fresh identifiers.
pub fn parse_resume_text(text: &str) -> ImportedResume {
    let mut builder = Builder {
        doc: ResumeDocument::new("Imported Résumé"),
        warnings: vec![],
        summary: vec![],
        work: PendingWork::default(),
        project: None,
        education: None,
        flat_skills: vec![],
    };

    extract_contact(&mut builder, text);

    let mut section = Section::Header;
    let mut name: Option<String> = None;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(next) = section_for(line) {
            if section == Section::Experience {
                builder.flush_work();
            }
            section = next;
            continue;
        }
        match section {
            Section::Header => {
                let is_contact = EMAIL_RE.is_match(line)
                    || PHONE_RE.is_match(line)
                    || LINKEDIN_RE.is_match(line)
                    || GITHUB_RE.is_match(line);
                if name.is_none() && !is_contact && line.chars().count() < MAX_NAME_CHARS {
                    name = Some(line.to_string());
                } else if name.is_some() && !is_contact && builder.doc.basics.label.is_none() {
                    builder.doc.basics.label = Some(line.to_string());
                }
            }
            Section::Summary => builder.summary.push(line.to_string()),
            Section::Experience => builder.experience_line(line),
            Section::Education => builder.education_line(line),
            Section::Skills => builder.skills_line(line),
            Section::Projects => builder.project_line(line),
            Section::Certifications => builder.certification_line(line),
        }
    }
    builder.flush_work();

    match name {
        Some(name) => builder.doc.basics.name = name,
        None => builder
            .warnings
            .push("No name line found; using a placeholder".to_string()),
    }
    if !builder.summary.is_empty() {
        let summary = builder.summary.join(" ");
        builder.doc.set_summary(summary);
    }
    if !builder.flat_skills.is_empty() {
        let mut skills = std::mem::take(&mut builder.flat_skills);
        skills.truncate(MAX_FLAT_SKILLS);
        builder.doc.add_skill("Skills", skills);
    }
    if builder.doc.work.is_empty() {
        builder
            .warnings
            .push("No experience section recognised".to_string());
    }

    ImportedResume {
        document: builder.doc,
        warnings: builder.warnings,
    }
}

fn extract_contact(builder: &mut Builder, text: &str) {
    let basics = &mut builder.doc.basics;
    basics.email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    basics.phone = PHONE_RE.find(text).map(|m| m.as_str().trim().to_string());
    for (re, network) in [(&*LINKEDIN_RE, "LinkedIn"), (&*GITHUB_RE, "GitHub")] {
        if let Some(m) = re.find(text) {
            basics.profiles.push(Profile {
                network: network.to_string(),
                username: m.as_str().rsplit('/').next().map(str::to_string),
                url: Some(format!("https://www.{}", m.as_str().to_lowercase())),
            });
        }
    }
}
