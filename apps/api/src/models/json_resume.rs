//! Standard JSON Resume (https://jsonresume.org/schema) interchange.
//!
//! Import assigns fresh identifiers to every entry and content unit.
//! Export strips identifiers and internal metadata.

use serde::{Deserialize, Serialize};

use crate::models::resume::{
    AwardEntry, Basics, Bullet, CertificateEntry, EducationEntry, InterestEntry, LanguageEntry,
    Location, Profile, ProjectEntry, ResumeDocument, SkillEntry, WorkEntry,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLocation {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonProfile {
    pub network: String,
    pub username: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonBasics {
    pub name: String,
    pub label: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub location: Option<JsonLocation>,
    #[serde(default)]
    pub profiles: Vec<JsonProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonWork {
    pub name: String,
    pub position: String,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEducation {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSkill {
    pub name: String,
    pub level: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonProject {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCertificate {
    pub name: String,
    pub date: Option<String>,
    pub issuer: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonAward {
    pub title: String,
    pub date: Option<String>,
    pub awarder: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLanguage {
    pub language: String,
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonInterest {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A résumé in the public JSON Resume shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonResume {
    pub basics: JsonBasics,
    #[serde(default)]
    pub work: Vec<JsonWork>,
    #[serde(default)]
    pub education: Vec<JsonEducation>,
    #[serde(default)]
    pub skills: Vec<JsonSkill>,
    #[serde(default)]
    pub projects: Vec<JsonProject>,
    #[serde(default)]
    pub certificates: Vec<JsonCertificate>,
    #[serde(default)]
    pub awards: Vec<JsonAward>,
    #[serde(default)]
    pub languages: Vec<JsonLanguage>,
    #[serde(default)]
    pub interests: Vec<JsonInterest>,
}

impl ResumeDocument {
    /// Builds a document from standard JSON Resume data, assigning identifiers
    /// in document order.
    pub fn from_json_resume(resume: JsonResume) -> Self {
        let mut doc = ResumeDocument::new(resume.basics.name.clone());
        let basics = resume.basics;
        let summary = basics
            .summary
            .filter(|s| !s.trim().is_empty())
            .map(|text| Bullet {
                id: doc.allocate_id(),
                text,
            });
        doc.basics = Basics {
            name: basics.name,
            label: basics.label,
            email: basics.email,
            phone: basics.phone,
            url: basics.url,
            summary,
            location: basics.location.map(|l| Location {
                address: l.address,
                postal_code: l.postal_code,
                city: l.city,
                country_code: l.country_code,
                region: l.region,
            }),
            profiles: basics
                .profiles
                .into_iter()
                .map(|p| Profile {
                    network: p.network,
                    username: p.username,
                    url: p.url,
                })
                .collect(),
        };

        for w in resume.work {
            let id = doc.allocate_id();
            let highlights = w
                .highlights
                .into_iter()
                .map(|text| Bullet {
                    id: doc.allocate_id(),
                    text,
                })
                .collect();
            doc.work.push(WorkEntry {
                id,
                name: w.name,
                position: w.position,
                url: w.url,
                start_date: w.start_date,
                end_date: w.end_date,
                summary: w.summary,
                highlights,
            });
        }
        for e in resume.education {
            let id = doc.allocate_id();
            doc.education.push(EducationEntry {
                id,
                institution: e.institution,
                url: e.url,
                area: e.area,
                study_type: e.study_type,
                start_date: e.start_date,
                end_date: e.end_date,
                score: e.score,
                courses: e.courses,
            });
        }
        for s in resume.skills {
            let id = doc.allocate_id();
            doc.skills.push(SkillEntry {
                id,
                name: s.name,
                level: s.level,
                keywords: s.keywords,
            });
        }
        for p in resume.projects {
            let id = doc.allocate_id();
            let highlights = p
                .highlights
                .into_iter()
                .map(|text| Bullet {
                    id: doc.allocate_id(),
                    text,
                })
                .collect();
            doc.projects.push(ProjectEntry {
                id,
                name: p.name,
                description: p.description,
                highlights,
                keywords: p.keywords,
                start_date: p.start_date,
                end_date: p.end_date,
                url: p.url,
                roles: p.roles,
            });
        }
        for c in resume.certificates {
            let id = doc.allocate_id();
            doc.certificates.push(CertificateEntry {
                id,
                name: c.name,
                date: c.date,
                issuer: c.issuer,
                url: c.url,
            });
        }
        for a in resume.awards {
            let id = doc.allocate_id();
            doc.awards.push(AwardEntry {
                id,
                title: a.title,
                date: a.date,
                awarder: a.awarder,
                summary: a.summary,
            });
        }
        for l in resume.languages {
            let id = doc.allocate_id();
            doc.languages.push(LanguageEntry {
                id,
                language: l.language,
                fluency: l.fluency,
            });
        }
        for i in resume.interests {
            let id = doc.allocate_id();
            doc.interests.push(InterestEntry {
                id,
                name: i.name,
                keywords: i.keywords,
            });
        }
        doc
    }

    /// Exports as standard JSON Resume (no identifiers, no internal metadata).
    pub fn to_json_resume(&self) -> JsonResume {
        let b = &self.basics;
        JsonResume {
            basics: JsonBasics {
                name: b.name.clone(),
                label: b.label.clone(),
                email: b.email.clone(),
                phone: b.phone.clone(),
                url: b.url.clone(),
                summary: b.summary.as_ref().map(|s| s.text.clone()),
                location: b.location.as_ref().map(|l| JsonLocation {
                    address: l.address.clone(),
                    postal_code: l.postal_code.clone(),
                    city: l.city.clone(),
                    country_code: l.country_code.clone(),
                    region: l.region.clone(),
                }),
                profiles: b
                    .profiles
                    .iter()
                    .map(|p| JsonProfile {
                        network: p.network.clone(),
                        username: p.username.clone(),
                        url: p.url.clone(),
                    })
                    .collect(),
            },
            work: self
                .work
                .iter()
                .map(|w| JsonWork {
                    name: w.name.clone(),
                    position: w.position.clone(),
                    url: w.url.clone(),
                    start_date: w.start_date.clone(),
                    end_date: w.end_date.clone(),
                    summary: w.summary.clone(),
                    highlights: w.highlights.iter().map(|h| h.text.clone()).collect(),
                })
                .collect(),
            education: self
                .education
                .iter()
                .map(|e| JsonEducation {
                    institution: e.institution.clone(),
                    url: e.url.clone(),
                    area: e.area.clone(),
                    study_type: e.study_type.clone(),
                    start_date: e.start_date.clone(),
                    end_date: e.end_date.clone(),
                    score: e.score.clone(),
                    courses: e.courses.clone(),
                })
                .collect(),
            skills: self
                .skills
                .iter()
                .map(|s| JsonSkill {
                    name: s.name.clone(),
                    level: s.level.clone(),
                    keywords: s.keywords.clone(),
                })
                .collect(),
            projects: self
                .projects
                .iter()
                .map(|p| JsonProject {
                    name: p.name.clone(),
                    description: p.description.clone(),
                    highlights: p.highlights.iter().map(|h| h.text.clone()).collect(),
                    keywords: p.keywords.clone(),
                    start_date: p.start_date.clone(),
                    end_date: p.end_date.clone(),
                    url: p.url.clone(),
                    roles: p.roles.clone(),
                })
                .collect(),
            certificates: self
                .certificates
                .iter()
                .map(|c| JsonCertificate {
                    name: c.name.clone(),
                    date: c.date.clone(),
                    issuer: c.issuer.clone(),
                    url: c.url.clone(),
                })
                .collect(),
            awards: self
                .awards
                .iter()
                .map(|a| JsonAward {
                    title: a.title.clone(),
                    date: a.date.clone(),
                    awarder: a.awarder.clone(),
                    summary: a.summary.clone(),
                })
                .collect(),
            languages: self
                .languages
                .iter()
                .map(|l| JsonLanguage {
                    language: l.language.clone(),
                    fluency: l.fluency.clone(),
                })
                .collect(),
            interests: self
                .interests
                .iter()
                .map(|i| JsonInterest {
                    name: i.name.clone(),
                    keywords: i.keywords.clone(),
                })
                .collect(),
        }
    }
}
