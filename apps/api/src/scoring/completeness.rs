use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeDocument;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub score: f64,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Weighted section score in `[0, 1]`.
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<String>,
}

const SECTION_WEIGHTS: &[(&str, f64)] = &[
    ("work", 0.35),
    ("skills", 0.20),
    ("summary", 0.15),
    ("education", 0.15),
    ("contact", 0.10),
    ("projects", 0.05),
];

/// Highlights per work entry that count as a fully described role.
const TARGET_HIGHLIGHTS: usize = 3;
/// Skill keywords that count as a fully populated skills section.
const TARGET_SKILL_KEYWORDS: usize = 8;
const MIN_SUMMARY_WORDS: usize = 15;

pub fn compute_completeness_report(doc: &ResumeDocument) -> CompletenessReport {
    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut weighted_score_sum = 0.0;

    for (section, weight) in SECTION_WEIGHTS {
        let (score, mut recommendations) = section_score(doc, section);
        let status = match score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            s if s > 0.0 => SectionStatus::Weak,
            _ => SectionStatus::Missing,
        };
        if status == SectionStatus::Missing {
            missing_sections.push(section.to_string());
            if recommendations.is_empty() {
                recommendations.push(format!("Add a {section} section"));
            }
        }
        weighted_score_sum += score * weight;
        sections.push(SectionHealth {
            section: section.to_string(),
            score,
            status,
            recommendations,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    CompletenessReport {
        overall_score: (weighted_score_sum / total_weight).clamp(0.0, 1.0),
        sections,
        missing_sections,
    }
}

fn section_score(doc: &ResumeDocument, section: &str) -> (f64, Vec<String>) {
    match section {
        "work" => {
            if doc.work.is_empty() {
                return (0.0, vec!["Add work experience entries".to_string()]);
            }
            let sum: f64 = doc
                .work
                .iter()
                .map(|w| w.highlights.len().min(TARGET_HIGHLIGHTS) as f64 / TARGET_HIGHLIGHTS as f64)
                .sum();
            let thin: Vec<_> = doc
                .work
                .iter()
                .filter(|w| w.highlights.len() < TARGET_HIGHLIGHTS)
                .map(|w| w.name.as_str())
                .collect();
            let recommendations = if thin.is_empty() {
                vec![]
            } else {
                vec![format!(
                    "Give each role at least {TARGET_HIGHLIGHTS} highlights ({})",
                    thin.join(", ")
                )]
            };
            (sum / doc.work.len() as f64, recommendations)
        }
        "skills" => {
            let count: usize = doc.skills.iter().map(|s| s.keywords.len().max(1)).sum();
            if doc.skills.is_empty() {
                return (0.0, vec!["Add a skills section listing your tools and technologies".to_string()]);
            }
            let score = (count as f64 / TARGET_SKILL_KEYWORDS as f64).min(1.0);
            let recommendations = if count < TARGET_SKILL_KEYWORDS {
                vec![format!("List at least {TARGET_SKILL_KEYWORDS} skills")]
            } else {
                vec![]
            };
            (score, recommendations)
        }
        "summary" => match &doc.basics.summary {
            None => (0.0, vec!["Add a professional summary".to_string()]),
            Some(s) if s.text.split_whitespace().count() < MIN_SUMMARY_WORDS => (
                0.6,
                vec!["Expand the summary to two or three full sentences".to_string()],
            ),
            Some(_) => (1.0, vec![]),
        },
        "education" => {
            if doc.education.is_empty() {
                (0.0, vec!["Add an education entry".to_string()])
            } else {
                (1.0, vec![])
            }
        }
        "contact" => {
            let mut score = 0.0;
            let mut recommendations = Vec::new();
            if doc.basics.email.as_deref().is_some_and(|e| !e.trim().is_empty()) {
                score += 0.6;
            } else {
                recommendations.push("Add an email address".to_string());
            }
            if doc.basics.phone.as_deref().is_some_and(|p| !p.trim().is_empty()) {
                score += 0.4;
            } else {
                recommendations.push("Add a phone number".to_string());
            }
            (score, recommendations)
        }
        "projects" => {
            if doc.projects.is_empty() {
                (0.0, vec!["Consider adding projects that show relevant work".to_string()])
            } else {
                (1.0, vec![])
            }
        }
        _ => (0.0, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_doc() -> ResumeDocument {
        let mut doc = ResumeDocument::new("Ada Lovelace");
        doc.basics.email = Some("ada@example.com".to_string());
        doc.basics.phone = Some("+44 20 0000 0000".to_string());
        doc.set_summary(
            "Backend engineer with eight years building payment platforms, \
             distributed schedulers and developer tooling for fast-growing teams.",
        );
        let work = doc.add_work("Acme", "Backend Engineer");
        for text in ["Built the ledger", "Cut p99 by 40%", "Mentored 4 engineers"] {
            doc.add_work_highlight(work, text).unwrap();
        }
        doc.add_education("University of London");
        doc.add_skill(
            "Backend",
            ["rust", "go", "sql", "kafka", "redis", "docker", "kubernetes", "terraform"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let project = doc.add_project("Cache");
        doc.add_project_highlight(project, "Built an LRU cache").unwrap();
        doc
    }

    #[test]
    fn test_complete_document_scores_full() {
        let report = compute_completeness_report(&full_doc());
        assert!((report.overall_score - 1.0).abs() < 1e-9);
        assert!(report.missing_sections.is_empty());
    }

    #[test]
    fn test_empty_document_lists_missing_sections() {
        let report = compute_completeness_report(&ResumeDocument::new("Ada"));
        assert_eq!(report.overall_score, 0.0);
        assert!(report.missing_sections.contains(&"work".to_string()));
        assert!(report.missing_sections.contains(&"summary".to_string()));
    }

    #[test]
    fn test_thin_roles_reduce_work_score() {
        let mut doc = full_doc();
        let work = doc.work[0].id;
        let extra = doc.add_work("Globex", "Engineer");
        doc.add_work_highlight(extra, "Built things").unwrap();
        let report = compute_completeness_report(&doc);
        let work_health = report.sections.iter().find(|s| s.section == "work").unwrap();
        assert!(work_health.score < 1.0);
        assert!(work_health.recommendations[0].contains("Globex"));
        assert_ne!(work, extra);
    }
}
