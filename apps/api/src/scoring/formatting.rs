//! Length and style checks that ATS parsers and recruiters both penalize.

use crate::models::resume::{ResumeDocument, UnitId};

pub const MIN_BULLET_WORDS: usize = 6;
pub const MAX_BULLET_WORDS: usize = 30;
const MIN_DOCUMENT_WORDS: usize = 150;
const MAX_DOCUMENT_WORDS: usize = 1000;

const FIRST_PERSON: &[&str] = &["i", "me", "my", "mine", "we", "our"];

#[derive(Debug, Clone)]
pub struct FormattingReport {
    /// `[0, 1]`
    pub score: f64,
    pub issues: Vec<(UnitId, String)>,
    pub recommendations: Vec<String>,
}

/// Style problems with a single bullet, empty when it reads cleanly.
pub fn bullet_issues(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut issues = Vec::new();
    if words.len() < MIN_BULLET_WORDS {
        issues.push(format!("too short ({} words)", words.len()));
    } else if words.len() > MAX_BULLET_WORDS {
        issues.push(format!("too long ({} words)", words.len()));
    }
    let pronoun = words.iter().find(|w| {
        let bare = w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
        FIRST_PERSON.contains(&bare.as_str())
    });
    if let Some(p) = pronoun {
        issues.push(format!("first-person pronoun '{p}'"));
    }
    issues
}

/// Bullet score blends 70% clean-bullet share with 30% overall length fit.
pub fn assess(doc: &ResumeDocument) -> FormattingReport {
    let mut issues = Vec::new();
    let mut total = 0usize;
    let mut clean = 0usize;
    for bullet in doc.bullets() {
        total += 1;
        let found = bullet_issues(&bullet.text);
        if found.is_empty() {
            clean += 1;
        }
        issues.extend(found.into_iter().map(|issue| (bullet.id, issue)));
    }

    let mut recommendations = Vec::new();
    let clean_ratio = if total == 0 {
        recommendations.push("Describe each role with bullet-point highlights".to_string());
        0.0
    } else {
        clean as f64 / total as f64
    };
    if total > clean {
        recommendations.push(format!(
            "Keep bullets between {MIN_BULLET_WORDS} and {MAX_BULLET_WORDS} words and drop first-person pronouns"
        ));
    }

    let words = doc.full_text().split_whitespace().count();
    let length_fit = if (MIN_DOCUMENT_WORDS..=MAX_DOCUMENT_WORDS).contains(&words) {
        1.0
    } else if words < MIN_DOCUMENT_WORDS {
        recommendations.push(format!("Résumé is thin ({words} words); add more detail"));
        words as f64 / MIN_DOCUMENT_WORDS as f64
    } else {
        recommendations.push(format!("Résumé is long ({words} words); tighten it"));
        0.5
    };

    FormattingReport {
        score: (0.7 * clean_ratio + 0.3 * length_fit).clamp(0.0, 1.0),
        issues,
        recommendations,
    }
}
