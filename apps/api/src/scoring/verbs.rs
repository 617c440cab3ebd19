//! Action-verb strength of a bullet's opening words.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbStrength {
    Strong,
    Moderate,
    Weak,
    /// The bullet does not open with a verb at all.
    Missing,
}

impl VerbStrength {
    /// Sub-score contribution in `[0, 100]`.
    pub fn score(self) -> f64 {
        match self {
            VerbStrength::Strong => 100.0,
            VerbStrength::Moderate => 60.0,
            VerbStrength::Missing => 35.0,
            VerbStrength::Weak => 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbAssessment {
    /// The opening word or phrase that decided the strength, lower-cased.
    pub opening: Option<String>,
    pub strength: VerbStrength,
}

const STRONG_VERBS: &[&str] = &[
    "accelerated", "achieved", "analyzed", "architected", "automated", "built", "co-developed",
    "coordinated", "created", "cut", "delivered", "deployed", "designed", "developed", "drove",
    "enabled", "engineered", "established", "evaluated", "facilitated", "founded", "generated",
    "grew", "implemented", "increased", "investigated", "launched", "led", "mentored",
    "migrated", "modernized", "negotiated", "optimized", "orchestrated", "owned", "pioneered",
    "prototyped", "proposed", "published", "redesigned", "reduced", "refactored", "resolved",
    "saved", "scaled", "secured", "shipped", "spearheaded", "standardized", "streamlined",
];

const MODERATE_VERBS: &[&str] = &[
    "collaborated", "contributed", "enhanced", "handled", "improved", "maintained", "made",
    "managed", "used", "utilized", "wrote",
];

/// Weak openings, longest first so "was responsible for" wins over "responsible for".
pub const WEAK_OPENINGS: &[&str] = &[
    "was responsible for",
    "was involved in",
    "duties included",
    "participated in",
    "responsible for",
    "assisted with",
    "assisted in",
    "helped with",
    "involved in",
    "in charge of",
    "worked with",
    "tasked with",
    "helped to",
    "worked on",
    "supported",
    "assisted",
    "helped",
];

/// Classifies the opening of a bullet.
pub fn assess_opening(text: &str) -> VerbAssessment {
    let lower = text.trim().to_lowercase();

    if let Some(weak) = WEAK_OPENINGS.iter().find(|w| starts_with_phrase(&lower, w)) {
        return VerbAssessment {
            opening: Some(weak.to_string()),
            strength: VerbStrength::Weak,
        };
    }

    let first = lower
        .split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-'))
        .unwrap_or_default();
    if first.is_empty() {
        return VerbAssessment {
            opening: None,
            strength: VerbStrength::Missing,
        };
    }

    let strength = if STRONG_VERBS.contains(&first) {
        VerbStrength::Strong
    } else if MODERATE_VERBS.contains(&first) || looks_past_tense(first) {
        VerbStrength::Moderate
    } else {
        VerbStrength::Missing
    };
    VerbAssessment {
        opening: Some(first.to_string()),
        strength,
    }
}

/// Returns the remainder of `text` after a weak opening phrase, if it has one.
pub fn strip_weak_opening(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    let lower = trimmed.to_lowercase();
    WEAK_OPENINGS
        .iter()
        .find(|w| starts_with_phrase(&lower, w))
        .and_then(|w| trimmed.get(w.len()..))
        .map(str::trim_start)
}

fn starts_with_phrase(lower: &str, phrase: &str) -> bool {
    lower.starts_with(phrase)
        && !lower[phrase.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric())
}

fn looks_past_tense(word: &str) -> bool {
    word.len() > 4 && word.ends_with("ed") && word.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_opening() {
        let a = assess_opening("Architected distributed systems on Kubernetes");
        assert_eq!(a.strength, VerbStrength::Strong);
        assert_eq!(a.opening.as_deref(), Some("architected"));
    }

    #[test]
    fn test_weak_opening_matches_longest_phrase() {
        let a = assess_opening("Was responsible for the billing service");
        assert_eq!(a.strength, VerbStrength::Weak);
        assert_eq!(a.opening.as_deref(), Some("was responsible for"));
        assert_eq!(assess_opening("Worked on backend systems").strength, VerbStrength::Weak);
    }

    #[test]
    fn test_unknown_past_tense_is_moderate() {
        assert_eq!(assess_opening("Rewrote the scheduler").strength, VerbStrength::Missing);
        assert_eq!(assess_opening("Containerized the scheduler").strength, VerbStrength::Moderate);
    }

    #[test]
    fn test_noun_opening_is_missing_verb() {
        assert_eq!(assess_opening("Backend systems work").strength, VerbStrength::Missing);
        assert_eq!(assess_opening("   ").strength, VerbStrength::Missing);
    }

    #[test]
    fn test_strip_weak_opening() {
        assert_eq!(strip_weak_opening("Worked on backend systems"), Some("backend systems"));
        assert_eq!(strip_weak_opening("Helped the team ship"), Some("the team ship"));
        assert_eq!(strip_weak_opening("Helpful tooling"), None);
        assert_eq!(strip_weak_opening("Built a cache"), None);
    }

    #[test]
    fn test_strength_ordering_of_scores() {
        assert!(VerbStrength::Strong.score() > VerbStrength::Moderate.score());
        assert!(VerbStrength::Moderate.score() > VerbStrength::Missing.score());
        assert!(VerbStrength::Missing.score() > VerbStrength::Weak.score());
    }
}
