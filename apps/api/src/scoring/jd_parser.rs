//! JD parser: extracts keywords, requirements, seniority and tone from a raw job description.
//!
//! Extraction is rule-based and deterministic: the same text always yields the
//! same `JobDescription`, keyword order included. The derived keyword set is
//! recomputed per scoring request and never stored on the résumé.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::AppError;

/// Detected tone of a job description. Drives verb selection in option generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JdTone {
    AggressiveStartup,
    #[default]
    CollaborativeEnterprise,
    ResearchOriented,
    ProductOriented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Technical,
    Domain,
    Certification,
    Soft,
}

/// A single keyword from the JD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Lower-cased canonical form.
    pub keyword: String,
    pub category: KeywordCategory,
    pub frequency: u32,
    pub required: bool,
    /// required = 2.0, preferred = 1.0
    pub weight: f64,
}

/// A parsed job description: the raw text plus everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub text: String,
    pub keywords: Vec<KeywordEntry>,
    pub experience_years: Option<u32>,
    pub seniority: Option<String>,
    pub detected_tone: JdTone,
}

const REQUIRED_WEIGHT: f64 = 2.0;
const PREFERRED_WEIGHT: f64 = 1.0;

const TECHNICAL_TERMS: &[&str] = &[
    "python", "javascript", "typescript", "java", "c++", "c#", "golang", "rust", "ruby", "php",
    "swift", "kotlin", "scala", "react", "angular", "vue", "node.js", "django", "flask", "spring",
    "rails", "aws", "azure", "gcp", "kubernetes", "docker", "terraform", "jenkins", "ci/cd",
    "sql", "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "kafka", "git", "github",
    "gitlab", "jira", "agile", "scrum", "machine learning", "data science", "nlp",
    "deep learning", "graphql", "grpc", "rest api", "restful", "linux", "microservices",
    "spark", "airflow", "pytorch", "tensorflow", "observability", "prometheus", "grafana",
];

const SOFT_TERMS: &[&str] = &[
    "leadership", "communication", "teamwork", "collaboration", "problem solving",
    "problem-solving", "analytical", "critical thinking", "attention to detail", "mentoring",
    "self-motivated", "proactive", "adaptable",
];

const CERTIFICATION_TERMS: &[&str] = &[
    "pmp", "aws certified", "azure certified", "gcp certified", "cpa", "cfa", "scrum master",
    "csm", "itil", "cissp", "comptia", "cka", "ckad",
];

/// First words that never start a domain noun phrase.
const DOMAIN_STOPWORDS: &[&str] = &[
    "the", "our", "your", "their", "its", "and", "or", "of", "with", "for", "in", "on", "to",
    "a", "an", "these", "those", "existing", "other", "new", "all", "build", "building",
    "design", "designing", "across", "complex", "internal", "critical", "maintain", "operate",
    "own", "scale", "that", "which", "modern",
];

const SENIORITY_TERMS: &[&str] = &[
    "principal", "staff", "director", "lead", "senior", "mid-level", "junior", "intern",
];

const TONE_CUES: &[(JdTone, &[&str])] = &[
    (
        JdTone::AggressiveStartup,
        &["move fast", "spearhead", "disrupt", "fast-paced", "startup", "end-to-end", "own "],
    ),
    (
        JdTone::CollaborativeEnterprise,
        &["partner", "collaborat", "contribute", "cross-functional", "support", "enterprise"],
    ),
    (
        JdTone::ResearchOriented,
        &["research", "investigate", "publish", "phd", "evaluate", "propose"],
    ),
    (
        JdTone::ProductOriented,
        &["ship", "launch", "deliver", "user experience", "customer", "product"],
    ),
];

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([a-z][a-z0-9-]+)\s+(systems|infrastructure|pipelines|platforms|architecture|applications|databases)\b",
    )
    .expect("valid domain regex")
});

static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\+?\s*(?:years?|yrs?)").expect("valid years regex"));

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n;]|\.\s").expect("valid segment regex"));

static REQUIRED_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"requir(ed|es|ing|ements?)|must[\s-]+have|qualifications")
        .expect("valid required-cue regex")
});

static PREFERRED_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"preferred|nice[\s-]+to[\s-]+have|bonus|desired|a plus")
        .expect("valid preferred-cue regex")
});

static NEUTRAL_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(about|responsibilities|what you('ll| will) do|you will|the role|benefits)")
        .expect("valid neutral-cue regex")
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum SegmentMode {
    Neutral,
    Required,
    Preferred,
}

impl JobDescription {
    /// Parses a raw job description. Fails with `InvalidInput` on blank text.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "job description cannot be empty".to_string(),
            ));
        }
        let lower = text.to_lowercase();

        let mut found: BTreeMap<String, KeywordCategory> = BTreeMap::new();
        for (terms, category) in [
            (TECHNICAL_TERMS, KeywordCategory::Technical),
            (CERTIFICATION_TERMS, KeywordCategory::Certification),
            (SOFT_TERMS, KeywordCategory::Soft),
        ] {
            for term in terms {
                if count_mentions(&lower, term) > 0 {
                    found.entry(term.to_string()).or_insert(category);
                }
            }
        }
        for caps in DOMAIN_RE.captures_iter(&lower) {
            if DOMAIN_STOPWORDS.contains(&&caps[1]) {
                continue;
            }
            found
                .entry(caps[0].split_whitespace().collect::<Vec<_>>().join(" "))
                .or_insert(KeywordCategory::Domain);
        }

        let segments = classify_segments(&lower);
        let mut keywords: Vec<KeywordEntry> = found
            .into_iter()
            .map(|(keyword, category)| {
                let mode = segments
                    .iter()
                    .find(|(segment, _)| count_mentions(segment, &keyword) > 0)
                    .map(|(_, mode)| *mode)
                    .unwrap_or(SegmentMode::Neutral);
                let required = match mode {
                    SegmentMode::Required => true,
                    SegmentMode::Preferred => false,
                    SegmentMode::Neutral => category != KeywordCategory::Soft,
                };
                KeywordEntry {
                    frequency: count_mentions(&lower, &keyword) as u32,
                    weight: if required {
                        REQUIRED_WEIGHT
                    } else {
                        PREFERRED_WEIGHT
                    },
                    keyword,
                    category,
                    required,
                }
            })
            .collect();

        keywords.sort_by(|a, b| {
            b.required
                .cmp(&a.required)
                .then(b.frequency.cmp(&a.frequency))
                .then(a.keyword.cmp(&b.keyword))
        });

        Ok(JobDescription {
            text: text.to_string(),
            keywords,
            experience_years: YEARS_RE
                .captures(&lower)
                .and_then(|c| c[1].parse::<u32>().ok()),
            seniority: SENIORITY_TERMS
                .iter()
                .find(|t| count_mentions(&lower, t) > 0)
                .map(|t| t.to_string()),
            detected_tone: detect_tone(&lower),
        })
    }

    /// Short stable digest of the raw text, recorded in score history.
    pub fn fingerprint(&self) -> String {
        let digest = format!("{:x}", Sha256::digest(self.text.trim().as_bytes()));
        digest[..16].to_string()
    }

    /// Keywords from `self` that `text` mentions.
    pub fn keywords_in<'a>(&'a self, text: &str) -> Vec<&'a KeywordEntry> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| count_mentions(&lower, &k.keyword) > 0)
            .collect()
    }
}

/// Counts whole-term occurrences of `term` in already lower-cased `haystack`.
/// A match must not be glued to a surrounding letter or digit, so "java"
/// does not match inside "javascript" while "c++" and "ci/cd" still match.
pub fn count_mentions(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    haystack
        .match_indices(term)
        .filter(|(start, _)| {
            let before = haystack[..*start].chars().next_back();
            let after = haystack[start + term.len()..].chars().next();
            !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
        })
        .count()
}

/// Splits the text into segments and tags each with the requirement mode in force.
/// Header-like cues switch the mode for the rest of the text until the next cue.
fn classify_segments(lower: &str) -> Vec<(String, SegmentMode)> {
    let mut mode = SegmentMode::Neutral;
    let mut segments = Vec::new();
    for segment in SEGMENT_RE.split(lower) {
        if segment.trim().is_empty() {
            continue;
        }
        if PREFERRED_CUE_RE.is_match(segment) {
            mode = SegmentMode::Preferred;
        } else if REQUIRED_CUE_RE.is_match(segment) {
            mode = SegmentMode::Required;
        } else if NEUTRAL_CUE_RE.is_match(segment) {
            mode = SegmentMode::Neutral;
        }
        segments.push((segment.to_string(), mode));
    }
    segments
}

/// Picks the tone with the most cue hits. Ties keep the earlier tone in
/// `TONE_CUES`; no hits at all falls back to the default.
fn detect_tone(lower: &str) -> JdTone {
    let mut best = (JdTone::default(), 0usize);
    for (tone, cues) in TONE_CUES {
        let hits: usize = cues.iter().map(|c| lower.matches(c).count()).sum();
        if hits > best.1 {
            best = (*tone, hits);
        }
    }
    best.0
}
