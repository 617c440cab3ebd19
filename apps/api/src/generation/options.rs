//! Option generation: pluggable rewrite strategies behind `OptionGenerator`,
//! plus the shared pipeline that filters, re-scores and ranks what they propose.
//!
//! `AppState` holds an `Arc<dyn OptionGenerator>`, chosen at startup via config.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::resume::{ContentUnit, ResumeDocument, UnitId};
use crate::scoring::engine::{score_unit, ScoringConfig};
use crate::scoring::jd_parser::JobDescription;

/// Strategy calls per request before settling for a partial result.
pub const MAX_ATTEMPTS: u32 = 3;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// One proposed rewrite of a content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    /// Composite unit score of this text minus the current text's.
    pub predicted_delta: f64,
    pub predicted_score: f64,
    pub round: u32,
    pub matched_keywords: Vec<String>,
}

/// Non-fatal: fewer candidates than requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialResultWarning {
    pub code: String,
    pub requested: usize,
    pub returned: usize,
    pub message: String,
}

impl PartialResultWarning {
    fn new(requested: usize, returned: usize) -> Self {
        Self {
            code: "PARTIAL_RESULT".to_string(),
            requested,
            returned,
            message: format!(
                "Only {returned} of {requested} requested options could be generated"
            ),
        }
    }
}

/// Ranked candidates for one content unit in one round. Texts are distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    pub unit_id: UnitId,
    pub round: u32,
    pub baseline_score: f64,
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<PartialResultWarning>,
}

impl OptionSet {
    pub fn find(&self, text: &str) -> Option<&Candidate> {
        let key = normalize(text);
        self.candidates.iter().find(|c| normalize(&c.text) == key)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// What a strategy sees for one call.
pub struct StrategyInput<'a> {
    pub unit: &'a ContentUnit,
    pub document: &'a ResumeDocument,
    pub job: &'a JobDescription,
    pub round: u32,
    /// 0-based attempt within this request; strategies vary output on it.
    pub attempt: u32,
    pub count: usize,
    /// Texts the caller has already seen for this unit.
    pub exclude_texts: &'a [String],
    pub feedback: Option<&'a str>,
}

/// A rewrite strategy. Implement this to swap wording backends without
/// touching the session, handlers or ranking.
#[async_trait]
pub trait OptionGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Proposes raw rewrite texts. May return duplicates or excluded texts;
    /// the pipeline filters them.
    async fn propose(&self, input: &StrategyInput<'_>) -> Result<Vec<String>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub struct OptionRequest<'a> {
    pub unit_id: UnitId,
    pub document: &'a ResumeDocument,
    pub job: &'a JobDescription,
    pub round: u32,
    pub exclude_texts: &'a [String],
    pub count: usize,
    pub feedback: Option<&'a str>,
}

/// Runs the strategy up to `MAX_ATTEMPTS` times and returns up to `count`
/// distinct, non-excluded candidates ranked by predicted delta (descending),
/// then shorter text, then text.
///
/// Fewer than `count` candidates come back with a `PartialResultWarning`;
/// none at all is `UnprocessableEntity`.
pub async fn generate_options(
    generator: &dyn OptionGenerator,
    request: &OptionRequest<'_>,
    config: &ScoringConfig,
) -> Result<OptionSet, AppError> {
    let unit = request.document.unit(request.unit_id).ok_or_else(|| {
        AppError::NotFound(format!("Content unit {} not found", request.unit_id))
    })?;
    if request.count == 0 {
        return Err(AppError::InvalidInput("count must be at least 1".to_string()));
    }

    let baseline = score_unit(&unit.text, unit.kind, request.job, config);
    let mut blocked: HashSet<String> = request.exclude_texts.iter().map(|t| normalize(t)).collect();
    blocked.insert(normalize(&unit.text));

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut last_error: Option<AppError> = None;

    for attempt in 0..MAX_ATTEMPTS {
        if candidates.len() >= request.count {
            break;
        }
        let input = StrategyInput {
            unit: &unit,
            document: request.document,
            job: request.job,
            round: request.round,
            attempt,
            count: request.count,
            exclude_texts: request.exclude_texts,
            feedback: request.feedback,
        };
        let proposals = match generator.propose(&input).await {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    "{} attempt {}/{} failed for unit {}: {e}",
                    generator.name(),
                    attempt + 1,
                    MAX_ATTEMPTS,
                    unit.id
                );
                last_error = Some(e);
                continue;
            }
        };
        let before = candidates.len();
        for text in proposals {
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() || !blocked.insert(normalize(&text)) {
                continue;
            }
            let predicted = score_unit(&text, unit.kind, request.job, config);
            candidates.push(Candidate {
                predicted_delta: round1(predicted.composite - baseline.composite),
                predicted_score: predicted.composite,
                round: request.round,
                matched_keywords: predicted.matched_keywords,
                text,
            });
        }
        debug!(
            "{} attempt {} for unit {} added {} candidate(s)",
            generator.name(),
            attempt + 1,
            unit.id,
            candidates.len() - before
        );
    }

    if candidates.is_empty() {
        return Err(last_error.unwrap_or_else(|| {
            AppError::UnprocessableEntity(format!(
                "No new options could be generated for unit {}",
                unit.id
            ))
        }));
    }

    candidates.sort_by(|a, b| {
        b.predicted_delta
            .total_cmp(&a.predicted_delta)
            .then(a.text.len().cmp(&b.text.len()))
            .then(a.text.cmp(&b.text))
    });
    candidates.truncate(request.count);

    let warning = (candidates.len() < request.count)
        .then(|| PartialResultWarning::new(request.count, candidates.len()));

    Ok(OptionSet {
        unit_id: unit.id,
        round: request.round,
        baseline_score: baseline.composite,
        candidates,
        warning,
    })
}

/// Comparison key for "same text": case-folded with whitespace collapsed.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
