//! ATS scoring: a pure, deterministic function of (document, job description, config).
//!
//! Each criterion yields an independent sub-score in [0, 100] with a rationale.
//! The aggregate is the weighted sum; weights always sum to 1.0. Weak content
//! units are flagged per criterion so the option generator can target them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::{ContentUnit, ResumeDocument, ScoreRecord, UnitId, UnitKind};
use crate::scoring::completeness::compute_completeness_report;
use crate::scoring::formatting::{self, MAX_BULLET_WORDS, MIN_BULLET_WORDS};
use crate::scoring::jd_parser::{count_mentions, JobDescription};
use crate::scoring::quantification::{impact_gap, is_quantified, quantified_ratio};
use crate::scoring::verbs::{assess_opening, VerbStrength};

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    KeywordCoverage,
    ActionVerbs,
    Quantification,
    SectionCompleteness,
    Formatting,
}

impl Criterion {
    #[cfg(test)]
    pub const ALL: [Criterion; 5] = [
        Criterion::KeywordCoverage,
        Criterion::ActionVerbs,
        Criterion::Quantification,
        Criterion::SectionCompleteness,
        Criterion::Formatting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Criterion::KeywordCoverage => "keyword_coverage",
            Criterion::ActionVerbs => "action_verbs",
            Criterion::Quantification => "quantification",
            Criterion::SectionCompleteness => "section_completeness",
            Criterion::Formatting => "formatting",
        }
    }
}

/// Scoring policy. Weights always sum to 1.0 once built through
/// `Default` or `with_options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: BTreeMap<Criterion, f64>,
    /// Aggregate score required to pass, 0–100.
    pub pass_threshold: f64,
    /// Fraction of JD keywords that must appear, 0–1.
    pub min_keyword_match: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (Criterion::KeywordCoverage, 0.40),
                (Criterion::ActionVerbs, 0.15),
                (Criterion::Quantification, 0.20),
                (Criterion::SectionCompleteness, 0.15),
                (Criterion::Formatting, 0.10),
            ]),
            pass_threshold: 75.0,
            min_keyword_match: 0.5,
        }
    }
}

/// Request-level overrides. Any weight not named keeps its configured value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringOptions {
    #[serde(default)]
    pub weights: BTreeMap<Criterion, f64>,
    pub pass_threshold: Option<f64>,
    pub min_keyword_match: Option<f64>,
}

impl ScoringConfig {
    pub fn weight(&self, criterion: Criterion) -> f64 {
        self.weights.get(&criterion).copied().unwrap_or(0.0)
    }

    /// Applies overrides and renormalizes the weights to sum to 1.0.
    pub fn with_options(&self, options: &ScoringOptions) -> Result<ScoringConfig, AppError> {
        let mut weights = self.weights.clone();
        for (criterion, weight) in &options.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(AppError::InvalidInput(format!(
                    "weight for {} must be a non-negative number",
                    criterion.name()
                )));
            }
            weights.insert(*criterion, *weight);
        }
        let total: f64 = weights.values().sum();
        if total <= 0.0 {
            return Err(AppError::InvalidInput(
                "criterion weights must not all be zero".to_string(),
            ));
        }
        for weight in weights.values_mut() {
            *weight /= total;
        }

        let pass_threshold = options.pass_threshold.unwrap_or(self.pass_threshold);
        if !(0.0..=100.0).contains(&pass_threshold) {
            return Err(AppError::InvalidInput(
                "pass_threshold must be between 0 and 100".to_string(),
            ));
        }
        let min_keyword_match = options.min_keyword_match.unwrap_or(self.min_keyword_match);
        if !(0.0..=1.0).contains(&min_keyword_match) {
            return Err(AppError::InvalidInput(
                "min_keyword_match must be between 0 and 1".to_string(),
            ));
        }

        Ok(ScoringConfig {
            weights,
            pass_threshold,
            min_keyword_match,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f64,
    pub weight: f64,
    pub rationale: String,
}

/// A content unit that drags a criterion down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub unit_id: UnitId,
    pub criterion: Criterion,
    pub detail: String,
}

/// Immutable result of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall: f64,
    pub criteria: BTreeMap<Criterion, CriterionScore>,
    pub weaknesses: Vec<Weakness>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub keyword_match_ratio: f64,
    pub passes_threshold: bool,
    pub recommendations: Vec<String>,
    pub job_fingerprint: String,
}

impl ScoreReport {
    pub fn weaknesses_for(&self, unit: UnitId) -> impl Iterator<Item = &Weakness> {
        self.weaknesses.iter().filter(move |w| w.unit_id == unit)
    }

    #[cfg(test)]
    pub fn criterion_score(&self, criterion: Criterion) -> f64 {
        self.criteria.get(&criterion).map(|c| c.score).unwrap_or(0.0)
    }

    /// Snapshot for the document's score history.
    pub fn to_record(&self, timestamp: DateTime<Utc>) -> ScoreRecord {
        ScoreRecord {
            timestamp,
            job_fingerprint: self.job_fingerprint.clone(),
            overall: self.overall,
            criteria: self
                .criteria
                .iter()
                .map(|(c, s)| (c.name().to_string(), s.score))
                .collect(),
        }
    }
}

/// Matched vs missing JD keywords, split by requirement level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGapReport {
    pub matched: Vec<String>,
    pub missing_required: Vec<String>,
    pub missing_preferred: Vec<String>,
}

/// Sub-scores of a single content unit, used for predicted deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitScore {
    pub keyword: f64,
    /// `None` for the summary, which is not judged on its opening verb.
    pub action_verbs: Option<f64>,
    pub quantification: f64,
    pub formatting: f64,
    pub composite: f64,
    pub matched_keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Keyword weight that saturates a single unit's keyword sub-score.
const UNIT_KEYWORD_SATURATION: f64 = 4.0;
/// Sub-score used when the JD yields no keywords at all.
const NEUTRAL_KEYWORD_SCORE: f64 = 50.0;
const SUMMARY_MIN_WORDS: usize = 15;
const SUMMARY_MAX_WORDS: usize = 80;

pub fn score(
    doc: &ResumeDocument,
    jd: &JobDescription,
    config: &ScoringConfig,
) -> Result<ScoreReport, AppError> {
    doc.validate()?;

    let units = doc.content_units();
    let mut criteria = BTreeMap::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();

    // Keyword coverage
    let gaps = keyword_gaps(doc, jd);
    let (keyword_score, keyword_rationale) = if jd.keywords.is_empty() {
        (
            NEUTRAL_KEYWORD_SCORE,
            "No keywords could be extracted from the job description".to_string(),
        )
    } else {
        let total: f64 = jd.keywords.iter().map(|k| k.weight).sum();
        let matched: f64 = jd
            .keywords
            .iter()
            .filter(|k| gaps.matched.contains(&k.keyword))
            .map(|k| k.weight)
            .sum();
        (
            100.0 * matched / total,
            format!(
                "{} of {} job keywords found (required keywords count double)",
                gaps.matched.len(),
                jd.keywords.len()
            ),
        )
    };
    criteria.insert(
        Criterion::KeywordCoverage,
        criterion(config, Criterion::KeywordCoverage, keyword_score, keyword_rationale),
    );
    let missing_any = !gaps.missing_required.is_empty() || !gaps.missing_preferred.is_empty();
    if missing_any {
        for unit in &units {
            if jd.keywords_in(&unit.text).is_empty() {
                weaknesses.push(Weakness {
                    unit_id: unit.id,
                    criterion: Criterion::KeywordCoverage,
                    detail: "mentions none of the job's keywords".to_string(),
                });
            }
        }
    }
    if !gaps.missing_required.is_empty() {
        recommendations.push(format!(
            "Work in missing required keywords: {}",
            gaps.missing_required
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if !gaps.missing_preferred.is_empty() {
        recommendations.push(format!(
            "Consider adding preferred keywords: {}",
            gaps.missing_preferred
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    // Action verbs and quantification, highlights only
    let highlights: Vec<&ContentUnit> = units
        .iter()
        .filter(|u| u.kind != UnitKind::Summary)
        .collect();

    let mut verb_total = 0.0;
    let mut weak_openings = 0usize;
    for unit in &highlights {
        let assessment = assess_opening(&unit.text);
        verb_total += assessment.strength.score();
        let detail = match (assessment.strength, assessment.opening) {
            (VerbStrength::Weak, Some(opening)) => Some(format!("opens with weak phrase '{opening}'")),
            (VerbStrength::Missing, _) => Some("does not open with an action verb".to_string()),
            _ => None,
        };
        if let Some(detail) = detail {
            weak_openings += 1;
            weaknesses.push(Weakness {
                unit_id: unit.id,
                criterion: Criterion::ActionVerbs,
                detail,
            });
        }
    }
    let (verb_score, verb_rationale) = if highlights.is_empty() {
        (0.0, "No highlights to assess".to_string())
    } else {
        (
            verb_total / highlights.len() as f64,
            format!(
                "{} of {} highlights open with a weak phrase or no verb",
                weak_openings,
                highlights.len()
            ),
        )
    };
    if weak_openings > 0 {
        recommendations.push(format!(
            "Start {weak_openings} highlight(s) with a strong action verb"
        ));
    }
    criteria.insert(
        Criterion::ActionVerbs,
        criterion(config, Criterion::ActionVerbs, verb_score, verb_rationale),
    );

    let mut quantified = highlights.len();
    for unit in &highlights {
        if let Some(gap) = impact_gap(&unit.text) {
            quantified -= 1;
            weaknesses.push(Weakness {
                unit_id: unit.id,
                criterion: Criterion::Quantification,
                detail: gap.reason,
            });
        }
    }
    let (quant_score, quant_rationale) = if highlights.is_empty() {
        (0.0, "No highlights to assess".to_string())
    } else {
        (
            100.0 * quantified_ratio(highlights.iter().map(|u| u.text.as_str())),
            format!(
                "{} of {} highlights contain a metric",
                quantified,
                highlights.len()
            ),
        )
    };
    if quantified < highlights.len() {
        recommendations.push(format!(
            "Quantify {} highlight(s) with numbers, percentages or time saved",
            highlights.len() - quantified
        ));
    }
    criteria.insert(
        Criterion::Quantification,
        criterion(config, Criterion::Quantification, quant_score, quant_rationale),
    );

    // Section completeness
    let completeness = compute_completeness_report(doc);
    let completeness_rationale = if completeness.missing_sections.is_empty() {
        "All core sections present".to_string()
    } else {
        format!("Missing sections: {}", completeness.missing_sections.join(", "))
    };
    recommendations.extend(
        completeness
            .sections
            .iter()
            .flat_map(|s| s.recommendations.iter().cloned()),
    );
    criteria.insert(
        Criterion::SectionCompleteness,
        criterion(
            config,
            Criterion::SectionCompleteness,
            100.0 * completeness.overall_score,
            completeness_rationale,
        ),
    );

    // Formatting
    let format_report = formatting::assess(doc);
    let format_rationale = format!(
        "{} formatting issue(s) across highlights",
        format_report.issues.len()
    );
    weaknesses.extend(format_report.issues.iter().map(|(id, issue)| Weakness {
        unit_id: *id,
        criterion: Criterion::Formatting,
        detail: issue.clone(),
    }));
    recommendations.extend(format_report.recommendations);
    criteria.insert(
        Criterion::Formatting,
        criterion(
            config,
            Criterion::Formatting,
            100.0 * format_report.score,
            format_rationale,
        ),
    );

    let overall = round1(criteria.values().map(|c| c.score * c.weight).sum::<f64>());
    let keyword_match_ratio = if jd.keywords.is_empty() {
        1.0
    } else {
        round3(gaps.matched.len() as f64 / jd.keywords.len() as f64)
    };
    let passes_threshold =
        overall >= config.pass_threshold && keyword_match_ratio >= config.min_keyword_match;

    // Document order, then criterion order.
    let order: BTreeMap<UnitId, usize> = units.iter().enumerate().map(|(i, u)| (u.id, i)).collect();
    weaknesses.sort_by_key(|w| (order.get(&w.unit_id).copied().unwrap_or(usize::MAX), w.criterion));

    let mut missing_keywords = gaps.missing_required;
    missing_keywords.extend(gaps.missing_preferred);

    Ok(ScoreReport {
        overall,
        criteria,
        weaknesses,
        matched_keywords: gaps.matched,
        missing_keywords,
        keyword_match_ratio,
        passes_threshold,
        recommendations,
        job_fingerprint: jd.fingerprint(),
    })
}

/// Matched and missing JD keywords against the whole document text.
pub fn keyword_gaps(doc: &ResumeDocument, jd: &JobDescription) -> KeywordGapReport {
    let text = doc.full_text().to_lowercase();
    let mut report = KeywordGapReport {
        matched: vec![],
        missing_required: vec![],
        missing_preferred: vec![],
    };
    for entry in &jd.keywords {
        if count_mentions(&text, &entry.keyword) > 0 {
            report.matched.push(entry.keyword.clone());
        } else if entry.required {
            report.missing_required.push(entry.keyword.clone());
        } else {
            report.missing_preferred.push(entry.keyword.clone());
        }
    }
    report
}

/// Scores one piece of text as if it were a unit of `kind`.
///
/// The composite reuses the configured weights of the per-unit criteria;
/// section completeness has no per-unit meaning and is left out.
pub fn score_unit(
    text: &str,
    kind: UnitKind,
    jd: &JobDescription,
    config: &ScoringConfig,
) -> UnitScore {
    let hits = jd.keywords_in(text);
    let matched_keywords: Vec<String> = hits.iter().map(|k| k.keyword.clone()).collect();
    let keyword = if jd.keywords.is_empty() {
        NEUTRAL_KEYWORD_SCORE
    } else {
        let weight: f64 = hits.iter().map(|k| k.weight).sum();
        100.0 * (weight / UNIT_KEYWORD_SATURATION).min(1.0)
    };

    let action_verbs = match kind {
        UnitKind::Summary => None,
        _ => Some(assess_opening(text).strength.score()),
    };
    let quantification = if is_quantified(text) { 100.0 } else { 0.0 };

    let words = text.split_whitespace().count();
    let formatting = match kind {
        UnitKind::Summary if (SUMMARY_MIN_WORDS..=SUMMARY_MAX_WORDS).contains(&words) => 100.0,
        UnitKind::Summary => 50.0,
        _ if (MIN_BULLET_WORDS..=MAX_BULLET_WORDS).contains(&words)
            && formatting::bullet_issues(text).is_empty() =>
        {
            100.0
        }
        _ => 50.0,
    };

    let mut parts = vec![
        (config.weight(Criterion::KeywordCoverage), keyword),
        (config.weight(Criterion::Quantification), quantification),
        (config.weight(Criterion::Formatting), formatting),
    ];
    if let Some(verbs) = action_verbs {
        parts.push((config.weight(Criterion::ActionVerbs), verbs));
    }
    let total_weight: f64 = parts.iter().map(|(w, _)| w).sum();
    let composite = if total_weight > 0.0 {
        parts.iter().map(|(w, s)| w * s).sum::<f64>() / total_weight
    } else {
        0.0
    };

    UnitScore {
        keyword: round1(keyword),
        action_verbs: action_verbs.map(round1),
        quantification,
        formatting,
        composite: round1(composite),
        matched_keywords,
    }
}

fn criterion(config: &ScoringConfig, c: Criterion, score: f64, rationale: String) -> CriterionScore {
    CriterionScore {
        score: round1(score.clamp(0.0, 100.0)),
        weight: config.weight(c),
        rationale,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
