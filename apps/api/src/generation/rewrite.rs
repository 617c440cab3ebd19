//! Rule-based rewrite strategy. Deterministic for a given (text, job, round, attempt),
//! no network calls, fully testable.
//!
//! Styles, applied in turn:
//! - metrics: strong verb + object + placeholder outcome (`[X]%`, `[N]`)
//! - keyword: strong verb + object + missing JD keywords
//! - action: paired verbs + object + outcome
//! - concise: strong verb + trimmed object + short outcome
//!
//! Placeholders mark figures the user must fill in; nothing here invents a number.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::generation::options::{OptionGenerator, StrategyInput};
use crate::generation::tone::get_tone_examples;
use crate::models::resume::UnitKind;
use crate::scoring::jd_parser::{count_mentions, JobDescription, KeywordEntry};
use crate::scoring::verbs::{assess_opening, strip_weak_opening, VerbStrength};

const OUTCOMES: &[&str] = &[
    "reducing latency by [X]%",
    "cutting operating costs by [X]%",
    "improving throughput by [X]%",
    "saving [N] engineering hours per month",
    "serving [N]+ daily users",
    "reducing incident volume by [X]%",
    "shortening release cycles by [X]%",
    "supporting [N] downstream teams",
];

const CONCISE_WORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Metrics,
    Keyword,
    Action,
    Concise,
}

const DEFAULT_STYLES: [Style; 4] = [Style::Metrics, Style::Keyword, Style::Action, Style::Concise];

pub struct RuleBasedGenerator;

#[async_trait]
impl OptionGenerator for RuleBasedGenerator {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    async fn propose(&self, input: &StrategyInput<'_>) -> Result<Vec<String>, AppError> {
        Ok(match input.unit.kind {
            UnitKind::Summary => summary_variants(input),
            _ => bullet_variants(input),
        })
    }
}

/// Varies with round and attempt so later calls reach new combinations.
fn seed(input: &StrategyInput<'_>) -> usize {
    input.round as usize * 7 + input.attempt as usize * 3
}

/// Styles in preference order; feedback that names a style moves it first.
fn styles_for(feedback: Option<&str>) -> Vec<Style> {
    let mut styles = DEFAULT_STYLES.to_vec();
    let Some(feedback) = feedback.map(str::to_lowercase) else {
        return styles;
    };
    let preferred = if feedback.contains("short") || feedback.contains("concise") {
        Some(Style::Concise)
    } else if feedback.contains("keyword") {
        Some(Style::Keyword)
    } else if feedback.contains("metric") || feedback.contains("number") || feedback.contains("quantif") {
        Some(Style::Metrics)
    } else if feedback.contains("verb") || feedback.contains("action") {
        Some(Style::Action)
    } else {
        None
    };
    if let Some(style) = preferred {
        styles.retain(|s| *s != style);
        styles.insert(0, style);
    }
    styles
}

fn bullet_variants(input: &StrategyInput<'_>) -> Vec<String> {
    let verbs = get_tone_examples(input.job.detected_tone).strong_verbs;
    let object = object_phrase(&input.unit.text);
    let keywords = keywords_to_add(input.job, &input.unit.text);
    let base = seed(input);

    let mut out = Vec::new();
    // Two verb choices per style so each call offers more than `count`.
    for offset in 0..2 {
        for (i, style) in styles_for(input.feedback).into_iter().enumerate() {
            let n = base + i + offset * DEFAULT_STYLES.len();
            let verb = verbs[n % verbs.len()];
            let outcome = OUTCOMES[n % OUTCOMES.len()];
            let text = match style {
                Style::Metrics => format!("{verb} {object}, {outcome}"),
                Style::Keyword => match pick(&keywords, n, 2).as_slice() {
                    [] => format!("{verb} {object}, {outcome}"),
                    [one] => format!("{verb} {object} using {one}, {outcome}"),
                    [first, second, ..] => format!("{verb} {object} using {first} and {second}"),
                },
                Style::Action => {
                    let second = verbs[(n + 1) % verbs.len()].to_lowercase();
                    if second == verb.to_lowercase() {
                        format!("{verb} {object} end to end, {outcome}")
                    } else {
                        format!("{verb} and {second} {object}, {outcome}")
                    }
                }
                Style::Concise => {
                    let short = truncate_words(&object, CONCISE_WORDS);
                    let gain = OUTCOMES[(n + 3) % OUTCOMES.len()];
                    format!("{verb} {short}, {gain}")
                }
            };
            out.push(text);
        }
    }
    out
}

fn summary_variants(input: &StrategyInput<'_>) -> Vec<String> {
    let doc = input.document;
    let label = doc
        .basics
        .label
        .clone()
        .or_else(|| doc.work.first().map(|w| w.position.clone()))
        .unwrap_or_else(|| "Professional".to_string());
    let original = input.unit.text.trim().trim_end_matches('.');
    let mut keywords = keywords_to_add(input.job, "");
    if keywords.is_empty() {
        keywords = doc
            .skills
            .iter()
            .flat_map(|s| s.keywords.iter().cloned())
            .take(3)
            .collect();
    }
    let base = seed(input);
    let focus = join_list(&pick(&keywords, base, 3));
    let alt_focus = join_list(&pick(&keywords, base + 1, 2));
    let focus = if focus.is_empty() { "complex systems".to_string() } else { focus };
    let alt_focus = if alt_focus.is_empty() { focus.clone() } else { alt_focus };
    let outcome = OUTCOMES[base % OUTCOMES.len()];

    vec![
        format!("{label} with [N]+ years of experience in {focus}. {original}."),
        format!("{original}, with hands-on depth in {focus} and a record of {outcome}."),
        format!(
            "Results-driven {} specializing in {alt_focus}, with [N]+ years of measurable impact such as {outcome}.",
            lowercase_first(&label)
        ),
        format!("{label} focused on {focus}; {}.", lowercase_first(original)),
    ]
}

/// The bullet minus its opening verb phrase, ready to follow a new verb.
fn object_phrase(text: &str) -> String {
    let text = text.trim().trim_end_matches('.');
    if let Some(rest) = strip_weak_opening(text) {
        return lowercase_first(rest);
    }
    let assessment = assess_opening(text);
    let rest = match assessment.strength {
        VerbStrength::Strong | VerbStrength::Moderate => text
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim_start())
            .unwrap_or(text),
        _ => text,
    };
    lowercase_first(rest)
}

/// Display forms of JD keywords the text does not mention yet, required first.
fn keywords_to_add(job: &JobDescription, text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    job.keywords
        .iter()
        .filter(|k| count_mentions(&lower, &k.keyword) == 0)
        .map(|k| display_keyword(job, k))
        .collect()
}

/// The keyword as the JD spells it ("Kubernetes" rather than "kubernetes").
fn display_keyword(job: &JobDescription, entry: &KeywordEntry) -> String {
    job.text
        .to_lowercase()
        .find(&entry.keyword)
        .and_then(|i| job.text.get(i..i + entry.keyword.len()))
        .filter(|s| s.to_lowercase() == entry.keyword)
        .map(str::to_string)
        .unwrap_or_else(|| entry.keyword.clone())
}

/// Up to `n` items starting at a rotating offset.
fn pick(items: &[String], offset: usize, n: usize) -> Vec<String> {
    if items.is_empty() {
        return vec![];
    }
    (0..n.min(items.len()))
        .map(|i| items[(offset + i) % items.len()].clone())
        .collect()
}

fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn truncate_words(text: &str, max: usize) -> String {
    text.split_whitespace()
        .take(max)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(|c: char| c == ',' || c == ';')
        .to_string()
}

/// Lower-cases the first letter unless the word looks like an acronym or a name with inner capitals.
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && !second.is_uppercase() => {
            let mut out: String = first.to_lowercase().collect();
            out.push_str(&text[first.len_utf8()..]);
            out
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ContentUnit, ResumeDocument};
    use crate::scoring::quantification::is_quantified;

    const JD: &str = "Backend role. Requirements: distributed systems, Kubernetes.";

    fn input<'a>(
        unit: &'a ContentUnit,
        doc: &'a ResumeDocument,
        job: &'a JobDescription,
        round: u32,
        attempt: u32,
    ) -> StrategyInput<'a> {
        StrategyInput {
            unit,
            document: doc,
            job,
            round,
            attempt,
            count: 3,
            exclude_texts: &[],
            feedback: None,
        }
    }

    fn weak_bullet() -> (ResumeDocument, ContentUnit) {
        let mut doc = ResumeDocument::new("Ada");
        let work = doc.add_work("Acme", "Backend Engineer");
        let id = doc.add_work_highlight(work, "Worked on backend systems").unwrap();
        let unit = doc.unit(id).unwrap();
        (doc, unit)
    }

    #[tokio::test]
    async fn test_every_variant_adds_metric_or_keyword() {
        let (doc, unit) = weak_bullet();
        let job = JobDescription::parse(JD).unwrap();
        let proposals = RuleBasedGenerator.propose(&input(&unit, &doc, &job, 1, 0)).await.unwrap();
        assert!(proposals.len() >= 3);
        for text in &proposals {
            let has_keyword = !job.keywords_in(text).is_empty();
            assert!(is_quantified(text) || has_keyword, "{text}");
            assert!(!text.to_lowercase().starts_with("worked on"), "{text}");
        }
        assert!(proposals.iter().any(|t| t.contains("Kubernetes")));
    }

    #[tokio::test]
    async fn test_rounds_change_output() {
        let (doc, unit) = weak_bullet();
        let job = JobDescription::parse(JD).unwrap();
        let r1 = RuleBasedGenerator.propose(&input(&unit, &doc, &job, 1, 0)).await.unwrap();
        let r2 = RuleBasedGenerator.propose(&input(&unit, &doc, &job, 2, 0)).await.unwrap();
        assert_ne!(r1, r2);
    }

    #[tokio::test]
    async fn test_same_inputs_same_output() {
        let (doc, unit) = weak_bullet();
        let job = JobDescription::parse(JD).unwrap();
        let a = RuleBasedGenerator.propose(&input(&unit, &doc, &job, 3, 1)).await.unwrap();
        let b = RuleBasedGenerator.propose(&input(&unit, &doc, &job, 3, 1)).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_summary_variants_mention_focus_keywords() {
        let mut doc = ResumeDocument::new("Ada");
        doc.basics.label = Some("Platform Engineer".to_string());
        let id = doc.set_summary("Engineer who likes reliable infrastructure");
        let unit = doc.unit(id).unwrap();
        let job = JobDescription::parse(JD).unwrap();
        let proposals = RuleBasedGenerator.propose(&input(&unit, &doc, &job, 1, 0)).await.unwrap();
        assert!(proposals.iter().all(|p| p.contains("Kubernetes") || p.contains("distributed systems")));
        assert!(proposals[0].starts_with("Platform Engineer with [N]+ years"));
    }

    #[test]
    fn test_object_phrase_drops_opening_verb() {
        assert_eq!(object_phrase("Worked on backend systems."), "backend systems");
        assert_eq!(object_phrase("Built the ledger"), "the ledger");
        assert_eq!(object_phrase("API gateway ownership"), "API gateway ownership");
    }

    #[test]
    fn test_feedback_reorders_styles() {
        assert_eq!(styles_for(Some("Make it shorter"))[0], Style::Concise);
        assert_eq!(styles_for(Some("needs more keywords"))[0], Style::Keyword);
        assert_eq!(styles_for(None), DEFAULT_STYLES.to_vec());
    }

    #[test]
    fn test_display_keyword_uses_jd_casing() {
        let job = JobDescription::parse(JD).unwrap();
        let k8s = job.keywords.iter().find(|k| k.keyword == "kubernetes").unwrap();
        assert_eq!(display_keyword(&job, k8s), "Kubernetes");
    }
}
