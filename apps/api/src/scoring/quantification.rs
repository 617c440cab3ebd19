use serde::{Deserialize, Serialize};

/// Why a bullet failed the quantification check, and what to do about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactGap {
    pub reason: String,
    pub suggestion: String,
}

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "great",
    "many",
    "numerous",
    "various",
    "several",
];

/// Placeholders the option generator inserts where the user must supply a figure.
pub const METRIC_PLACEHOLDERS: &[&str] = &["[X]", "[N]", "[LOW_METRICS]"];

/// True when the text states a measurable outcome.
///
/// Digits, `%`, currency signs and `[X]`-style placeholders all count;
/// a placeholder is a quantification the user still has to fill in.
pub fn is_quantified(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        || text.contains('%')
        || text.contains('$')
        || text.contains('€')
        || text.contains('£')
        || METRIC_PLACEHOLDERS.iter().any(|p| text.contains(p))
}

/// Checks one bullet for impact quantification. `None` means it passes.
pub fn impact_gap(text: &str) -> Option<ImpactGap> {
    if is_quantified(text) {
        return None;
    }
    let lower = text.to_lowercase();

    if let Some(vague) = VAGUE_VERBS.iter().find(|v| lower.contains(*v)) {
        return Some(ImpactGap {
            reason: format!("vague verb '{vague}' without a quantified outcome"),
            suggestion: format!("Say how much '{vague}' moved things: a number, percentage, or time saved"),
        });
    }
    if let Some(scale) = VAGUE_SCALE_WORDS.iter().find(|w| lower.contains(*w)) {
        return Some(ImpactGap {
            reason: format!("vague scale word '{scale}' without a number"),
            suggestion: format!("Replace '{scale}' with a specific figure such as '5x', '40%' or '3 weeks'"),
        });
    }
    Some(ImpactGap {
        reason: "no quantified outcome".to_string(),
        suggestion: "Add a number, percentage, or time metric".to_string(),
    })
}

/// Share of `bullets` that are quantified, in `[0, 1]`. Empty input yields 0.
pub fn quantified_ratio<'a>(bullets: impl IntoIterator<Item = &'a str>) -> f64 {
    let (total, hits) = bullets
        .into_iter()
        .fold((0usize, 0usize), |(total, hits), b| {
            (total + 1, hits + usize::from(is_quantified(b)))
        });
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
