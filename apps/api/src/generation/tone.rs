//! Tone calibration: maps the detected JD tone to opening verbs for rewrites.
//!
//! Every verb here is transitive and reads naturally in front of an object
//! phrase ("Architected backend systems"), and every verb scores as a strong
//! opening so a rewrite never loses action-verb points.

use crate::scoring::jd_parser::JdTone;

/// Verb sets and phrasing calibrated to a specific JD tone.
#[derive(Debug, Clone)]
pub struct ToneExamples {
    pub strong_verbs: Vec<&'static str>,
    /// Verbs that read wrong for this tone.
    pub avoid_verbs: Vec<&'static str>,
}

pub fn get_tone_examples(tone: JdTone) -> ToneExamples {
    match tone {
        JdTone::AggressiveStartup => ToneExamples {
            strong_verbs: vec!["Architected", "Spearheaded", "Built", "Shipped", "Drove", "Owned"],
            avoid_verbs: vec!["assisted", "helped", "supported", "participated in"],
        },
        JdTone::CollaborativeEnterprise => ToneExamples {
            strong_verbs: vec![
                "Delivered",
                "Co-developed",
                "Enabled",
                "Coordinated",
                "Standardized",
                "Facilitated",
            ],
            avoid_verbs: vec!["spearheaded", "solely built", "owned end-to-end"],
        },
        JdTone::ResearchOriented => ToneExamples {
            strong_verbs: vec![
                "Investigated",
                "Designed",
                "Evaluated",
                "Analyzed",
                "Prototyped",
                "Proposed",
            ],
            avoid_verbs: vec!["shipped", "launched", "moved fast", "disrupted"],
        },
        JdTone::ProductOriented => ToneExamples {
            strong_verbs: vec!["Shipped", "Delivered", "Launched", "Streamlined", "Built", "Redesigned"],
            avoid_verbs: vec!["investigated", "evaluated", "researched", "proposed"],
        },
    }
}
