pub mod completeness;
pub mod engine;
pub mod formatting;
pub mod handlers;
pub mod jd_parser;
pub mod quantification;
pub mod verbs;

pub use engine::ScoringConfig;
