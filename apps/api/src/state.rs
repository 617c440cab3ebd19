use std::sync::Arc;

use crate::config::Config;
use crate::generation::OptionGenerator;
use crate::import::PdfImporter;
use crate::jobs::JobFetcher;
use crate::render::ResumeRenderer;
use crate::scoring::ScoringConfig;
use crate::session::SessionRegistry;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Service-wide scoring policy; requests may override it per call.
    pub scoring: ScoringConfig,
    pub store: Arc<dyn ResumeStore>,
    /// Pluggable rewrite strategy. LLM when ANTHROPIC_API_KEY is set, rule-based otherwise.
    pub generator: Arc<dyn OptionGenerator>,
    pub importer: Arc<dyn PdfImporter>,
    pub renderer: Arc<dyn ResumeRenderer>,
    pub fetcher: JobFetcher,
    pub sessions: SessionRegistry,
}

#[cfg(test)]
impl AppState {
    /// Rule-based generator, in-memory store, default config.
    pub fn for_tests(store: Arc<dyn ResumeStore>) -> Self {
        use crate::generation::rewrite::RuleBasedGenerator;
        use crate::import::TextPdfImporter;
        use crate::render::TextRenderer;

        let config = Config::from_vars(|_| None).expect("default config is valid");
        let scoring = config.scoring_config().expect("default scoring config is valid");
        let fetcher = JobFetcher::new(config.job_fetch_timeout).expect("HTTP client builds");
        Self {
            config,
            scoring,
            store,
            generator: Arc::new(RuleBasedGenerator),
            importer: Arc::new(TextPdfImporter),
            renderer: Arc::new(TextRenderer),
            fetcher,
            sessions: SessionRegistry::new(),
        }
    }
}
