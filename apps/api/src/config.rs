use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::scoring::engine::{ScoringConfig, ScoringOptions};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root of the file-backed résumé store.
    pub data_dir: PathBuf,
    /// Enables the LLM option strategy when set.
    pub anthropic_api_key: Option<String>,
    pub generation_timeout: Duration,
    pub job_fetch_timeout: Duration,
    /// Open sessions untouched this long are evicted.
    pub session_idle_ttl: Duration,
    /// Finalized or abandoned sessions are kept this long.
    pub session_retention: Duration,
    pub default_option_count: usize,
    pub max_option_count: usize,
    pub pass_threshold: f64,
    pub min_keyword_match: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Config {
            port: parse_or(&var, "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            data_dir: var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/resumes")),
            anthropic_api_key: var("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            generation_timeout: Duration::from_secs(parse_or(&var, "GENERATION_TIMEOUT_SECS", 30)?),
            job_fetch_timeout: Duration::from_secs(parse_or(&var, "JOB_FETCH_TIMEOUT_SECS", 30)?),
            session_idle_ttl: Duration::from_secs(parse_or(&var, "SESSION_IDLE_TTL_SECS", 4 * 3600)?),
            session_retention: Duration::from_secs(parse_or(&var, "SESSION_RETENTION_SECS", 3600)?),
            default_option_count: parse_or(&var, "DEFAULT_OPTION_COUNT", 3)?,
            max_option_count: parse_or(&var, "MAX_OPTION_COUNT", 5)?,
            pass_threshold: parse_or(&var, "PASS_THRESHOLD", 75.0)?,
            min_keyword_match: parse_or(&var, "MIN_KEYWORD_MATCH", 0.5)?,
        };

        if config.generation_timeout.is_zero() {
            bail!("GENERATION_TIMEOUT_SECS must be greater than zero");
        }
        if config.default_option_count == 0 || config.default_option_count > config.max_option_count {
            bail!(
                "DEFAULT_OPTION_COUNT must be between 1 and MAX_OPTION_COUNT ({})",
                config.max_option_count
            );
        }
        // Threshold ranges are checked by the scoring policy itself.
        config.scoring_config()?;
        Ok(config)
    }

    /// Service-wide scoring policy: default weights with the configured thresholds.
    pub fn scoring_config(&self) -> Result<ScoringConfig> {
        let options = ScoringOptions {
            pass_threshold: Some(self.pass_threshold),
            min_keyword_match: Some(self.min_keyword_match),
            ..ScoringOptions::default()
        };
        ScoringConfig::default()
            .with_options(&options)
            .context("Invalid PASS_THRESHOLD or MIN_KEYWORD_MATCH")
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
