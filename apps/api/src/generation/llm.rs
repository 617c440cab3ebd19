//! LLM rewrite strategy. All calls go through `llm_client`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::options::{OptionGenerator, StrategyInput};
use crate::generation::prompts::{OPTIONS_PROMPT_TEMPLATE, OPTIONS_SYSTEM};
use crate::generation::tone::get_tone_examples;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::resume::UnitKind;
use crate::scoring::jd_parser::count_mentions;

#[derive(Debug, Deserialize)]
struct LlmOptions {
    options: Vec<String>,
}

pub struct LlmOptionGenerator(pub LlmClient);

#[async_trait]
impl OptionGenerator for LlmOptionGenerator {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn propose(&self, input: &StrategyInput<'_>) -> Result<Vec<String>, AppError> {
        let prompt = build_options_prompt(input)?;
        info!(
            "Requesting {} LLM options for unit {} (round {}, attempt {})",
            input.count, input.unit.id, input.round, input.attempt
        );
        let response: LlmOptions = self
            .0
            .call_json(&prompt, OPTIONS_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Option generation LLM call failed: {e}")))?;
        Ok(response.options)
    }
}

fn build_options_prompt(input: &StrategyInput<'_>) -> Result<String, AppError> {
    let lower = input.unit.text.to_lowercase();
    let keywords: Vec<&str> = input
        .job
        .keywords
        .iter()
        .filter(|k| count_mentions(&lower, &k.keyword) == 0)
        .map(|k| k.keyword.as_str())
        .collect();
    let keywords_json = serde_json::to_string(&keywords)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize keywords: {e}")))?;
    let exclude_json = serde_json::to_string_pretty(input.exclude_texts)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize exclusions: {e}")))?;

    let tone = get_tone_examples(input.job.detected_tone);
    let tone_json = serde_json::to_string(&serde_json::json!({
        "detected_tone": input.job.detected_tone,
        "strong_verbs": tone.strong_verbs,
        "avoid_verbs": tone.avoid_verbs,
    }))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize tone: {e}")))?;

    let unit_kind = match input.unit.kind {
        UnitKind::Summary => "professional summary",
        UnitKind::WorkHighlight | UnitKind::ProjectHighlight => "bullet",
    };

    Ok(OPTIONS_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{unit_kind}", unit_kind)
        .replace("{context}", &input.unit.context)
        .replace("{tone_json}", &tone_json)
        .replace("{keywords_json}", &keywords_json)
        .replace("{exclude_json}", &exclude_json)
        .replace("{feedback}", input.feedback.unwrap_or("none"))
        .replace("{round}", &input.round.to_string())
        .replace("{count}", &input.count.to_string())
        .replace("{text}", &input.unit.text))
}
