// Prompt constants for the LLM rewrite strategy.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for option generation: JSON-only output.
pub const OPTIONS_SYSTEM: &str = "You are an expert résumé writer who rewrites single résumé \
    lines so they pass Applicant Tracking System screening for a specific job. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Option generation prompt template.
/// Replace: {grounding_instruction}, {unit_kind}, {context}, {text}, {tone_json},
///          {keywords_json}, {exclude_json}, {feedback}, {round}, {count}
pub const OPTIONS_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Rewrite this résumé {unit_kind} ({context}):
"{text}"

TONE CALIBRATION for this role:
{tone_json}

JD KEYWORDS the line does not mention yet (work in only those the résumé context supports, never stuff):
{keywords_json}

ALREADY SHOWN to the user (do NOT repeat or trivially rephrase any of these):
{exclude_json}

USER FEEDBACK on earlier options: {feedback}

This is generation round {round}; take a different angle from earlier rounds.

Return a JSON object with exactly {count} distinct rewrites:
{
  "options": [
    "Architected distributed systems on Kubernetes, reducing p99 latency by [X]%"
  ]
}

HARD RULES:
1. Open bullets with a strong past-tense action verb; summaries are two or three sentences
2. Keep bullets between 8 and 30 words, no first-person pronouns
3. Where a figure is unknown, write a placeholder such as [X]% or [N] instead of inventing one
4. Every option must differ meaningfully from the others and from the ALREADY SHOWN list"#;
