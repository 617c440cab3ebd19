// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Common instruction prepended to all rewrite prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only restate facts present in the original line and the résumé context. \
    Do NOT invent employers, technologies the candidate never used, or numbers. \
    Unknown figures must stay as placeholders ([X]%, [N]) for the candidate to fill in.";
