// Option generation: rewrite strategies for content units plus ranking.
// All LLM calls go through llm_client; no direct Anthropic calls here.

pub mod llm;
pub mod options;
pub mod prompts;
pub mod rewrite;
pub mod tone;

pub use options::OptionGenerator;
