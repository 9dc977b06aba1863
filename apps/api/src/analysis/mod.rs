// Resume analysis: prompt selection, the single Gemini call, and response shaping.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod translator;
