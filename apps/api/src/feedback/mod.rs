// Pedagogical feedback: prompt building, generation, session state and views.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod builder;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod session;
pub mod tone;
pub mod view;
