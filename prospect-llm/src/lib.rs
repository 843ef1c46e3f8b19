//! Provider-agnostic LLM integration for Prospect.
//!
//! This crate exposes a common [`traits::LlmClient`] interface, an
//! OpenAI-backed implementation, and the outreach drafting flow that turns
//! scraped "About Us" content into a personalized cold email.

pub mod openai;
pub mod outreach;
pub mod traits;

/// Default model for outreach drafting.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
