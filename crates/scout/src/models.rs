//! These models represent the conversation passed between the agent and the model provider.
//!
//! Provider wire formats (Gemini `contents`/`parts`) are converted to and from these
//! structs at the provider boundary, so nothing outside `providers` sees raw payloads.
pub mod message;
