//! ISO 9001 quality assistant on top of `ai-llm-service`.
//!
//! Public API: [`QualityAgent`]. It composes the prompt, sends it with the
//! quality-manager persona, and turns the reply into a [`QualityResponse`]
//! with six always-filled sections.

mod agent;
mod persona;
mod prompt;
mod response;

pub mod parser;

pub use agent::QualityAgent;
pub use parser::{ParsedSections, Section, parse_sections};
pub use persona::DEFAULT_PERSONA;
pub use prompt::compose_prompt;
pub use response::QualityResponse;
