//! Gemini transport for the forensic UX audit.
//!
//! Turns a screenshot and a credential into a `generateContent` call carrying
//! the fixed instruction prompt and the response schema, then returns the
//! validated [`uxaudit_core::AnalysisResult`].

pub mod client;
pub mod error;
pub mod prompt;
pub mod request;
pub mod screenshot;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use prompt::{instruction_prompt, EXECUTE_INSTRUCTION, PROMPT_VERSION};
pub use request::{build_request, AnalysisRequest, GenerateContentRequest, GenerationSettings};
pub use screenshot::{ImageMime, ImagePayload};
