//! `generateContent` wire types and the audit request builder.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uxaudit_core::config::DEFAULT_GEMINI_MODEL;
use uxaudit_core::{schema, AppConfig, CoreError, Credential};

use crate::prompt::{instruction_prompt, EXECUTE_INSTRUCTION};
use crate::screenshot::ImagePayload;

pub const RESPONSE_MIME_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineBlob,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineBlob {
    pub mime_type: String,
    /// Raw base64, no `data:` prefix.
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub top_p: f64,
    pub top_k: u32,
    pub thinking_config: ThinkingConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Set on thought-summary parts, which are not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, or `None` when the
    /// model produced no text at all.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Model and sampling settings applied to every audit request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub thinking_budget: u32,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_owned(),
            thinking_budget: 20_000,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

impl GenerationSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.gemini_model.clone(),
            thinking_budget: config.thinking_budget,
            top_p: config.top_p,
            top_k: config.top_k,
        }
    }
}

/// A fully assembled audit request: target model, key and body.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub model: String,
    pub credential: Credential,
    pub body: GenerateContentRequest,
}

impl GenerateContentRequest {
    /// Assembles the body for an already-encoded image.
    ///
    /// Parts are ordered: instruction prompt, image, execute instruction.
    #[must_use]
    pub fn for_image(image: &ImagePayload, settings: &GenerationSettings) -> Self {
        let parts = vec![
            Part::Text {
                text: instruction_prompt(),
            },
            Part::InlineData {
                inline_data: InlineBlob {
                    mime_type: image.mime().as_str().to_owned(),
                    data: image.base64_data().to_owned(),
                },
            },
            Part::Text {
                text: EXECUTE_INSTRUCTION.to_owned(),
            },
        ];
        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE.to_owned(),
                response_schema: schema::response_schema(),
                top_p: settings.top_p,
                top_k: settings.top_k,
                thinking_config: ThinkingConfig {
                    thinking_budget: settings.thinking_budget,
                },
            },
        }
    }

    /// The body with image data replaced by a length marker, for dry runs.
    #[must_use]
    pub fn redacted(&self) -> Value {
        let mut body = self.clone();
        for content in &mut body.contents {
            for part in &mut content.parts {
                if let Part::InlineData { inline_data } = part {
                    inline_data.data = format!("<{} base64 chars>", inline_data.data.len());
                }
            }
        }
        serde_json::to_value(&body).unwrap_or(Value::Null)
    }
}

impl AnalysisRequest {
    #[must_use]
    pub fn from_payload(
        image: &ImagePayload,
        credential: Credential,
        settings: &GenerationSettings,
    ) -> Self {
        Self {
            model: settings.model.clone(),
            credential,
            body: GenerateContentRequest::for_image(image, settings),
        }
    }
}

/// Builds an audit request from raw screenshot bytes.
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] if `image_bytes` is empty.
/// - [`CoreError::UnsupportedImage`] if the bytes are not JPEG or PNG.
pub fn build_request(
    image_bytes: &[u8],
    credential: Credential,
    settings: &GenerationSettings,
) -> Result<AnalysisRequest, CoreError> {
    let image = ImagePayload::from_bytes(image_bytes)?;
    Ok(AnalysisRequest::from_payload(&image, credential, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn key() -> Credential {
        Credential::new("test-key").expect("non-blank key")
    }

    #[test]
    fn empty_image_is_rejected() {
        let err = build_request(&[], key(), &GenerationSettings::default()).unwrap_err();
        assert_eq!(err, CoreError::EmptyInput);
    }

    #[test]
    fn parts_are_prompt_image_execute() {
        let request = build_request(PNG_MAGIC, key(), &GenerationSettings::default())
            .expect("valid request");
        let body = serde_json::to_value(&request.body).expect("serializes");
        let parts = body["contents"][0]["parts"].as_array().expect("parts");
        assert_eq!(parts.len(), 3);
        assert!(parts[0]["text"]
            .as_str()
            .is_some_and(|t| t.contains("FIELD CONSTRAINTS")));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert!(!parts[1]["inlineData"]["data"]
            .as_str()
            .is_some_and(|d| d.starts_with("data:")));
        assert_eq!(parts[2]["text"], EXECUTE_INSTRUCTION);
    }

    #[test]
    fn generation_config_uses_settings_and_schema() {
        let settings = GenerationSettings {
            model: "gemini-test".to_owned(),
            thinking_budget: 512,
            top_p: 0.5,
            top_k: 7,
        };
        let request = build_request(PNG_MAGIC, key(), &settings).expect("valid request");
        assert_eq!(request.model, "gemini-test");
        let body = serde_json::to_value(&request.body).expect("serializes");
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["topP"], json!(0.5));
        assert_eq!(config["topK"], json!(7));
        assert_eq!(config["thinkingConfig"]["thinkingBudget"], json!(512));
        assert_eq!(config["responseSchema"], schema::response_schema());
    }

    #[test]
    fn debug_and_redacted_body_hide_secrets() {
        let request = build_request(PNG_MAGIC, key(), &GenerationSettings::default())
            .expect("valid request");
        assert!(!format!("{request:?}").contains("test-key"));
        let redacted = request.body.redacted();
        assert_eq!(
            redacted["contents"][0]["parts"][1]["inlineData"]["data"],
            "<16 base64 chars>"
        );
    }

    #[test]
    fn response_text_concatenates_answer_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"a\":" },
                    { "text": "1}" }
                ]},
                "finishReason": "STOP"
            }]
        }))
        .expect("envelope");
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .expect("envelope");
        assert!(response.text().is_none());
        assert_eq!(
            response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .as_deref(),
            Some("SAFETY")
        );
    }
}
