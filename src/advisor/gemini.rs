//! Gemini `generateContent` client.

use super::{AdvisorError, LanguageModel, ModelRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    api_key: String,
    model_name: String,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model_name: impl Into<String>, timeout: Duration) -> Result<Self, AdvisorError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AdvisorError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            model_name: model_name.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_request(request: &ModelRequest) -> GeminiRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = &request.image_base64 {
            parts.push(Part::InlineData {
                inline_data: InlineData { mime_type: "image/jpeg", data: image.clone() },
            });
        }
        parts.push(Part::Text { text: request.text.clone() });

        GeminiRequest {
            contents: vec![Content { role: Some("user"), parts }],
            system_instruction: request.system_instruction.as_ref().map(|s| Content {
                role: None,
                parts: vec![Part::Text { text: s.clone() }],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.response_schema.clone(),
            }),
        }
    }
}

impl LanguageModel for GeminiClient {
    fn generate(&self, request: &ModelRequest) -> Result<String, AdvisorError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model_name);
        let body = Self::build_request(request);

        tracing::debug!(model = %self.model_name, with_image = request.image_base64.is_some(), "calling Gemini");

        let response = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &self.api_key)
            .set("User-Agent", concat!("SafeMeal/", env!("CARGO_PKG_VERSION")))
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Status(status, resp) => {
                    let body = resp.into_string().unwrap_or_default();
                    tracing::error!(status, %body, "Gemini API error");
                    AdvisorError::Api { status, body }
                }
                ureq::Error::Transport(t) => {
                    tracing::error!(error = %t, "Gemini API request failed");
                    AdvisorError::Network(t.to_string())
                }
            })?;

        let parsed: GeminiResponse = response
            .into_json()
            .map_err(|e| AdvisorError::InvalidResponse(e.to_string()))?;

        extract_text(parsed)
    }
}

fn extract_text(response: GeminiResponse) -> Result<String, AdvisorError> {
    response
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().map(|p| p.text).collect::<String>())
        .ok_or(AdvisorError::EmptyResponse)
}
