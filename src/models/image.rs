use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Body of an `images/generations` call. Everything except the prompt and
/// model is fixed by [`ImageGenerationRequest::for_prompt`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub response_format: String,
    pub response_extension: String,
    pub width: u32,
    pub height: u32,
    pub num_inference_steps: u32,
    pub negative_prompt: String,
    pub seed: i64,
}

impl ImageGenerationRequest {
    pub fn for_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            response_format: "b64_json".to_string(),
            response_extension: "webp".to_string(),
            width: 1024,
            height: 1024,
            num_inference_steps: 4,
            negative_prompt: String::new(),
            // -1 asks the service for a random seed
            seed: -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImagePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImagePayload {
    pub b64_json: String, // Base64 encoded
}

impl ImagePayload {
    pub fn new(b64_json: impl Into<String>) -> Self {
        Self {
            b64_json: b64_json.into(),
        }
    }
}

/// A hosted image returned by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    pub alt: String,
}

impl GeneratedImage {
    /// `index` is zero-based; the alt text uses the 1-based position.
    pub fn new(url: impl Into<String>, prompt: &str, index: usize) -> Self {
        Self {
            url: url.into(),
            alt: format!("Generated image {} for prompt: {}", index + 1, prompt),
        }
    }
}

/// What the browser gallery renders: a generated image tagged with the prompt
/// that produced it and the moment it was handed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayedImage {
    pub url: String,
    pub alt: String,
    pub prompt: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl DisplayedImage {
    pub fn from_generated(image: GeneratedImage, prompt: &str) -> Self {
        Self {
            url: image.url,
            alt: image.alt,
            prompt: prompt.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
