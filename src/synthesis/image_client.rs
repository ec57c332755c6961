use crate::{
    config::SynthesisConfig,
    error::{Result, StudioError},
    models::{ImageGenerationRequest, ImageGenerationResponse, ImagePayload, ProviderErrorResponse},
    synthesis::ImageSynthesizer,
};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Clone)]
pub struct NebiusImageClient {
    client: Client,
    config: SynthesisConfig,
}

impl NebiusImageClient {
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        Self::with_http_client(config, Client::new())
    }

    /// Reuses an existing connection pool.
    pub fn with_http_client(config: SynthesisConfig, client: Client) -> Result<Self> {
        if config.api_key.is_none() {
            return Err(StudioError::ConfigError(
                "Synthesis API key is required".into(),
            ));
        }
        Ok(Self { client, config })
    }

    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("black-forest-labs/flux-schnell", "FLUX.1 [schnell]", "Black Forest Labs"),
            ("black-forest-labs/flux-dev", "FLUX.1 [dev]", "Black Forest Labs"),
            (
                "stability-ai/sdxl",
                "Stable Diffusion XL",
                "Stability AI",
            ),
        ]
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn generate(&self, request: &ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        log::info!("Generating image with model: {}", request.model);

        let response = self
            .client
            .post(self.config.generations_url())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| StudioError::GenerationError(format!("Synthesis request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StudioError::GenerationError(format!(
                "Synthesis service returned {}: {}",
                status,
                ProviderErrorResponse::message_from_body(&error_text)
            )));
        }

        response
            .json::<ImageGenerationResponse>()
            .await
            .map_err(|e| StudioError::GenerationError(format!("Invalid synthesis response: {}", e)))
    }
}

#[async_trait]
impl ImageSynthesizer for NebiusImageClient {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<ImagePayload>> {
        let request = ImageGenerationRequest::for_prompt(self.config.model.clone(), prompt);
        let response = self.generate(&request).await?;

        if response.data.is_empty() {
            return Err(StudioError::GenerationError("No images were generated.".into()));
        }

        log::debug!("Synthesis returned {} image(s)", response.data.len());
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NebiusImageClient {
        let config = SynthesisConfig::new()
            .with_api_key("test-key")
            .with_base_url(format!("{}/v1/", server.uri()));
        NebiusImageClient::new(config).unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let result = NebiusImageClient::new(SynthesisConfig::new());
        assert!(matches!(result, Err(StudioError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_synthesize_sends_fixed_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({
                "model": "black-forest-labs/flux-schnell",
                "prompt": "a red bicycle",
                "response_format": "b64_json",
                "response_extension": "webp",
                "width": 1024,
                "height": 1024,
                "num_inference_steps": 4,
                "negative_prompt": "",
                "seed": -1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"b64_json": "aGVsbG8="}, {"b64_json": "d29ybGQ="}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payloads = client_for(&server).synthesize("a red bicycle").await.unwrap();

        assert_eq!(
            payloads,
            vec![ImagePayload::new("aGVsbG8="), ImagePayload::new("d29ybGQ=")]
        );
    }

    #[tokio::test]
    async fn test_empty_data_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server).synthesize("nothing").await.unwrap_err();
        assert!(matches!(err, StudioError::GenerationError(msg) if msg.contains("No images")));
    }

    #[tokio::test]
    async fn test_upstream_fault_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "model overloaded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).synthesize("busy").await.unwrap_err();
        match err {
            StudioError::GenerationError(msg) => assert!(msg.contains("model overloaded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
