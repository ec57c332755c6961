use crate::{
    config::Config,
    error::{GenerateImageError, Result, StudioError},
    logger,
    models::{GeneratedImage, ImagePayload},
    synthesis::{ImageSynthesizer, NebiusImageClient},
    upload::{CloudinaryUploader, MediaUploader},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use uuid::Uuid;

/// Runs synthesis once, uploads every returned image concurrently and hands
/// back the hosted images in payload order. All or nothing.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    synthesizer: Arc<dyn ImageSynthesizer>,
    uploader: Arc<dyn MediaUploader>,
}

impl GenerationOrchestrator {
    pub fn new(synthesizer: Arc<dyn ImageSynthesizer>, uploader: Arc<dyn MediaUploader>) -> Self {
        Self {
            synthesizer,
            uploader,
        }
    }

    /// Builds the Nebius and Cloudinary clients over one shared connection pool.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| StudioError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let synthesizer =
            NebiusImageClient::with_http_client(config.synthesis.clone(), http.clone())?;
        let uploader = CloudinaryUploader::with_http_client(config.hosting.clone(), http)?;

        Ok(Self::new(Arc::new(synthesizer), Arc::new(uploader)))
    }

    /// Public entry point. Failures are logged and collapsed into one generic
    /// error so callers never see provider details.
    pub async fn generate(
        &self,
        prompt: &str,
    ) -> std::result::Result<Vec<GeneratedImage>, GenerateImageError> {
        self.try_generate(prompt).await.map_err(|e| {
            log::error!("Error generating or uploading image: {}", e);
            GenerateImageError::from(e)
        })
    }

    pub async fn try_generate(&self, prompt: &str) -> Result<Vec<GeneratedImage>> {
        let request_id = Uuid::new_v4();
        let _timer = logger::timer(&format!("generate [req:{}]", request_id));

        log::info!("Generating images for prompt {:?} [req:{}]", prompt, request_id);

        let payloads = self.synthesizer.synthesize(prompt).await?;
        if payloads.is_empty() {
            return Err(StudioError::GenerationError("No images were generated.".into()));
        }

        log::info!(
            "Uploading {} image(s) [req:{}]",
            payloads.len(),
            request_id
        );

        let uploads = payloads
            .iter()
            .enumerate()
            .map(|(index, payload)| self.upload_payload(prompt, index, payload));

        // Every started upload runs to completion; the first error in payload
        // order then fails the whole call.
        let images = join_all(uploads)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Generated {} image(s) [req:{}]",
            images.len(),
            request_id
        );
        Ok(images)
    }

    async fn upload_payload(
        &self,
        prompt: &str,
        index: usize,
        payload: &ImagePayload,
    ) -> Result<GeneratedImage> {
        let bytes = STANDARD.decode(payload.b64_json.trim()).map_err(|e| {
            StudioError::GenerationError(format!("Image {} is not valid base64: {}", index + 1, e))
        })?;

        let url = self.uploader.upload(bytes).await?;
        Ok(GeneratedImage::new(url, prompt, index))
    }
}
