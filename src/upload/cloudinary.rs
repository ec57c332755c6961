use crate::{
    config::HostingConfig,
    error::{Result, StudioError},
    models::{ProviderErrorResponse, UploadResponse},
    upload::MediaUploader,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use sha1::{Digest, Sha1};

const RESOURCE_TYPE: &str = "image";
const OUTPUT_FORMAT: &str = "webp";

#[derive(Clone)]
pub struct CloudinaryUploader {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: String,
}

impl CloudinaryUploader {
    pub fn new(config: HostingConfig) -> Result<Self> {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: HostingConfig, client: Client) -> Result<Self> {
        let cloud_name = config
            .cloud_name
            .ok_or_else(|| StudioError::ConfigError("Cloudinary cloud name is required".into()))?;
        let api_key = config
            .api_key
            .ok_or_else(|| StudioError::ConfigError("Cloudinary API key is required".into()))?;
        let api_secret = config
            .api_secret
            .ok_or_else(|| StudioError::ConfigError("Cloudinary API secret is required".into()))?;

        Ok(Self {
            client,
            cloud_name,
            api_key,
            api_secret,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.api_base, self.cloud_name, RESOURCE_TYPE
        )
    }

    fn build_form(&self, image: Vec<u8>, timestamp: i64) -> multipart::Form {
        let timestamp = timestamp.to_string();
        let signature = sign_params(
            &[("format", OUTPUT_FORMAT), ("timestamp", timestamp.as_str())],
            &self.api_secret,
        );

        let file_part = multipart::Part::bytes(image).file_name("image");

        multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("format", OUTPUT_FORMAT)
            .text("signature", signature)
    }
}

/// Cloudinary string-to-sign: parameters sorted by name, `k=v` joined with `&`.
pub(crate) fn string_to_sign(params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// SHA-1 of the string-to-sign with the API secret appended, lowercase hex.
pub(crate) fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, image: Vec<u8>) -> Result<String> {
        let size = image.len();
        let form = self.build_form(image, Utc::now().timestamp());

        log::debug!("Uploading {} bytes to {}", size, self.upload_url());

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| StudioError::UploadError(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = ProviderErrorResponse::message_from_body(&error_text);
            log::error!("Cloudinary upload error ({}): {}", status, message);
            return Err(StudioError::UploadError(format!(
                "Failed to upload image to Cloudinary: {}",
                message
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| StudioError::UploadError(format!("Invalid upload response: {}", e)))?;

        match uploaded.secure_url {
            Some(url) if !url.is_empty() => {
                log::debug!(
                    "Uploaded {} as {}",
                    uploaded.public_id.as_deref().unwrap_or("<unnamed>"),
                    url
                );
                Ok(url)
            }
            _ => Err(StudioError::UploadError(
                "Upload response did not include a secure URL".into(),
            )),
        }
    }
}
