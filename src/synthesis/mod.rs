pub mod image_client;

use crate::{error::Result, models::ImagePayload};
use async_trait::async_trait;

pub use image_client::NebiusImageClient;

/// Turns a prompt into one or more base64 image payloads.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<ImagePayload>>;
}
