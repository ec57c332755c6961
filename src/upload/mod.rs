pub mod cloudinary;

use crate::error::Result;
use async_trait::async_trait;

pub use cloudinary::CloudinaryUploader;

/// Hosts a raw image buffer and resolves with its public URL.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, image: Vec<u8>) -> Result<String>;
}
