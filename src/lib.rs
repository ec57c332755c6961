//! Prompt-to-image bridge: asks an image-generation service for pictures,
//! hosts each one on a media CDN and returns the public URLs.
//!
//! ```no_run
//! use promptforge::{Config, GenerationOrchestrator};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! config.validate()?;
//! let orchestrator = GenerationOrchestrator::from_config(&config)?;
//! for image in orchestrator.generate("a red bicycle").await? {
//!     println!("{} -> {}", image.alt, image.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
#[cfg(feature = "server")]
pub mod server;
pub mod synthesis;
pub mod upload;

pub use config::{Config, HostingConfig, SynthesisConfig};
pub use error::{GenerateImageError, Result, StudioError};
pub use models::{DisplayedImage, GeneratedImage, ImageGenerationRequest, ImagePayload};
pub use orchestrator::GenerationOrchestrator;
pub use synthesis::{ImageSynthesizer, NebiusImageClient};
pub use upload::{CloudinaryUploader, MediaUploader};
