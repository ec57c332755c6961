use thiserror::Error;

/// Message surfaced to callers whenever a generation request fails.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate or upload image. Please try again.";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Generation error: {0}")]
    GenerationError(String),
    #[error("Upload error: {0}")]
    UploadError(String),
}

/// The only failure the orchestrator exposes past its boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerateImageError {
    message: String,
}

impl GenerateImageError {
    pub fn generic() -> Self {
        Self {
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<StudioError> for GenerateImageError {
    fn from(_: StudioError) -> Self {
        Self::generic()
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_collapse_to_generic_message() {
        let upload: GenerateImageError = StudioError::UploadError("cdn down".into()).into();
        let generation: GenerateImageError =
            StudioError::GenerationError("no images".into()).into();

        assert_eq!(upload, generation);
        assert_eq!(upload.to_string(), GENERIC_FAILURE_MESSAGE);
        assert!(!upload.message().contains("cdn"));
    }

    #[test]
    fn test_studio_error_display() {
        let err = StudioError::ConfigError("CLOUD_NAME is required".into());
        assert_eq!(err.to_string(), "Configuration error: CLOUD_NAME is required");
    }
}
