use serde::{Deserialize, Serialize};

/// Error envelope shared by both providers: `{"error": {"message": "..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorResponse {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorDetail {
    pub message: String,
}

impl ProviderErrorResponse {
    /// Pulls the provider message out of an error body, falling back to the raw text.
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<ProviderErrorResponse>(body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body.trim().to_string(),
        }
    }
}
