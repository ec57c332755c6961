use crate::error::{Result, StudioError};
use std::env;
use std::time::Duration;

pub const DEFAULT_SYNTHESIS_BASE_URL: &str = "https://api.studio.nebius.com/v1/";
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/flux-schnell";
pub const DEFAULT_HOSTING_API_BASE: &str = "https://api.cloudinary.com";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct HostingConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub request_timeout: Option<Duration>,
    pub synthesis: SynthesisConfig,
    pub hosting: HostingConfig,
    /// Raw `PORT` value that could not be parsed; reported by `validate`.
    invalid_port: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            api_key: None,
            base_url: DEFAULT_SYNTHESIS_BASE_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl SynthesisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        SynthesisConfig {
            api_key: non_empty(lookup("NEBIUS_API_KEY")),
            base_url: non_empty(lookup("NEBIUS_BASE_URL")).unwrap_or(defaults.base_url),
            model: non_empty(lookup("IMAGE_MODEL")).unwrap_or(defaults.model),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generation endpoint, tolerant of a trailing slash on the base URL.
    pub fn generations_url(&self) -> String {
        format!("{}/images/generations", self.base_url.trim_end_matches('/'))
    }
}

impl Default for HostingConfig {
    fn default() -> Self {
        HostingConfig {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            api_base: DEFAULT_HOSTING_API_BASE.to_string(),
        }
    }
}

impl HostingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        HostingConfig {
            cloud_name: non_empty(lookup("CLOUD_NAME")),
            api_key: non_empty(lookup("API_KEY")),
            api_secret: non_empty(lookup("API_SECRET")),
            api_base: non_empty(lookup("CLOUDINARY_API_BASE"))
                .unwrap_or_else(|| DEFAULT_HOSTING_API_BASE.to_string()),
        }
    }

    pub fn with_cloud_name(mut self, cloud_name: impl Into<String>) -> Self {
        self.cloud_name = Some(cloud_name.into());
        self
    }

    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            request_timeout: None,
            synthesis: SynthesisConfig::default(),
            hosting: HostingConfig::default(),
            invalid_port: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let raw_port = non_empty(lookup("PORT"));
        let port = raw_port.as_deref().and_then(|port| port.trim().parse::<u16>().ok());
        let invalid_port = match (&raw_port, port) {
            (Some(raw), None) => {
                log::warn!("Ignoring unparseable PORT value {:?}", raw);
                Some(raw.clone())
            }
            _ => None,
        };
        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|secs| secs.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Config {
            port,
            request_timeout,
            synthesis: SynthesisConfig::from_lookup(&lookup),
            hosting: HostingConfig::from_lookup(&lookup),
            invalid_port,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self.invalid_port = None;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_synthesis(mut self, config: SynthesisConfig) -> Self {
        self.synthesis = config;
        self
    }

    pub fn with_hosting(mut self, config: HostingConfig) -> Self {
        self.hosting = config;
        self
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Reports every missing credential and malformed setting at once so a
    /// misconfigured deployment fails with one readable message.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.synthesis.api_key.is_none() {
            missing.push("NEBIUS_API_KEY");
        }
        if self.hosting.cloud_name.is_none() {
            missing.push("CLOUD_NAME");
        }
        if self.hosting.api_key.is_none() {
            missing.push("API_KEY");
        }
        if self.hosting.api_secret.is_none() {
            missing.push("API_SECRET");
        }

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(format!("missing required settings: {}", missing.join(", ")));
        }
        if let Some(raw) = &self.invalid_port {
            problems.push(format!("PORT must be a number between 0 and 65535, got {:?}", raw));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(StudioError::ConfigError(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_all_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("CLOUD_NAME", "demo"),
            ("API_KEY", "123"),
            ("API_SECRET", "shh"),
            ("NEBIUS_API_KEY", "nb-key"),
            ("NEBIUS_BASE_URL", "http://localhost:9000/v1"),
            ("PORT", "3000"),
            ("REQUEST_TIMEOUT_SECS", "30"),
        ]));

        assert_eq!(config.hosting.cloud_name.as_deref(), Some("demo"));
        assert_eq!(config.hosting.api_key.as_deref(), Some("123"));
        assert_eq!(config.hosting.api_secret.as_deref(), Some("shh"));
        assert_eq!(config.synthesis.api_key.as_deref(), Some("nb-key"));
        assert_eq!(config.synthesis.base_url, "http://localhost:9000/v1");
        assert_eq!(config.synthesis.model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.port_or_default(), 3000);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "0")]));

        assert_eq!(config.synthesis.base_url, DEFAULT_SYNTHESIS_BASE_URL);
        assert_eq!(config.hosting.api_base, DEFAULT_HOSTING_API_BASE);
        assert_eq!(config.port_or_default(), DEFAULT_PORT);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_validate_lists_missing_credentials() {
        // Blank values count as missing.
        let config = Config::from_lookup(lookup_from(&[
            ("CLOUD_NAME", "demo"),
            ("NEBIUS_API_KEY", "  "),
        ]));

        let err = config.validate().unwrap_err();

        let message = err.to_string();
        assert!(message.contains("NEBIUS_API_KEY"));
        assert!(message.contains("API_KEY"));
        assert!(message.contains("API_SECRET"));
        assert!(!message.contains("CLOUD_NAME"));
    }

    #[test]
    fn test_unparseable_port_is_reported() {
        let config = Config::from_lookup(lookup_from(&[
            ("CLOUD_NAME", "demo"),
            ("API_KEY", "123"),
            ("API_SECRET", "shh"),
            ("NEBIUS_API_KEY", "nb-key"),
            ("PORT", "abc"),
        ]));

        assert!(config.port.is_none());
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("PORT"));
        assert!(message.contains("abc"));
        assert!(!message.contains("missing"));

        assert!(config.with_port(9090).validate().is_ok());
    }

    #[test]
    fn test_generations_url_handles_trailing_slash() {
        let with_slash = SynthesisConfig::new().with_base_url("https://api.example.com/v1/");
        let without_slash = SynthesisConfig::new().with_base_url("https://api.example.com/v1");

        assert_eq!(
            with_slash.generations_url(),
            "https://api.example.com/v1/images/generations"
        );
        assert_eq!(with_slash.generations_url(), without_slash.generations_url());
    }
}
