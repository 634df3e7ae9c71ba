use std::env;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini API. The key is injected here and
/// checked once at client construction, never looked up at call time.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `GEMINI_API_KEY` (falling back to `GOOGLE_API_KEY`) and an
    /// optional `GEMINI_API_BASE` override.
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok();
        let api_base = env::var("GEMINI_API_BASE").ok();

        GeminiConfig { api_key, api_base }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let config = GeminiConfig::new()
            .with_api_key("test-key")
            .with_api_base("http://localhost:9090/v1beta");
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.api_base(), "http://localhost:9090/v1beta");
    }

    #[test]
    fn test_default_api_base() {
        let config = GeminiConfig::new();
        assert!(config.api_key.is_none());
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
    }
}
