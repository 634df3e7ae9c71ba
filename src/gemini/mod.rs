pub mod synthesize_client;
pub mod transform_client;

use async_trait::async_trait;

use crate::{
    config::GeminiConfig,
    error::{Result, StudioError, GENERATION_FAILED},
    models::{GenerationRequest, GenerationResponse, Mode},
};

pub use synthesize_client::SynthesizeClient;
pub use transform_client::TransformClient;

/// The seam the session drives: one call in, one normalized result out.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        mode: Mode,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse>;
}

/// Facade over the two Gemini endpoints. Holds the credential for its whole
/// lifetime; construction fails before any network call when it is missing.
#[derive(Clone)]
pub struct GeminiClient {
    synthesize_client: SynthesizeClient,
    transform_client: TransformClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            StudioError::ConfigError(
                "API key is not configured. Please set the GEMINI_API_KEY environment variable."
                    .into(),
            )
        })?;
        let api_base = config.api_base().to_string();
        let http = reqwest::Client::new();

        Ok(Self {
            synthesize_client: SynthesizeClient::new(
                http.clone(),
                api_key.clone(),
                api_base.clone(),
            ),
            transform_client: TransformClient::new(http, api_key, api_base),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn synthesize(&self) -> &SynthesizeClient {
        &self.synthesize_client
    }

    pub fn transform(&self) -> &TransformClient {
        &self.transform_client
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        mode: Mode,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        let outcome = match mode {
            Mode::Create => self.synthesize_client.generate(request).await,
            Mode::Edit => self.transform_client.generate(request).await,
        };

        outcome.map_err(normalize_remote_error)
    }
}

/// Collapses provider-specific failures to the single generic message after
/// logging the cause. Only the two empty-result errors (signaled as
/// `ResponseError` by the sub-clients) keep their specific text.
fn normalize_remote_error(error: StudioError) -> StudioError {
    match error {
        StudioError::ResponseError(_) => error,
        other => {
            log::error!("Gemini API call failed: {}", other);
            StudioError::GenerationError(GENERATION_FAILED.into())
        }
    }
}
