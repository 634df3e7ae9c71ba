use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StudioError},
    models::{GenerationRequest, GenerationResponse},
};

/// Client for the image-synthesis (`:predict`) endpoint. Used for Create
/// mode: prompt plus aspect ratio in, exactly one image out.
#[derive(Clone)]
pub struct SynthesizeClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl SynthesizeClient {
    pub fn new(http: reqwest::Client, api_key: String, api_base: String) -> Self {
        Self {
            http,
            api_key,
            api_base,
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let payload = PredictRequest::from_generation_request(request);
        let url = format!("{}/models/{}:predict", self.api_base, request.model_id);

        log::info!("Synthesizing image with model: {}", request.model_id);
        log::debug!(
            "Synthesis parameters: aspect ratio {}, format {}",
            payload.parameters.aspect_ratio,
            payload.parameters.output_mime_type
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StudioError::RequestError(format!(
                "Synthesis endpoint returned HTTP {}: {}",
                status, body
            )));
        }

        // A body that fails to decode is a malformed response, not one of
        // the empty-result cases; it must collapse to the generic message.
        let predict_response: PredictResponse = response
            .json()
            .await
            .map_err(|e| StudioError::SerializationError(e.to_string()))?;

        let image_data = predict_response
            .predictions
            .into_iter()
            .find_map(|p| p.into_image_data())
            .ok_or_else(|| {
                StudioError::ResponseError("Image generation failed, no images returned.".into())
            })?;

        Ok(GenerationResponse {
            image_data,
            model: request.model_id.clone(),
        })
    }
}

// Wire types for the :predict endpoint.
#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: String,
    output_mime_type: String,
}

impl PredictRequest {
    fn from_generation_request(request: &GenerationRequest) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: request.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: request
                    .aspect_ratio
                    .map(|r| r.as_str())
                    .unwrap_or("1:1")
                    .to_string(),
                output_mime_type: request.output_format.mime_type().to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

/// The endpoint returns either a flat `bytesBase64Encoded` field or the
/// payload nested under `image.imageBytes`, depending on model generation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    image: Option<PredictionImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictionImage {
    #[serde(default)]
    image_bytes: Option<String>,
}

impl Prediction {
    fn into_image_data(self) -> Option<String> {
        self.bytes_base64_encoded
            .or_else(|| self.image.and_then(|i| i.image_bytes))
    }
}
