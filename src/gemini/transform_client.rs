use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StudioError},
    models::{GenerationRequest, GenerationResponse},
};

/// Client for the multimodal content-generation (`:generateContent`)
/// endpoint. Used for Edit mode: reference images as inline parts followed
/// by the instruction text, image modality requested back.
#[derive(Clone)]
pub struct TransformClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl TransformClient {
    pub fn new(http: reqwest::Client, api_key: String, api_base: String) -> Self {
        Self {
            http,
            api_key,
            api_base,
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let payload = TransformRequest::from_generation_request(request);
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base, request.model_id
        );

        log::info!(
            "Transforming {} reference image(s) with model: {}",
            request.reference_images.len(),
            request.model_id
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
                "Transform endpoint returned HTTP {}: {}",
                status, body
            )));
        }

        // A body that fails to decode is a malformed response, not one of
        // the empty-result cases; it must collapse to the generic message.
        let transform_response: TransformResponse = response
            .json()
            .await
            .map_err(|e| StudioError::SerializationError(e.to_string()))?;

        // First inline-image part of the first candidate is the result.
        let image_data = transform_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().find_map(|p| p.inline_data))
            .map(|inline| inline.data)
            .ok_or_else(|| {
                StudioError::ResponseError(
                    "Image editing failed, no image data in response.".into(),
                )
            })?;

        Ok(GenerationResponse {
            image_data,
            model: request.model_id.clone(),
        })
    }
}

// Wire types for the :generateContent endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

impl TransformRequest {
    fn from_generation_request(request: &GenerationRequest) -> Self {
        let mut parts: Vec<RequestPart> = request
            .reference_images
            .iter()
            .map(|image| RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: request.output_format.mime_type().to_string(),
                    data: image.base64_data.clone(),
                },
            })
            .collect();
        parts.push(RequestPart::Text {
            text: request.prompt.clone(),
        });

        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: request
                    .response_modalities
                    .clone()
                    .unwrap_or_else(|| vec!["IMAGE".to_string()]),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TransformResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}
