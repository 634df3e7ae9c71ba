use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};
use crate::models::{AspectRatio, ImageAsset, OutputFormat};

/// A fully-specified remote request, built fresh per invocation by the
/// request builder and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model_id: String,
    pub prompt: String,
    pub aspect_ratio: Option<AspectRatio>,
    pub output_format: OutputFormat,
    /// Modalities requested from the multimodal endpoint; only set for edits.
    pub response_modalities: Option<Vec<String>>,
    /// Reference images in upload order, 0 for create, 1 or 2 for edit.
    pub reference_images: Vec<ImageAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub image_data: String, // Base64 encoded
    pub model: String,
}

impl GenerationResponse {
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.image_data)
            .map_err(|e| StudioError::SerializationError(e.to_string()))
    }

    /// Writes the decoded image into `dir` under a timestamped name.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let filename = format!("studio_{}.png", chrono::Utc::now().timestamp_millis());
        let path = dir.as_ref().join(filename);
        std::fs::write(&path, self.decode()?)?;
        Ok(path)
    }
}
