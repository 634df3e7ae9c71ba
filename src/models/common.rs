use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::encode::strip_data_url_prefix;
use crate::error::{Result, StudioError};

/// Top-level choice between synthesizing a new image and editing existing
/// image(s). Determines which sub-function set and validation rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Create,
    Edit,
}

/// Sub-function for Create mode. Each variant maps to a prompt template and
/// an aspect ratio in the request builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateFunction {
    #[default]
    Free,
    Sticker,
    Logo,
    Comic,
    Thumbnail,
}

/// Sub-function for Edit mode. Compose is the only one that takes a second
/// reference image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditFunction {
    #[default]
    AddRemove,
    Retouch,
    Style,
    Compose,
}

impl EditFunction {
    /// Number of reference images this function requires.
    pub fn required_images(&self) -> usize {
        match self {
            EditFunction::Compose => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "3:4")]
    ClassicPortrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Tall => "9:16",
            AspectRatio::Classic => "4:3",
            AspectRatio::ClassicPortrait => "3:4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// A user-supplied image: base64 payload plus display name. Immutable once
/// created; a re-upload replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub base64_data: String,
    pub name: String,
}

impl ImageAsset {
    /// Payloads arriving as `data:` URLs (e.g. a demoted generation result
    /// rendered by a front-end) are stored with the prefix stripped.
    pub fn new(base64_data: impl Into<String>, name: impl Into<String>) -> Self {
        let raw = base64_data.into();
        let base64_data = match strip_data_url_prefix(&raw) {
            stripped if stripped.len() == raw.len() => raw,
            stripped => stripped.to_string(),
        };
        Self {
            base64_data,
            name: name.into(),
        }
    }

    pub fn from_bytes(bytes: &[u8], name: impl Into<String>) -> Self {
        Self {
            base64_data: BASE64.encode(bytes),
            name: name.into(),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.base64_data)
            .map_err(|e| StudioError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_images() {
        assert_eq!(EditFunction::AddRemove.required_images(), 1);
        assert_eq!(EditFunction::Retouch.required_images(), 1);
        assert_eq!(EditFunction::Style.required_images(), 1);
        assert_eq!(EditFunction::Compose.required_images(), 2);
    }

    #[test]
    fn test_aspect_ratio_as_str() {
        assert_eq!(AspectRatio::Square.as_str(), "1:1");
        assert_eq!(AspectRatio::Widescreen.as_str(), "16:9");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Mode::default(), Mode::Create);
        assert_eq!(CreateFunction::default(), CreateFunction::Free);
        assert_eq!(EditFunction::default(), EditFunction::AddRemove);
    }

    #[test]
    fn test_new_strips_data_url_prefix() {
        let asset = ImageAsset::new("data:image/png;base64,iVBORw0KGgo=", "result.png");
        assert_eq!(asset.base64_data, "iVBORw0KGgo=");

        let asset = ImageAsset::new("iVBORw0KGgo=", "bare.png");
        assert_eq!(asset.base64_data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_asset_bytes_round_trip() {
        let bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
        let asset = ImageAsset::from_bytes(&bytes, "fox.png");
        assert_eq!(asset.name, "fox.png");
        assert_eq!(asset.decode().unwrap(), bytes);
    }
}
