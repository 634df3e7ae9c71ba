use std::path::Path;

use crate::error::Result;
use crate::models::ImageAsset;

/// Reads a file and turns it into a base64 payload plus display name. No
/// size or type checks here; the remote service performs its own validation.
pub async fn encode_image_file(path: impl AsRef<Path>) -> Result<ImageAsset> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    log::debug!("Encoded {} ({} bytes)", name, bytes.len());
    Ok(ImageAsset::from_bytes(&bytes, name))
}

/// Strips a `data:<mime>;base64,` prefix if one is present. Payloads that
/// are already bare base64 pass through unchanged.
pub fn strip_data_url_prefix(payload: &str) -> &str {
    match payload.split_once("base64,") {
        Some((head, data)) if head.starts_with("data:") => data,
        _ => payload,
    }
}
