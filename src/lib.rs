//! NanoStudio - Rust clients for Google's generative image API.
//!
//! Create mode maps a handful of studio functions (sticker, logo, comic,
//! thumbnail, free prompt) onto the image-synthesis endpoint; Edit mode maps
//! add/remove, retouch, style, and compose onto the multimodal endpoint with
//! inline reference images. [`StudioSession`] ties it all together as the
//! state machine a front-end drives.

pub mod config;
pub mod encode;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod request_builder;
pub mod session;

pub use config::GeminiConfig;
pub use encode::{encode_image_file, strip_data_url_prefix};
pub use error::{Result, StudioError};
pub use gemini::{GeminiClient, GenerationBackend, SynthesizeClient, TransformClient};
pub use models::{
    AspectRatio, CreateFunction, EditFunction, GenerationRequest, GenerationResponse, ImageAsset,
    Mode, OutputFormat,
};
pub use request_builder::{build_request, GenerateOptions, EDIT_MODEL, SYNTHESIS_MODEL};
pub use session::{ImageSlot, StudioSession};
