use crate::models::{
    AspectRatio, CreateFunction, EditFunction, GenerationRequest, ImageAsset, Mode, OutputFormat,
};

/// Model used for create-mode synthesis.
pub const SYNTHESIS_MODEL: &str = "imagen-4.0-generate-001";
/// Model used for edit-mode multimodal transforms.
pub const EDIT_MODEL: &str = "gemini-2.5-flash-image";

/// Everything the builder needs to produce a request. The session validates
/// image presence before constructing this; the builder does not re-check.
#[derive(Debug, Clone)]
pub struct GenerateOptions<'a> {
    pub mode: Mode,
    pub create_function: CreateFunction,
    pub edit_function: EditFunction,
    pub instruction: &'a str,
    pub image1: Option<&'a ImageAsset>,
    pub image2: Option<&'a ImageAsset>,
}

/// Pure mapping from UI selections onto a fully-specified remote request.
/// Identical inputs always yield structurally identical requests.
pub fn build_request(options: &GenerateOptions) -> GenerationRequest {
    match options.mode {
        Mode::Create => build_create_request(options),
        Mode::Edit => build_edit_request(options),
    }
}

fn build_create_request(options: &GenerateOptions) -> GenerationRequest {
    let instruction = options.instruction;
    let (prompt, aspect_ratio) = match options.create_function {
        CreateFunction::Free => (instruction.to_string(), AspectRatio::Square),
        CreateFunction::Sticker => (
            format!(
                "A die-cut sticker of {}, vibrant colors, vector illustration, \
                 white background, high quality.",
                instruction
            ),
            AspectRatio::Square,
        ),
        CreateFunction::Logo => (
            format!(
                "A professional logo with the text \"{}\", modern, minimalist, \
                 vector, SVG, on a clean white background.",
                instruction
            ),
            AspectRatio::Square,
        ),
        CreateFunction::Comic => (
            format!(
                "A comic book panel illustration of {}, dynamic action, bold lines, \
                 vibrant colors, halftone dots, in the style of classic comics.",
                instruction
            ),
            AspectRatio::Square,
        ),
        CreateFunction::Thumbnail => (
            format!(
                "A compelling and clickable YouTube thumbnail for a video about \"{}\". \
                 Ensure the title text is prominent and easy to read. Use vibrant colors, \
                 high contrast, and engaging imagery.",
                instruction
            ),
            AspectRatio::Widescreen,
        ),
    };

    GenerationRequest {
        model_id: SYNTHESIS_MODEL.to_string(),
        prompt,
        aspect_ratio: Some(aspect_ratio),
        output_format: OutputFormat::Png,
        response_modalities: None,
        reference_images: Vec::new(),
    }
}

fn build_edit_request(options: &GenerateOptions) -> GenerationRequest {
    let instruction = options.instruction;
    let prompt = match options.edit_function {
        EditFunction::AddRemove => format!(
            "Edit this image by following this instruction: {}. For example, \
             \"add a hat on the person\" or \"remove the car\".",
            instruction
        ),
        EditFunction::Retouch => format!("Retouch and enhance this image. {}.", instruction),
        EditFunction::Style => format!(
            "Apply a new style to this image: {}. For example, \
             \"make it look like a watercolor painting\".",
            instruction
        ),
        EditFunction::Compose => format!(
            "Compose these two images together based on the following instruction: {}.",
            instruction
        ),
    };

    let mut reference_images = Vec::new();
    if let Some(image1) = options.image1 {
        reference_images.push(image1.clone());
    }
    if options.edit_function == EditFunction::Compose {
        if let Some(image2) = options.image2 {
            reference_images.push(image2.clone());
        }
    }

    GenerationRequest {
        model_id: EDIT_MODEL.to_string(),
        prompt,
        aspect_ratio: None,
        output_format: OutputFormat::Png,
        response_modalities: Some(vec!["IMAGE".to_string()]),
        reference_images,
    }
}
