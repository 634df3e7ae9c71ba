use std::path::{Path, PathBuf};

use crate::{
    encode::encode_image_file,
    error::{Result, StudioError},
    gemini::GenerationBackend,
    models::{
        CreateFunction, EditFunction, GenerationRequest, GenerationResponse, ImageAsset, Mode,
    },
    request_builder::{build_request, GenerateOptions},
};

/// Which of the two reference-image slots an upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    First,
    Second,
}

/// Ticket identifying one generate attempt. Outcomes carrying a ticket that
/// no longer matches the session are discarded instead of applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// Holds the current selections, uploaded images, and result/error/loading
/// state, and orchestrates the request builder and the remote backend. One
/// generate may be in flight at a time; `is_loading` is the guard.
#[derive(Debug, Default)]
pub struct StudioSession {
    pub instruction: String,
    pub mode: Mode,
    pub create_function: CreateFunction,
    pub edit_function: EditFunction,
    pub two_image_section_visible: bool,
    pub image1: Option<ImageAsset>,
    pub image2: Option<ImageAsset>,
    pub result: Option<GenerationResponse>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub mobile_result_visible: bool,
    narrow_viewport: bool,
    generation: u64,
}

impl StudioSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tells the session whether the viewport is narrow; controls whether a
    /// successful generate opens the mobile result view.
    pub fn set_narrow_viewport(&mut self, narrow: bool) {
        self.narrow_viewport = narrow;
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.result = None;
        self.two_image_section_visible = false;
        self.image1 = None;
        self.image2 = None;
        self.fence_outstanding();
    }

    pub fn select_create_function(&mut self, function: CreateFunction) {
        self.create_function = function;
    }

    pub fn select_edit_function(&mut self, function: EditFunction) {
        self.edit_function = function;
        self.two_image_section_visible = function == EditFunction::Compose;
    }

    /// Encodes the file and replaces the slot wholesale.
    pub async fn upload_image(&mut self, slot: ImageSlot, path: impl AsRef<Path>) -> Result<()> {
        let asset = encode_image_file(path).await?;
        self.attach_image(slot, asset);
        Ok(())
    }

    /// Sync variant for payloads that are already encoded.
    pub fn attach_image(&mut self, slot: ImageSlot, asset: ImageAsset) {
        match slot {
            ImageSlot::First => self.image1 = Some(asset),
            ImageSlot::Second => self.image2 = Some(asset),
        }
    }

    /// Validates, flips into the loading state, and hands back the built
    /// request plus a ticket for `complete_generate`. Validation failures
    /// set `error` and abort with no request built.
    pub fn begin_generate(&mut self) -> Result<(GenerationRequest, GenerationTicket)> {
        if self.is_loading {
            return Err(StudioError::ValidationError(
                "A generation is already in flight.".into(),
            ));
        }

        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.is_loading = true;
        self.error = None;
        self.result = None;
        self.generation += 1;

        let request = build_request(&GenerateOptions {
            mode: self.mode,
            create_function: self.create_function,
            edit_function: self.edit_function,
            instruction: &self.instruction,
            image1: self.image1.as_ref(),
            image2: self.image2.as_ref(),
        });

        Ok((request, GenerationTicket(self.generation)))
    }

    /// Applies the outcome of a generate attempt. Outcomes whose ticket was
    /// fenced off by `switch_mode`/`start_new` in the meantime are dropped.
    pub fn complete_generate(
        &mut self,
        ticket: GenerationTicket,
        outcome: Result<GenerationResponse>,
    ) {
        if ticket.0 != self.generation {
            log::warn!("Discarding stale generation result (ticket {})", ticket.0);
            return;
        }

        self.is_loading = false;
        match outcome {
            Ok(response) => {
                self.result = Some(response);
                if self.narrow_viewport {
                    self.mobile_result_visible = true;
                }
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }

    /// One-shot generate: validate, call the backend, apply the outcome.
    /// The end state is readable from `result`/`error`/`is_loading`.
    pub async fn generate<B: GenerationBackend>(&mut self, backend: &B) {
        let (request, ticket) = match self.begin_generate() {
            Ok(pair) => pair,
            Err(_) => return, // error already recorded
        };
        let mode = self.mode;
        let outcome = backend.generate(mode, &request).await;
        self.complete_generate(ticket, outcome);
    }

    /// Demotes the current result to the first reference image and switches
    /// into Edit mode for a follow-up instruction.
    pub fn continue_editing(&mut self) {
        let Some(result) = self.result.take() else {
            return;
        };
        self.image1 = Some(ImageAsset::new(result.image_data, "generated_image.png"));
        self.image2 = None;
        self.mode = Mode::Edit;
        self.edit_function = EditFunction::AddRemove;
        self.two_image_section_visible = false;
        self.instruction.clear();
        self.mobile_result_visible = false;
    }

    pub fn start_new(&mut self) {
        self.result = None;
        self.instruction.clear();
        self.image1 = None;
        self.image2 = None;
        self.mode = Mode::Create;
        self.mobile_result_visible = false;
        self.fence_outstanding();
    }

    /// Writes the current result into `dir` under a timestamped filename.
    pub fn download_result(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let result = self.result.as_ref().ok_or_else(|| {
            StudioError::ValidationError("No generated image to download.".into())
        })?;
        result.save_to(dir)
    }

    fn validate(&self) -> Result<()> {
        match self.mode {
            Mode::Create => {
                if self.instruction.trim().is_empty() {
                    return Err(StudioError::ValidationError(
                        "Please enter an idea for the image.".into(),
                    ));
                }
            }
            Mode::Edit => {
                if self.image1.is_none() {
                    return Err(StudioError::ValidationError(
                        "Please upload an image to edit.".into(),
                    ));
                }
                if self.edit_function == EditFunction::Compose && self.image2.is_none() {
                    return Err(StudioError::ValidationError(
                        "Two images are required for the compose function.".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Bumps the generation counter so an outstanding call completes into
    /// the void, and releases the loading guard it was holding.
    fn fence_outstanding(&mut self) {
        self.generation += 1;
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERATION_FAILED;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend double that counts calls and returns a canned outcome.
    struct MockBackend {
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl MockBackend {
        fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(message.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for MockBackend {
        async fn generate(
            &self,
            _mode: Mode,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(message) => Err(StudioError::ResponseError(message.clone())),
                None => Ok(GenerationResponse {
                    image_data: "aVZCT1J3".to_string(),
                    model: request.model_id.clone(),
                }),
            }
        }
    }

    fn edit_session_with_one_image() -> StudioSession {
        let mut session = StudioSession::new();
        session.switch_mode(Mode::Edit);
        session.attach_image(ImageSlot::First, ImageAsset::new("Zmlyc3Q=", "first.png"));
        session.set_instruction("brighten the sky");
        session
    }

    #[tokio::test]
    async fn test_create_with_empty_instruction_makes_no_call() {
        let backend = MockBackend::succeeding();
        let mut session = StudioSession::new();

        session.generate(&backend).await;

        assert_eq!(backend.call_count(), 0);
        assert!(session.error.is_some());
        assert!(!session.is_loading);
        assert!(session.result.is_none());
    }

    #[tokio::test]
    async fn test_compose_without_second_image_makes_no_call() {
        let backend = MockBackend::succeeding();
        let mut session = edit_session_with_one_image();
        session.select_edit_function(EditFunction::Compose);

        session.generate(&backend).await;

        assert_eq!(backend.call_count(), 0);
        assert_eq!(
            session.error.as_deref(),
            Some("Validation error: Two images are required for the compose function.")
        );
        assert!(session.result.is_none());
    }

    #[tokio::test]
    async fn test_empty_remote_result_sets_error_and_clears_loading() {
        let backend = MockBackend::failing("Image generation failed, no images returned.");
        let mut session = StudioSession::new();
        session.set_instruction("a red fox");

        session.generate(&backend).await;

        assert_eq!(backend.call_count(), 1);
        assert!(!session.is_loading);
        assert!(session.result.is_none());
        assert_eq!(
            session.error.as_deref(),
            Some("Response error: Image generation failed, no images returned.")
        );
    }

    #[tokio::test]
    async fn test_successful_edit_applies_result() {
        let backend = MockBackend::succeeding();
        let mut session = edit_session_with_one_image();

        session.generate(&backend).await;

        assert_eq!(backend.call_count(), 1);
        assert!(!session.is_loading);
        assert!(session.error.is_none());
        assert_eq!(
            session.result.as_ref().map(|r| r.image_data.as_str()),
            Some("aVZCT1J3")
        );
        // Wide viewport: the mobile result view stays closed.
        assert!(!session.mobile_result_visible);
    }

    #[tokio::test]
    async fn test_mobile_view_opens_only_on_narrow_viewport() {
        let backend = MockBackend::succeeding();
        let mut session = edit_session_with_one_image();
        session.set_narrow_viewport(true);

        session.generate(&backend).await;

        assert!(session.mobile_result_visible);
    }

    #[tokio::test]
    async fn test_failure_leaves_inputs_intact_for_retry() {
        let backend = MockBackend::failing("Image editing failed, no image data in response.");
        let mut session = edit_session_with_one_image();

        session.generate(&backend).await;

        assert!(session.image1.is_some());
        assert_eq!(session.instruction, "brighten the sky");

        // Retry after the remote recovers.
        let backend = MockBackend::succeeding();
        session.generate(&backend).await;
        assert!(session.result.is_some());
        assert!(session.error.is_none());
    }

    #[test]
    fn test_stale_result_is_discarded_after_start_new() {
        let mut session = StudioSession::new();
        session.set_instruction("a red fox");
        let (_, ticket) = session.begin_generate().unwrap();

        session.start_new();

        session.complete_generate(
            ticket,
            Ok(GenerationResponse {
                image_data: "aVZCT1J3".to_string(),
                model: "imagen-4.0-generate-001".to_string(),
            }),
        );
        assert!(session.result.is_none());
        assert!(session.error.is_none());
        assert!(!session.is_loading);
    }

    #[test]
    fn test_second_generate_while_loading_is_rejected() {
        let mut session = StudioSession::new();
        session.set_instruction("a red fox");
        let _pending = session.begin_generate().unwrap();

        let err = session.begin_generate().unwrap_err();
        assert!(err.is_validation());
        assert!(session.is_loading);
    }

    #[test]
    fn test_generic_failure_surfaces_single_message() {
        let mut session = StudioSession::new();
        session.set_instruction("a red fox");
        let (_, ticket) = session.begin_generate().unwrap();

        session.complete_generate(
            ticket,
            Err(StudioError::GenerationError(GENERATION_FAILED.into())),
        );
        assert_eq!(session.error.as_deref(), Some("Failed to generate image"));
    }

    #[test]
    fn test_switch_mode_resets_images_but_keeps_instruction() {
        let mut session = edit_session_with_one_image();
        session.attach_image(ImageSlot::Second, ImageAsset::new("c2Vjb25k", "second.png"));
        session.select_edit_function(EditFunction::Compose);

        session.switch_mode(Mode::Create);

        assert!(session.image1.is_none());
        assert!(session.image2.is_none());
        assert!(!session.two_image_section_visible);
        assert_eq!(session.instruction, "brighten the sky");
    }

    #[test]
    fn test_select_edit_function_toggles_two_image_section() {
        let mut session = StudioSession::new();
        session.select_edit_function(EditFunction::Compose);
        assert!(session.two_image_section_visible);
        session.select_edit_function(EditFunction::Style);
        assert!(!session.two_image_section_visible);
    }

    #[test]
    fn test_continue_editing_demotes_result() {
        let mut session = StudioSession::new();
        session.set_instruction("a red fox");
        session.mobile_result_visible = true;
        session.result = Some(GenerationResponse {
            image_data: "aVZCT1J3".to_string(),
            model: "imagen-4.0-generate-001".to_string(),
        });

        session.continue_editing();

        assert!(session.result.is_none());
        assert_eq!(session.mode, Mode::Edit);
        assert_eq!(session.edit_function, EditFunction::AddRemove);
        assert_eq!(
            session.image1.as_ref().map(|i| i.name.as_str()),
            Some("generated_image.png")
        );
        assert_eq!(
            session.image1.as_ref().map(|i| i.base64_data.as_str()),
            Some("aVZCT1J3")
        );
        assert!(session.instruction.is_empty());
        assert!(!session.mobile_result_visible);
    }

    #[test]
    fn test_continue_editing_without_result_is_noop() {
        let mut session = StudioSession::new();
        session.set_instruction("a red fox");
        session.continue_editing();
        assert_eq!(session.mode, Mode::Create);
        assert_eq!(session.instruction, "a red fox");
    }

    #[test]
    fn test_upload_replaces_slot_wholesale() {
        let mut session = StudioSession::new();
        session.attach_image(ImageSlot::First, ImageAsset::new("b2xk", "old.png"));
        session.attach_image(ImageSlot::First, ImageAsset::new("bmV3", "new.png"));
        assert_eq!(
            session.image1.as_ref().map(|i| i.name.as_str()),
            Some("new.png")
        );
    }

    #[test]
    fn test_download_without_result_is_validation_error() {
        let session = StudioSession::new();
        let err = session.download_result(std::env::temp_dir()).unwrap_err();
        assert!(err.is_validation());
    }
}
