use nanostudio::{
    CreateFunction, EditFunction, GeminiClient, GeminiConfig, ImageSlot, Mode, StudioSession,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file first
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    nanostudio::logger::init_with_config(
        nanostudio::logger::LoggerConfig::development()
            .with_level(nanostudio::logger::LogLevel::Debug),
    )?;

    log::info!("🔍 Checking Gemini environment...");

    // Check the credential (without printing the actual value for security)
    match env::var("GEMINI_API_KEY").or_else(|_| env::var("GOOGLE_API_KEY")) {
        Ok(api_key) => {
            log::info!("✅ Gemini API key found in environment");
            log::debug!(
                "API key starts with: {}...",
                &api_key[..5.min(api_key.len())]
            );
        }
        Err(_) => {
            log::error!("❌ No GEMINI_API_KEY or GOOGLE_API_KEY in environment");
            log::error!("❌ Client construction will fail below");
        }
    }

    log::info!("🔄 Creating Gemini client...");
    let client = match GeminiClient::new(GeminiConfig::from_env()) {
        Ok(client) => {
            log::info!("✅ Gemini client initialized successfully");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Gemini client: {}", e);
            return Err(e.into());
        }
    };

    let mut session = StudioSession::new();

    // Test 1: Create mode, sticker function
    log::info!("🎨 Testing create mode with the sticker function...");
    session.select_create_function(CreateFunction::Sticker);
    session.set_instruction("a red fox");

    let generate_timer = nanostudio::logger::timer("create/sticker");
    session.generate(&client).await;
    drop(generate_timer);

    match (&session.result, &session.error) {
        (Some(result), _) => {
            log::info!("✅ Image generation successful!");
            log::info!("🤖 Model used: {}", result.model);
            log::info!("📏 Image data length: {} characters", result.image_data.len());

            match session.download_result(".") {
                Ok(path) => log::info!("💾 Image saved to: {}", path.display()),
                Err(e) => log::error!("❌ Failed to save image: {}", e),
            }
        }
        (None, Some(error)) => {
            log::error!("❌ Image generation failed: {}", error);
            log::warn!("💡 Check that your API key has access to the Imagen models");
        }
        (None, None) => log::warn!("⚠️  Generate finished with neither result nor error"),
    }

    // Test 2: Continue editing the result with a retouch instruction
    if session.result.is_some() {
        log::info!("✏️  Testing continue-editing with the retouch function...");
        session.continue_editing();
        session.select_edit_function(EditFunction::Retouch);
        session.set_instruction("make the colors warmer");

        session.generate(&client).await;

        match (&session.result, &session.error) {
            (Some(result), _) => {
                log::info!("✅ Image edit successful!");
                log::info!("📏 Image data length: {} characters", result.image_data.len());
                match session.download_result(".") {
                    Ok(path) => log::info!("💾 Edited image saved to: {}", path.display()),
                    Err(e) => log::error!("❌ Failed to save image: {}", e),
                }
            }
            (None, Some(error)) => log::error!("❌ Image edit failed: {}", error),
            (None, None) => log::warn!("⚠️  Generate finished with neither result nor error"),
        }
    }

    // Test 3: Edit mode with a local file, if one was provided
    if let Ok(path) = env::var("STUDIO_TEST_IMAGE") {
        log::info!("🖼️  Testing edit mode with local image: {}", path);
        session.start_new();
        session.switch_mode(Mode::Edit);

        match session.upload_image(ImageSlot::First, &path).await {
            Ok(_) => {
                session.select_edit_function(EditFunction::Style);
                session.set_instruction("make it look like a watercolor painting");
                session.generate(&client).await;

                match (&session.result, &session.error) {
                    (Some(_), _) => {
                        log::info!("✅ Style edit successful!");
                        if let Ok(saved) = session.download_result(".") {
                            log::info!("💾 Styled image saved to: {}", saved.display());
                        }
                    }
                    (None, Some(error)) => log::error!("❌ Style edit failed: {}", error),
                    (None, None) => {}
                }
            }
            Err(e) => log::error!("❌ Failed to read test image: {}", e),
        }
    } else {
        log::info!("💡 Set STUDIO_TEST_IMAGE to also exercise edit mode with a local file");
    }

    log::info!("🎉 All tests completed!");
    log::info!("💡 Check the generated image files in the current directory");

    Ok(())
}
