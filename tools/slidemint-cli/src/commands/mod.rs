pub mod check;
pub mod deck;
pub mod draft;
pub mod edit_image;
pub mod export;
pub mod key;
pub mod profile;

use slidemint_common::config::AppConfig;
use slidemint_common::credentials::CredentialStore;
use slidemint_genai::{AiConfig, AiError, GeminiClient};

/// Build the AI client from config plus the stored credential.
pub fn ai_client(config: &AppConfig) -> anyhow::Result<GeminiClient> {
    let key = CredentialStore::standard()
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to read API key: {e}"))?;
    if key.is_none() {
        anyhow::bail!("{}\nRun `slidemint key set <KEY>` first.", AiError::MissingCredential);
    }
    let client = GeminiClient::new(AiConfig::from_settings(&config.ai, key))?;
    Ok(client)
}

/// Print an AI failure the way the user should see it.
pub fn report_ai_error(err: &AiError) {
    let category = err.category();
    println!("Error: {}", err.user_message());
    if let Some(link) = category.help_link() {
        println!("  See: {link}");
    }
    if category.requires_credential_prompt() {
        println!("  Update the key with `slidemint key set <KEY>`.");
    }
}

/// Convert a 1-based slide number to an index.
pub fn slide_index(slide: usize, len: usize) -> anyhow::Result<usize> {
    if slide == 0 || slide > len {
        anyhow::bail!("Slide {slide} does not exist (deck has {len} slides)");
    }
    Ok(slide - 1)
}
