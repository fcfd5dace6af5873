//! Rework an existing image.

use std::path::PathBuf;

use slidemint_common::config::AppConfig;
use slidemint_genai::GenerativeBackend;
use slidemint_project_model::image_data::ImageData;

use super::{ai_client, report_ai_error};

pub async fn run(
    config: &AppConfig,
    input: PathBuf,
    instruction: String,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let image = ImageData::from_file(&input)
        .map_err(|e| anyhow::anyhow!("Failed to read image: {e}"))?;
    let client = ai_client(config)?;

    println!("Editing {}: {instruction}", input.display());
    let edited = match client.edit_image(&image, &instruction).await {
        Ok(edited) => edited,
        Err(e) => {
            report_ai_error(&e);
            return Ok(());
        }
    };

    let output = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        input.with_file_name(format!("{stem}-edited.{}", edited.extension()))
    });
    std::fs::write(&output, edited.bytes())?;
    println!("Edited image written: {}", output.display());
    Ok(())
}
