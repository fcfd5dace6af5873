//! Slide image generation and editing prompts.

use slidemint_project_model::image_data::ImageData;

use crate::error::AiError;
use crate::protocol::{GenerateContentRequest, GenerateContentResponse, Part};

/// Style suffix appended to every generation prompt.
pub const HOUSE_STYLE: &str = "Professional high-end LinkedIn carousel slide, cinematic lighting, corporate-tech aesthetic, clean composition, 1:1 aspect ratio, centered legible text.";

pub fn generation_prompt(prompt: &str) -> String {
    format!("{}. Style: {HOUSE_STYLE}", prompt.trim())
}

pub fn edit_prompt(instruction: &str) -> String {
    format!(
        "Enhance this visual based on: {}. Maintain the same professional LinkedIn style and 1:1 aspect ratio.",
        instruction.trim()
    )
}

/// Request for a fresh square image.
pub fn generation_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest::new(vec![Part::text(generation_prompt(prompt))]).with_square_image()
}

/// Request to rework `image`; the image part goes first.
pub fn edit_request(image: &ImageData, instruction: &str) -> GenerateContentRequest {
    GenerateContentRequest::new(vec![Part::image(image), Part::text(edit_prompt(instruction))])
        .with_square_image()
}

/// The first inline image of a response.
pub fn image_from_response(
    response: &GenerateContentResponse,
    edit: bool,
) -> Result<ImageData, AiError> {
    let inline = response
        .first_inline_data()
        .ok_or(AiError::NoImageReturned { edit })?;
    let mime_type = if inline.mime_type.is_empty() {
        "image/png"
    } else {
        inline.mime_type.as_str()
    };
    ImageData::from_base64(mime_type, &inline.data).map_err(|e| {
        tracing::warn!(error = %e, "Discarding undecodable image payload");
        AiError::NoImageReturned { edit }
    })
}
