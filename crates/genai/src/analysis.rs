//! Background image analysis: theme, caption and caption placement.

use serde::Deserialize;

use slidemint_project_model::image_data::ImageData;
use slidemint_project_model::slide::{Placement, SlideAnalysis, Theme};

use crate::json::strip_code_fences;
use crate::protocol::{GenerateContentRequest, Part};

pub fn analysis_prompt(context: &str, filename: &str) -> String {
    format!(
        r#"You are a LinkedIn content expert. Analyze this image and the provided context to generate slide content.

Context Article: "{context}"
Image Filename: "{filename}"

Tasks:
1. Analyze the brightness/color. If the image is dark and needs white text, set theme to "dark". If light and needs black text, set theme to "light".
2. Write a short, punchy, engaging text overlay (max 20 words) for this slide. It should connect the image visual to the topic of the Context Article.
3. Analyze the image composition to find the best place for the text overlay (where there is empty space or less detail). Choose "top", "center", or "bottom".

Return ONLY a JSON object in this format:
{{
  "theme": "light" | "dark",
  "content": "your generated text here",
  "contentPosition": "top" | "center" | "bottom"
}}"#
    )
}

pub fn analysis_request(image: &ImageData, context: &str, filename: &str) -> GenerateContentRequest {
    GenerateContentRequest::new(vec![
        Part::image(image),
        Part::text(analysis_prompt(context, filename)),
    ])
    .with_json_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisPayload {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    content_position: Option<String>,
}

/// Interpret the analysis model's answer.
///
/// Never fails: text that is not JSON falls back to a keyword guess for
/// the theme with an empty top caption.
pub fn parse_analysis(text: &str) -> SlideAnalysis {
    let cleaned = strip_code_fences(text);
    match serde_json::from_str::<AnalysisPayload>(&cleaned) {
        Ok(payload) => SlideAnalysis {
            theme: payload
                .theme
                .as_deref()
                .map(theme_from_label)
                .unwrap_or(Theme::Dark),
            caption: payload.content.unwrap_or_default(),
            placement: payload
                .content_position
                .as_deref()
                .and_then(placement_from_label)
                .unwrap_or(Placement::Top),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Analysis was not JSON, falling back to text heuristic");
            let lower = cleaned.to_lowercase();
            let theme = if lower.contains("light") || lower.contains("black text") {
                Theme::Light
            } else {
                Theme::Dark
            };
            SlideAnalysis {
                theme,
                ..SlideAnalysis::default()
            }
        }
    }
}

fn theme_from_label(label: &str) -> Theme {
    let lower = label.to_lowercase();
    if lower == "light" || lower.contains("black") {
        Theme::Light
    } else {
        Theme::Dark
    }
}

fn placement_from_label(label: &str) -> Option<Placement> {
    match label.to_lowercase().as_str() {
        "top" => Some(Placement::Top),
        "center" => Some(Placement::Center),
        "bottom" => Some(Placement::Bottom),
        _ => None,
    }
}
