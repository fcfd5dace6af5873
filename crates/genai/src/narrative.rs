//! Narrative drafts: prompt construction and response normalization.

use serde::Deserialize;

use slidemint_project_model::draft::{Draft, DraftRequest, PostPoint, SearchResultItem};

use crate::error::AiError;
use crate::json::parse_model_json;
use crate::protocol::GenerateContentResponse;

/// Prompt for a long-form post with one visual per insight.
pub fn build_draft_prompt(request: &DraftRequest) -> String {
    let points = request
        .insights
        .iter()
        .enumerate()
        .map(|(i, text)| format!("Point {}: {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n");
    let count = request.insights.len();

    format!(
        r#"You are a world-class LinkedIn ghostwriter and content designer.
Research and synthesize a high-authority, viral-ready carousel post about: {topic}.

Core Insights to weave together into one cohesive story:
{points}

Tone: {tone}

Instructions:
1. Use 'googleSearch' to find current data, trends, and authoritative references.
2. Write a single, long-form cohesive narrative (< 600 words) with a strong hook, a high-value synthesis of the insights, and a conversation-starting call to action.
3. Generate exactly {count} punchy visual titles and detailed prompts for image generation, one per insight and in the same order.
4. Each image prompt MUST ask for the slide title text to be clearly rendered on the image (e.g. "with the text '[TITLE]' written in modern, bold white typography in the center").
5. The visuals should feel premium, minimalist, and modern professional.

IMPORTANT: Response must be JSON only.
Schema:
{{
  "fullPost": "Complete narrative post text",
  "points": [
    {{ "title": "Short punchy title", "suggestedPrompt": "Cinematic 1:1 image prompt with title text integration" }}
  ]
}}"#,
        topic = request.topic,
        tone = request.tone.label(),
    )
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DraftPayload {
    #[serde(default)]
    full_post: Option<String>,
    #[serde(default)]
    points: Option<Vec<PointPayload>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PointPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    suggested_prompt: Option<String>,
}

/// Turn a model response into a draft with exactly one point per insight.
///
/// Missing titles and prompts get defaults; surplus points are dropped.
/// Text that holds no parseable JSON is an [`AiError::UnexpectedFormat`].
pub fn parse_draft(
    response: &GenerateContentResponse,
    request: &DraftRequest,
) -> Result<Draft, AiError> {
    let text = response.text();
    let payload: DraftPayload = if text.trim().is_empty() {
        DraftPayload::default()
    } else {
        parse_model_json(&text)?
    };

    let mut generated = payload.points.unwrap_or_default().into_iter();
    let points = request
        .insights
        .iter()
        .enumerate()
        .map(|(i, insight)| {
            let suggestion = generated.next().unwrap_or_default();
            PostPoint {
                id: format!("p-{i}"),
                title: non_blank(suggestion.title).unwrap_or_else(|| format!("Insight {}", i + 1)),
                content: insight.clone(),
                suggested_prompt: non_blank(suggestion.suggested_prompt)
                    .unwrap_or_else(|| format!("Professional visual for {}", request.topic)),
                image: None,
                is_generating: false,
            }
        })
        .collect();

    let grounding = response.grounding();
    let search_results = grounding
        .map(|g| {
            g.grounding_chunks
                .iter()
                .filter_map(|chunk| {
                    let web = chunk.web.as_ref()?;
                    Some(SearchResultItem {
                        title: web.title.clone().filter(|t| !t.is_empty())?,
                        url: web.uri.clone().filter(|u| !u.is_empty())?,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    let search_entry_point_html = grounding
        .and_then(|g| g.search_entry_point.as_ref())
        .and_then(|e| e.rendered_content.clone());

    Ok(Draft {
        full_post: payload.full_post.unwrap_or_default(),
        points,
        search_results,
        search_entry_point_html,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use slidemint_project_model::draft::Tone;

    fn request(insights: &[&str]) -> DraftRequest {
        DraftRequest::new("Remote hiring", insights.iter().copied(), Tone::Professional).unwrap()
    }

    fn response(text: &str) -> GenerateContentResponse {
        serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://a.example", "title": "A" } },
                        { "web": { "uri": "https://b.example" } },
                        { "retrievedContext": {} }
                    ],
                    "searchEntryPoint": { "renderedContent": "<div>chips</div>" }
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_prompt_lists_points_and_tone() {
        let prompt = build_draft_prompt(&request(&["Grow faster", "Hire smarter"]));
        assert!(prompt.contains("Point 1: Grow faster\nPoint 2: Hire smarter"));
        assert!(prompt.contains("Tone: Professional"));
        assert!(prompt.contains("exactly 2 punchy visual titles"));
    }

    #[test]
    fn test_one_point_per_insight() {
        let text = r#"{"fullPost":"Post body","points":[{"title":"Speed","suggestedPrompt":"A rocket"},{"title":"Talent","suggestedPrompt":"A magnet"}]}"#;
        let draft = parse_draft(&response(text), &request(&["Grow faster", "Hire smarter"])).unwrap();

        assert_eq!(draft.full_post, "Post body");
        assert_eq!(draft.points.len(), 2);
        assert_eq!(draft.points[0].id, "p-0");
        assert_eq!(draft.points[0].content, "Grow faster");
        assert_eq!(draft.points[1].title, "Talent");
        assert_eq!(draft.points[1].suggested_prompt, "A magnet");
        assert!(draft.points.iter().all(|p| p.image.is_none() && !p.is_generating));
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let text = r#"{"fullPost":"x","points":[{"title":""}]}"#;
        let draft = parse_draft(&response(text), &request(&["a", "b"])).unwrap();
        assert_eq!(draft.points[0].title, "Insight 1");
        assert_eq!(draft.points[0].suggested_prompt, "Professional visual for Remote hiring");
        assert_eq!(draft.points[1].title, "Insight 2");
    }

    #[test]
    fn test_extra_points_dropped() {
        let text = r#"{"points":[{"title":"1"},{"title":"2"},{"title":"3"}]}"#;
        let draft = parse_draft(&response(text), &request(&["only"])).unwrap();
        assert_eq!(draft.points.len(), 1);
        assert_eq!(draft.full_post, "");
    }

    #[test]
    fn test_citations_need_title_and_url() {
        let draft = parse_draft(&response("{}"), &request(&["a"])).unwrap();
        assert_eq!(
            draft.search_results,
            vec![SearchResultItem {
                title: "A".to_string(),
                url: "https://a.example".to_string()
            }]
        );
        assert_eq!(draft.search_entry_point_html.as_deref(), Some("<div>chips</div>"));
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let text = "```json\n{\"fullPost\":\"Fenced\",\"points\":[]}\n```";
        let draft = parse_draft(&response(text), &request(&["a"])).unwrap();
        assert_eq!(draft.full_post, "Fenced");
    }

    #[test]
    fn test_garbage_is_unexpected_format() {
        let result = parse_draft(&response("The content was blocked."), &request(&["a"]));
        assert!(matches!(result, Err(AiError::UnexpectedFormat { .. })));
    }
}
