//! Narrative drafts: the topic/insights request and the generated post.

use serde::{Deserialize, Serialize};

use crate::image_data::ImageData;

/// Most insights a single draft may carry.
pub const MAX_INSIGHTS: usize = 6;

/// Writing tone requested from the narrative model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Inspirational,
    #[serde(rename = "Thought Leader")]
    ThoughtLeader,
    Controversial,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Inspirational,
        Tone::ThoughtLeader,
        Tone::Controversial,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Inspirational => "Inspirational",
            Tone::ThoughtLeader => "Thought Leader",
            Tone::Controversial => "Controversial",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Tone::ALL
            .into_iter()
            .find(|tone| {
                tone.label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase()
                    == normalized
            })
            .ok_or_else(|| format!("unknown tone '{s}'"))
    }
}

/// A request for a narrative draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRequest {
    pub topic: String,
    pub insights: Vec<String>,
    pub tone: Tone,
}

/// Why a draft request was refused before any call was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftRequestError {
    #[error("Please provide a topic and at least one core insight.")]
    MissingInput,

    #[error("At most {MAX_INSIGHTS} insights are supported, got {0}")]
    TooManyInsights(usize),
}

impl DraftRequest {
    /// Build a request, dropping blank insights and trimming the rest.
    pub fn new(
        topic: impl Into<String>,
        insights: impl IntoIterator<Item = impl Into<String>>,
        tone: Tone,
    ) -> Result<Self, DraftRequestError> {
        let topic: String = topic.into();
        let request = Self {
            topic: topic.trim().to_string(),
            insights: insights
                .into_iter()
                .map(|s| {
                    let s: String = s.into();
                    s.trim().to_string()
                })
                .filter(|s| !s.is_empty())
                .collect(),
            tone,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), DraftRequestError> {
        if self.topic.trim().is_empty() || self.insights.iter().all(|i| i.trim().is_empty()) {
            return Err(DraftRequestError::MissingInput);
        }
        if self.insights.len() > MAX_INSIGHTS {
            return Err(DraftRequestError::TooManyInsights(self.insights.len()));
        }
        Ok(())
    }
}

/// One carousel point of a draft: a title, its image prompt and image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPoint {
    pub id: String,
    pub title: String,

    /// The insight text this point was generated from.
    pub content: String,

    pub suggested_prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,

    #[serde(default)]
    pub is_generating: bool,
}

/// A citation surfaced by search grounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    pub url: String,
}

/// A generated narrative post with one point per insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub full_post: String,
    pub points: Vec<PostPoint>,

    #[serde(default)]
    pub search_results: Vec<SearchResultItem>,

    /// Pre-rendered citation widget markup, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_entry_point_html: Option<String>,
}

impl Draft {
    pub fn point(&self, id: &str) -> Option<&PostPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn point_mut(&mut self, id: &str) -> Option<&mut PostPoint> {
        self.points.iter_mut().find(|p| p.id == id)
    }
}
