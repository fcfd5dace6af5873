//! Scripted backend for studio tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use slidemint_genai::{AiError, GenerativeBackend};
use slidemint_project_model::draft::{Draft, DraftRequest, PostPoint};
use slidemint_project_model::image_data::ImageData;
use slidemint_project_model::slide::{Placement, SlideAnalysis, Theme};

/// Answers every call locally. Keys for delays and failures are image
/// prompts or analysis filenames.
#[derive(Default)]
pub struct FakeBackend {
    delays_ms: HashMap<String, u64>,
    image_failures: HashMap<String, AiError>,
    analyses: HashMap<String, Result<SlideAnalysis, AiError>>,
    draft_failure: Option<AiError>,
    draft_calls: AtomicUsize,
    image_calls: AtomicUsize,
    edit_calls: AtomicUsize,
    analysis_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, key: &str, ms: u64) -> Self {
        self.delays_ms.insert(key.to_string(), ms);
        self
    }

    pub fn failing_image(mut self, prompt: &str, err: AiError) -> Self {
        self.image_failures.insert(prompt.to_string(), err);
        self
    }

    pub fn failing_draft(mut self, err: AiError) -> Self {
        self.draft_failure = Some(err);
        self
    }

    pub fn with_analysis(mut self, filename: &str, result: Result<SlideAnalysis, AiError>) -> Self {
        self.analyses.insert(filename.to_string(), result);
        self
    }

    pub fn draft_calls(&self) -> usize {
        self.draft_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn edit_calls(&self) -> usize {
        self.edit_calls.load(Ordering::SeqCst)
    }

    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self, key: &str) {
        let ms = self.delays_ms.get(key).copied().unwrap_or(10);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn generate_draft(&self, request: &DraftRequest) -> Result<Draft, AiError> {
        self.draft_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.draft_failure {
            return Err(err.clone());
        }
        Ok(Draft {
            full_post: format!("A post about {}", request.topic),
            points: request
                .insights
                .iter()
                .enumerate()
                .map(|(i, insight)| PostPoint {
                    id: format!("p-{i}"),
                    title: format!("Insight {}", i + 1),
                    content: insight.clone(),
                    suggested_prompt: format!("prompt for {insight}"),
                    image: None,
                    is_generating: false,
                })
                .collect(),
            search_results: Vec::new(),
            search_entry_point_html: None,
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageData, AiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(prompt).await;
        match self.image_failures.get(prompt) {
            Some(err) => Err(err.clone()),
            None => Ok(ImageData::png(prompt.as_bytes().to_vec())),
        }
    }

    async fn edit_image(&self, image: &ImageData, instruction: &str) -> Result<ImageData, AiError> {
        self.edit_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(instruction).await;
        let mut bytes = image.bytes().to_vec();
        bytes.extend_from_slice(instruction.as_bytes());
        Ok(ImageData::png(bytes))
    }

    async fn analyze_image(
        &self,
        _image: &ImageData,
        _context: &str,
        filename: &str,
    ) -> Result<SlideAnalysis, AiError> {
        self.analysis_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(filename).await;
        self.analyses.get(filename).cloned().unwrap_or_else(|| {
            Ok(SlideAnalysis {
                theme: Theme::Dark,
                caption: format!("Caption for {filename}"),
                placement: Placement::Top,
            })
        })
    }
}
