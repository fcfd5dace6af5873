//! Gemini REST client.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use slidemint_common::config::AiSettings;
use slidemint_project_model::draft::{Draft, DraftRequest};
use slidemint_project_model::image_data::ImageData;
use slidemint_project_model::slide::SlideAnalysis;

use crate::analysis::{analysis_request, parse_analysis};
use crate::error::AiError;
use crate::imagery::{edit_request, generation_request, image_from_response};
use crate::narrative::{build_draft_prompt, parse_draft};
use crate::protocol::{GenerateContentRequest, GenerateContentResponse, Part};

/// Everything needed to reach the generative service.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub analysis_model: String,
    pub thinking_budget: u32,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_settings(&AiSettings::default(), None)
    }
}

impl AiConfig {
    pub fn from_settings(settings: &AiSettings, api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
            analysis_model: settings.analysis_model.clone(),
            thinking_budget: settings.thinking_budget,
            timeout_secs: settings.timeout_secs,
        }
    }
}

/// The generative operations the studio depends on.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Long-form post plus one title/prompt pair per insight.
    async fn generate_draft(&self, request: &DraftRequest) -> Result<Draft, AiError>;

    /// A square image for `prompt`.
    async fn generate_image(&self, prompt: &str) -> Result<ImageData, AiError>;

    /// `image` reworked according to `instruction`.
    async fn edit_image(&self, image: &ImageData, instruction: &str)
        -> Result<ImageData, AiError>;

    /// Theme, caption and placement for a slide background.
    async fn analyze_image(
        &self,
        image: &ImageData,
        context: &str,
        filename: &str,
    ) -> Result<SlideAnalysis, AiError>;
}

/// [`GenerativeBackend`] over the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    config: AiConfig,
    api_key: RwLock<Option<String>>,
}

impl GeminiClient {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        let api_key = RwLock::new(config.api_key.clone());
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Replace the credential; the next call uses it.
    pub fn set_api_key(&self, key: impl Into<String>) {
        let key: String = key.into();
        let mut slot = self.api_key.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(key).filter(|k| !k.trim().is_empty());
    }

    pub fn clear_api_key(&self) {
        let mut slot = self.api_key.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn has_api_key(&self) -> bool {
        self.current_key().is_some()
    }

    fn current_key(&self) -> Option<String> {
        self.api_key
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        let key = self.current_key().ok_or(AiError::MissingCredential)?;

        tracing::debug!(model, "Calling generateContent");
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = AiError::from_response(status.as_u16(), &body);
            tracing::warn!(model, status = status.as_u16(), error = %err, "Model call failed");
            return Err(err);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AiError::unexpected_format(e.to_string()))
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_draft(&self, request: &DraftRequest) -> Result<Draft, AiError> {
        let body = GenerateContentRequest::new(vec![Part::text(build_draft_prompt(request))])
            .with_search()
            .with_thinking_budget(self.config.thinking_budget);
        let response = self.generate(&self.config.text_model, &body).await?;
        let draft = parse_draft(&response, request)?;
        tracing::info!(
            points = draft.points.len(),
            sources = draft.search_results.len(),
            "Draft generated"
        );
        Ok(draft)
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageData, AiError> {
        let response = self
            .generate(&self.config.image_model, &generation_request(prompt))
            .await?;
        image_from_response(&response, false)
    }

    async fn edit_image(
        &self,
        image: &ImageData,
        instruction: &str,
    ) -> Result<ImageData, AiError> {
        let response = self
            .generate(&self.config.image_model, &edit_request(image, instruction))
            .await?;
        image_from_response(&response, true)
    }

    async fn analyze_image(
        &self,
        image: &ImageData,
        context: &str,
        filename: &str,
    ) -> Result<SlideAnalysis, AiError> {
        let response = self
            .generate(
                &self.config.analysis_model,
                &analysis_request(image, context, filename),
            )
            .await?;
        Ok(parse_analysis(&response.text()))
    }
}
