//! Error taxonomy for generative AI calls.

use serde::Deserialize;

/// Billing setup guide shown alongside entitlement failures.
pub const BILLING_GUIDE_URL: &str = "https://ai.google.dev/gemini-api/docs/billing";

/// Errors returned by a [`crate::GenerativeBackend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("API Key not found. Please enter your Gemini API Key.")]
    MissingCredential,

    #[error("API key rejected: {message}")]
    InvalidCredential { message: String },

    #[error("Model not available for this API key: {message}")]
    EntitlementRequired { message: String },

    #[error("The AI model returned an unexpected format. This usually happens if the content was filtered or the topic is too complex.")]
    UnexpectedFormat { detail: String },

    #[error("{}", no_image_message(.edit))]
    NoImageReturned { edit: bool },

    #[error("AI service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request to the AI service failed: {message}")]
    Transport { message: String },
}

fn no_image_message(edit: &bool) -> &'static str {
    if *edit {
        "Failed to edit image. The AI could not modify the existing asset."
    } else {
        "No image data returned. The prompt might have triggered a safety filter."
    }
}

/// How a failure should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Key missing or rejected; the user must enter a new one.
    Credential,
    /// Key valid but lacks access to the model (billing).
    Entitlement,
    UnexpectedFormat,
    NoImage,
    /// Anything else the service or network reported.
    Service,
}

impl ErrorCategory {
    /// Link to show next to the message, if any.
    pub fn help_link(&self) -> Option<&'static str> {
        match self {
            ErrorCategory::Entitlement => Some(BILLING_GUIDE_URL),
            _ => None,
        }
    }

    /// Whether the credential prompt should be reopened.
    pub fn requires_credential_prompt(&self) -> bool {
        matches!(self, ErrorCategory::Credential)
    }
}

impl AiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AiError::MissingCredential | AiError::InvalidCredential { .. } => {
                ErrorCategory::Credential
            }
            AiError::EntitlementRequired { .. } => ErrorCategory::Entitlement,
            AiError::UnexpectedFormat { .. } => ErrorCategory::UnexpectedFormat,
            AiError::NoImageReturned { .. } => ErrorCategory::NoImage,
            AiError::Api { .. } | AiError::Transport { .. } => ErrorCategory::Service,
        }
    }

    /// Short message suitable for the end user.
    pub fn user_message(&self) -> String {
        match self.category() {
            ErrorCategory::Credential => "Please check your API key.".to_string(),
            ErrorCategory::Entitlement => {
                "This high-quality model requires a paid API key from a billing-enabled GCP project."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn unexpected_format(detail: impl Into<String>) -> Self {
        AiError::UnexpectedFormat {
            detail: detail.into(),
        }
    }

    /// Classify a non-success HTTP response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let (message, status_text) = match envelope {
            Some(ErrorEnvelope { error }) => (error.message, error.status.unwrap_or_default()),
            None => (body.trim().to_string(), String::new()),
        };
        let message = if message.is_empty() {
            format!("HTTP {status}")
        } else {
            message
        };

        if body.contains("API_KEY_INVALID") || message.contains("API key not valid") || status == 401
        {
            return AiError::InvalidCredential { message };
        }
        if message.contains("Requested entity was not found.")
            || status == 404
            || (status == 429 && status_text == "RESOURCE_EXHAUSTED")
        {
            return AiError::EntitlementRequired { message };
        }
        AiError::Api { status, message }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<AiError> for slidemint_common::error::SlidemintError {
    fn from(err: AiError) -> Self {
        match err.category() {
            ErrorCategory::Credential => Self::credential(err.to_string()),
            _ => Self::ai(err.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}
