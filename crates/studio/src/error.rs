//! Studio error types.

use slidemint_genai::{AiError, ErrorCategory};
use slidemint_project_model::draft::DraftRequestError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudioError {
    #[error("An API key is required before generating again.")]
    CredentialBlocked,

    #[error(transparent)]
    InvalidRequest(#[from] DraftRequestError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("No draft point with id '{0}'")]
    UnknownPoint(String),

    #[error("Point '{0}' has no image to edit yet")]
    NothingToEdit(String),
}

/// What the user sees after a failed AI call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFacingError {
    pub category: ErrorCategory,
    pub message: String,
    pub help_link: Option<&'static str>,
}

impl From<&AiError> for UserFacingError {
    fn from(err: &AiError) -> Self {
        let category = err.category();
        Self {
            category,
            message: err.user_message(),
            help_link: category.help_link(),
        }
    }
}

impl std::fmt::Display for UserFacingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.help_link {
            Some(link) => write!(f, "{} ({link})", self.message),
            None => f.write_str(&self.message),
        }
    }
}
