//! Author profile used for slide branding.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::image_data::ImageData;
use crate::project::ProjectError;

/// Username and avatar shown in each slide's branding block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,

    #[serde(rename = "profilePic")]
    pub profile_pic: ImageData,
}

impl Profile {
    /// Create a validated profile.
    pub fn new(username: impl Into<String>, profile_pic: ImageData) -> Result<Self, ProjectError> {
        let username: String = username.into();
        let profile = Self {
            username: username.trim().to_string(),
            profile_pic,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Both fields must be non-empty before a profile can brand an export.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if self.username.trim().is_empty() {
            return Err(ProjectError::ValidationError {
                message: "Profile username must not be empty".to_string(),
            });
        }
        if self.profile_pic.is_empty() {
            return Err(ProjectError::ValidationError {
                message: "Profile picture must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Load a saved profile. A missing file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>, ProjectError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let profile: Profile =
            serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        profile.validate()?;
        Ok(Some(profile))
    }

    /// Persist the profile as JSON.
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
