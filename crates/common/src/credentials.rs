//! API key storage.
//!
//! The key is a single opaque string kept in a file next to the config.
//! It is read explicitly and handed to the AI client at construction;
//! nothing reads it implicitly on each call.

use std::path::{Path, PathBuf};

use crate::config::config_dir;
use crate::error::{SlidemintError, SlidemintResult};

/// Environment variable that overrides the stored key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// File-backed store for the generative AI API key.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    allow_env: bool,
}

impl CredentialStore {
    /// Store at the standard location, honoring the environment override.
    pub fn standard() -> Self {
        Self {
            path: config_dir().join("api_key"),
            allow_env: true,
        }
    }

    /// Store at an explicit path without the environment override.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            allow_env: false,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current key, if any. Empty values count as absent.
    pub fn load(&self) -> SlidemintResult<Option<String>> {
        if self.allow_env {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                let key = key.trim().to_string();
                if !key.is_empty() {
                    return Ok(Some(key));
                }
            }
        }

        if !self.path.exists() {
            return Ok(None);
        }

        let key = std::fs::read_to_string(&self.path)?.trim().to_string();
        Ok((!key.is_empty()).then_some(key))
    }

    /// Persist a new key, replacing any previous one.
    pub fn save(&self, key: &str) -> SlidemintResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SlidemintError::credential("API key must not be empty"));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, key)?;
        tracing::info!(path = %self.path.display(), "Stored API key");
        Ok(())
    }

    /// Remove the stored key. Missing files are not an error.
    pub fn clear(&self) -> SlidemintResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
