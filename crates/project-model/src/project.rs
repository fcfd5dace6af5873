//! Deck files on disk.
//!
//! A deck file (`deck.json`) ties together the ordered slides, their
//! embedded source images, and the context article used for analysis.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::deck::Deck;

/// Current deck file schema version.
pub const DECK_FILE_VERSION: &str = "1.0";

/// Top-level deck file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckFile {
    /// Schema version.
    pub version: String,

    /// Human-readable deck name.
    pub name: String,

    /// Unique deck identifier (UUID).
    pub id: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// The slides themselves.
    pub deck: Deck,
}

/// A deck file together with where it lives.
#[derive(Debug, Clone)]
pub struct LoadedDeck {
    /// Filesystem path of the deck file.
    pub path: PathBuf,

    pub file: DeckFile,
}

impl DeckFile {
    /// Create an empty deck file.
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: DECK_FILE_VERSION.to_string(),
            name: name.into(),
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now.clone(),
            modified_at: now,
            deck: Deck::new(),
        }
    }
}

impl LoadedDeck {
    /// Load a deck file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let file: DeckFile = serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        if file.version != DECK_FILE_VERSION {
            return Err(ProjectError::ValidationError {
                message: format!(
                    "Unsupported deck version {} (expected {DECK_FILE_VERSION})",
                    file.version
                ),
            });
        }
        Ok(Self { path, file })
    }

    /// Create a new deck file on disk. Fails if one already exists.
    pub fn create(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(ProjectError::ValidationError {
                message: format!("Deck already exists at {}", path.display()),
            });
        }
        let loaded = Self {
            path,
            file: DeckFile::new(name),
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Save the deck, bumping its modification time.
    pub fn save(&self) -> Result<(), ProjectError> {
        let mut file = self.file.clone();
        file.modified_at = chrono::Utc::now().to_rfc3339();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(&file).map_err(|e| ProjectError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::write(&self.path, json).map_err(|e| ProjectError::IoError {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn deck(&self) -> &Deck {
        &self.file.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.file.deck
    }
}

/// Errors that can occur when working with decks and profiles.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_data::ImageData;
    use crate::slide::SlideStatus;

    #[test]
    fn test_deck_file_creation() {
        let file = DeckFile::new("Launch week");
        assert_eq!(file.name, "Launch week");
        assert_eq!(file.version, DECK_FILE_VERSION);
        assert!(file.deck.is_empty());
    }

    #[test]
    fn test_create_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks").join("deck.json");

        let mut created = LoadedDeck::create(&path, "Integration Test").unwrap();
        let id = created.deck_mut().attach(ImageData::png(vec![1, 2, 3]));
        created.deck_mut().get_mut(&id).unwrap().status = SlideStatus::Idle;
        created.deck_mut().context_article = "Hiring in 2026".to_string();
        created.save().unwrap();

        let loaded = LoadedDeck::load(&path).unwrap();
        assert_eq!(loaded.file.name, "Integration Test");
        assert_eq!(loaded.deck().len(), 1);
        assert_eq!(loaded.deck().context_article, "Hiring in 2026");
        assert_eq!(loaded.deck().at(0).unwrap().source_image().bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_create_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        LoadedDeck::create(&path, "first").unwrap();
        assert!(matches!(
            LoadedDeck::create(&path, "second"),
            Err(ProjectError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let mut file = DeckFile::new("old");
        file.version = "0.3".to_string();
        std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        assert!(matches!(
            LoadedDeck::load(&path),
            Err(ProjectError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_slide_positions_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let json = serde_json::json!({
            "version": "1.0",
            "name": "legacy",
            "id": "abc",
            "created_at": "2026-01-01T00:00:00Z",
            "modified_at": "2026-01-01T00:00:00Z",
            "deck": {
                "slides": [
                    { "id": "s1", "source_image": "data:image/png;base64,AAEC" }
                ]
            }
        });
        std::fs::write(&path, json.to_string()).unwrap();

        let loaded = LoadedDeck::load(&path).unwrap();
        let slide = loaded.deck().at(0).unwrap();
        assert_eq!(slide.positions.content.x, 14.0);
        assert_eq!(slide.status, SlideStatus::Idle);
    }
}
