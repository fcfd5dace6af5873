//! Opaque raster payloads.
//!
//! Images travel through the system as encoded bytes plus a MIME type and
//! are stored in JSON as `data:` URIs.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Encoded image bytes with their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    mime_type: String,
    bytes: Vec<u8>,
}

/// Errors produced while decoding image payloads.
#[derive(Debug, thiserror::Error)]
pub enum ImageDataError {
    #[error("not a data URI")]
    NotDataUri,

    #[error("data URI is not base64-encoded")]
    NotBase64Encoded,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image payload is empty")]
    Empty,

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

impl ImageData {
    /// Wrap already-encoded bytes.
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// PNG-encoded bytes.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new("image/png", bytes)
    }

    /// Build from a base64 payload with a known MIME type.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> Result<Self, ImageDataError> {
        let bytes = BASE64.decode(payload.trim())?;
        if bytes.is_empty() {
            return Err(ImageDataError::Empty);
        }
        Ok(Self::new(mime_type, bytes))
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageDataError> {
        let rest = uri.strip_prefix("data:").ok_or(ImageDataError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageDataError::NotDataUri)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(ImageDataError::NotBase64Encoded)?;
        let mime_type = if mime_type.is_empty() {
            "application/octet-stream"
        } else {
            mime_type
        };
        Self::from_base64(mime_type, payload)
    }

    /// Read an image file, inferring the MIME type from its extension.
    pub fn from_file(path: &Path) -> Result<Self, ImageDataError> {
        let bytes = std::fs::read(path).map_err(|e| ImageDataError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if bytes.is_empty() {
            return Err(ImageDataError::Empty);
        }
        Ok(Self::new(mime_for_path(path), bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 of the raw bytes, without any URI prefix.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Render as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        ImageData::from_data_uri(&uri).map_err(serde::de::Error::custom)
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/png",
    }
}
