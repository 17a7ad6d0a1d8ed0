//! Media classification by file extension.

use crate::IdentifierError;
use std::path::Path;

/// Extensions (lowercase, without the dot) treated as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Extensions (lowercase, without the dot) treated as videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "3gp"];

/// Kind of an upload, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classifies an extension, case-insensitively. A leading dot is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::UnsupportedExtension`] for anything outside
    /// [`IMAGE_EXTENSIONS`] and [`VIDEO_EXTENSIONS`].
    pub fn from_extension(ext: &str) -> Result<Self, IdentifierError> {
        let lower = ext.trim_start_matches('.').to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&lower.as_str()) {
            Ok(MediaType::Image)
        } else if VIDEO_EXTENSIONS.contains(&lower.as_str()) {
            Ok(MediaType::Video)
        } else {
            Err(IdentifierError::UnsupportedExtension(ext.to_owned()))
        }
    }

    /// Classifies a path by its extension; `None` when missing or unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| Self::from_extension(e).ok())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
