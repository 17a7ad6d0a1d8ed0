//! Best-effort inspection of a single file for preview panels.

use crate::{format_size, UNKNOWN_SIZE};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Display metadata for one file.
///
/// Every field apart from the path and name may be missing when the filesystem
/// refuses to answer; inspection itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileDetails {
    /// Path that was inspected
    pub path: PathBuf,

    /// Final path component, lossily converted
    pub file_name: String,

    /// Size in bytes, if readable
    pub size_bytes: Option<u64>,

    /// Local modification time, if readable
    pub modified: Option<DateTime<Local>>,

    /// MIME type sniffed from the file's leading bytes
    ///
    /// Independent of the extension; `None` when the content is not recognised.
    pub detected_mime: Option<String>,
}

impl FileDetails {
    /// Inspects `path`.
    pub fn inspect(path: &Path) -> Self {
        let metadata = fs::metadata(path).ok();
        let size_bytes = metadata.as_ref().map(|m| m.len());
        let modified = metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Local>::from);
        let detected_mime = infer::get_from_path(path)
            .ok()
            .flatten()
            .map(|kind| kind.mime_type().to_owned());

        Self {
            path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size_bytes,
            modified,
            detected_mime,
        }
    }

    /// Human-readable size, or [`UNKNOWN_SIZE`].
    pub fn size_display(&self) -> String {
        self.size_bytes
            .map(format_size)
            .unwrap_or_else(|| UNKNOWN_SIZE.to_owned())
    }

    /// Modification time as `YYYY-MM-DD HH:MM:SS`, or `"unknown"`.
    pub fn modified_display(&self) -> String {
        self.modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_owned())
    }
}
