use chrono::{DateTime, Utc};
use mycam_files::FileDetails;
use mycam_types::{MediaType, MobileNumber};
use std::path::{Path, PathBuf};

/// One image or video file belonging to a user.
///
/// Rebuilt on every listing; two `Upload`s are the same file when their paths match.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Upload {
    path: PathBuf,
    media_type: MediaType,
    created_at: f64,
}

impl Upload {
    pub fn new(path: PathBuf, media_type: MediaType, created_at: f64) -> Self {
        Self {
            path,
            media_type,
            created_at,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Modification time in seconds since the Unix epoch.
    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    pub fn created_at_utc(&self) -> DateTime<Utc> {
        let secs = self.created_at.floor();
        let nanos = ((self.created_at - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999)).unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Which uploads a filtered listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApprovalFilter {
    #[default]
    All,
    Approved,
    Unapproved,
}

impl ApprovalFilter {
    pub fn admits(self, approved: bool) -> bool {
        match self {
            ApprovalFilter::All => true,
            ApprovalFilter::Approved => approved,
            ApprovalFilter::Unapproved => !approved,
        }
    }
}

/// Everything a preview panel shows about one upload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadDetails {
    #[serde(flatten)]
    pub file: FileDetails,
    /// Owner, read from the filename prefix
    pub user: Option<MobileNumber>,
    pub approved: bool,
}

/// Result of copying a user's uploads out of the data root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExportSummary {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let upload = Upload::new(
            PathBuf::from("/r/users/0123456789/uploads/0123456789_1.mp4"),
            MediaType::Video,
            1_700_000_000.5,
        );

        assert_eq!(upload.file_name(), "0123456789_1.mp4");
        assert_eq!(upload.media_type(), MediaType::Video);
        assert_eq!(upload.created_at_utc().timestamp(), 1_700_000_000);
        assert_eq!(upload.created_at_utc().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_created_at_before_epoch() {
        let upload = Upload::new(PathBuf::from("/a/0123456789_old.jpg"), MediaType::Image, -1000.25);

        assert_eq!(upload.created_at_utc().timestamp(), -1001);
        assert_eq!(upload.created_at_utc().timestamp_subsec_millis(), 750);
    }

    #[test]
    fn test_serialises_flat() {
        let upload = Upload::new(PathBuf::from("/a/0123456789_1.jpg"), MediaType::Image, 100.0);
        let json = serde_json::to_string(&upload).unwrap();
        assert_eq!(
            json,
            r#"{"path":"/a/0123456789_1.jpg","media_type":"image","created_at":100.0}"#
        );
    }

    #[test]
    fn test_filter_admits() {
        assert!(ApprovalFilter::All.admits(true));
        assert!(ApprovalFilter::All.admits(false));
        assert!(ApprovalFilter::Approved.admits(true));
        assert!(!ApprovalFilter::Approved.admits(false));
        assert!(ApprovalFilter::Unapproved.admits(false));
        assert!(!ApprovalFilter::Unapproved.admits(true));
    }
}
