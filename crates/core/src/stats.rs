//! Storage usage and the plain-text admin report.

use crate::constants::REPORTS_DIR_NAME;
use crate::repository::UploadRepository;
use crate::{AdminError, AdminResult};
use chrono::{DateTime, Local};
use mycam_files::format_size;
use mycam_types::{MediaType, MobileNumber};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Totals across every user's uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    pub users: usize,
    pub images: usize,
    pub videos: usize,
    pub total_bytes: u64,
    pub bytes_per_user: BTreeMap<MobileNumber, u64>,
}

impl StorageStats {
    /// Walks every user's uploads. Files whose size cannot be read are left out of every
    /// count.
    pub fn collect(repo: &UploadRepository) -> Self {
        let mut stats = Self::default();
        let users = repo.list_users();
        stats.users = users.len();

        for mobile in users {
            let mut user_bytes = 0;
            for upload in repo.list_uploads_for_user(&mobile) {
                let size = match fs::metadata(upload.path()) {
                    Ok(m) => m.len(),
                    Err(e) => {
                        tracing::debug!("skipping {}: {}", upload.path().display(), e);
                        continue;
                    }
                };
                user_bytes += size;
                match upload.media_type() {
                    MediaType::Image => stats.images += 1,
                    MediaType::Video => stats.videos += 1,
                }
            }
            stats.total_bytes += user_bytes;
            stats.bytes_per_user.insert(mobile, user_bytes);
        }

        stats
    }

    pub fn total_uploads(&self) -> usize {
        self.images + self.videos
    }

    pub fn total_size_display(&self) -> String {
        format_size(self.total_bytes)
    }
}

/// Snapshot of the repository rendered as a text report.
#[derive(Debug, Clone)]
pub struct AdminReport {
    pub generated_at: DateTime<Local>,
    pub root: PathBuf,
    pub stats: StorageStats,
}

impl AdminReport {
    pub fn new(repo: &UploadRepository) -> Self {
        Self {
            generated_at: Local::now(),
            root: repo.root().to_path_buf(),
            stats: StorageStats::collect(repo),
        }
    }

    /// `<home>/AdminReports`
    pub fn default_dir(home_dir: &Path) -> PathBuf {
        home_dir.join(REPORTS_DIR_NAME)
    }

    pub fn file_name(&self) -> String {
        format!("admin_report_{}.txt", self.generated_at.timestamp())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Saves the report as `admin_report_<unix_ts>.txt` in `dir`, creating it.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::StorageDirCreation` or `AdminError::ReportWrite`.
    pub fn write_to(&self, dir: &Path) -> AdminResult<PathBuf> {
        fs::create_dir_all(dir).map_err(|source| AdminError::StorageDirCreation {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.render()).map_err(AdminError::ReportWrite)?;
        tracing::info!("report saved to {}", path.display());
        Ok(path)
    }
}

const RULE: &str = "=================================";

impl fmt::Display for AdminReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ADMIN REPORT - {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total Users: {}", self.stats.users)?;
        writeln!(f, "Total Images: {}", self.stats.images)?;
        writeln!(f, "Total Videos: {}", self.stats.videos)?;
        writeln!(f, "Total Storage: {}", self.stats.total_size_display())?;
        writeln!(f, "Data Root: {}", self.root.display())?;
        writeln!(f, "{RULE}")
    }
}
