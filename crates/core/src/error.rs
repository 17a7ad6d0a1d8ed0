use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(
        "failed to create storage directory {path}: {source}",
        path = path.display()
    )]
    StorageDirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write settings file: {0}")]
    SettingsWrite(std::io::Error),
    #[error("failed to write approvals file: {0}")]
    ApprovalsWrite(std::io::Error),
    #[error("failed to write report: {0}")]
    ReportWrite(std::io::Error),
    #[error("failed to serialize: {0}")]
    Serialization(serde_json::Error),
    #[error("user directory does not exist: {0}")]
    UserNotFound(String),
    #[error(
        "failed to archive {from} to {to}: {source}",
        from = from.display(),
        to = to.display()
    )]
    Archive {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file error: {0}")]
    Files(#[from] mycam_files::FilesError),
}

pub type AdminResult<T> = std::result::Result<T, AdminError>;
