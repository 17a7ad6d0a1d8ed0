//! MyCam File Handling
//!
//! Copying uploads out of the data root and inspecting individual files.
//!
//! ## Design Principles
//!
//! - Source files are never modified or moved; every operation is a copy
//! - Copies keep the source modification time, so exported uploads sort the same way
//! - Inspection is best-effort: unreadable sizes or timestamps become `None`
//!
//! ## Example Usage
//!
//! ```no_run
//! use mycam_files::ExportService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let export = ExportService::new(Path::new("/tmp/exports/user_0123456789"))?;
//! let copied = export.copy(Path::new("/data/users/0123456789/uploads/0123456789_1.jpg"))?;
//! println!("copied to {}", copied.display());
//! # Ok(())
//! # }
//! ```

mod constants;
mod details;
mod files;
mod size;

pub use constants::{DOWNLOADS_DIR_NAME, EXPORTS_DIR_NAME, UNKNOWN_SIZE};
pub use details::FileDetails;
pub use files::ExportService;
pub use size::format_size;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Destination path exists but cannot hold copies
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// Source path is missing or is not a regular file
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
