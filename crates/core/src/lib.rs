//! # MyCam Core
//!
//! Core logic for administering the uploads of the MyCam capture app.
//!
//! This crate works directly on the app's directory convention:
//! - Locating and remembering the data root
//! - Listing users and their image/video uploads
//! - Archiving users into `trash/`
//! - Persisting per-file approval flags
//! - Storage statistics, reports and exports
//!
//! **No process state**: environment variables and the home directory are resolved by the
//! binary and passed in through [`AdminConfig`].

pub mod approvals;
pub mod config;
pub mod constants;
mod discovery;
mod error;
mod listing;
pub mod repository;
pub mod stats;
pub mod upload;

pub use approvals::{normalize_path, ApprovalStore};
pub use config::{AdminConfig, Platform, RootSearch};
pub use discovery::looks_like_users_root;
pub use error::{AdminError, AdminResult};
pub use listing::{Listing, ScanIssue, ScanIssueKind};
pub use repository::UploadRepository;
pub use stats::{AdminReport, StorageStats};
pub use upload::{ApprovalFilter, ExportSummary, Upload, UploadDetails};

pub use mycam_files::format_size;
pub use mycam_types::{MediaType, MobileNumber};
