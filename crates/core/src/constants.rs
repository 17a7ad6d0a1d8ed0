//! Constants used throughout the MyCam core crate.
//!
//! This module contains all path and filename constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Directory under the data root holding one directory per user.
pub const USERS_DIR_NAME: &str = "users";

/// Directory under the data root receiving archived users.
pub const TRASH_DIR_NAME: &str = "trash";

/// Directory under each user directory holding that user's uploads.
pub const UPLOADS_DIR_NAME: &str = "uploads";

/// Optional per-user file carrying a `mobile` field.
pub const PROFILE_JSON_FILENAME: &str = "profile.json";

/// Default settings directory name, created under the home directory.
pub const SETTINGS_DIR_NAME: &str = ".admin_mycam";

/// Filename for the saved data root.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Filename for the approval flags.
pub const APPROVALS_FILENAME: &str = "approved.json";

/// Legacy shared-folder name used by the capture app.
pub const APP_FOLDER_NAME: &str = "MyCameraApp";

/// App directory names probed under `%LOCALAPPDATA%` and `%APPDATA%`.
pub const WINDOWS_APP_NAMES: &[&str] = &["PhotoApp", "photoapp", "MyCameraApp", "mycameraapp"];

/// Upper bound on entries taken from each Windows app-data directory.
pub const MAX_APPDATA_ENTRIES: usize = 200;

/// External storage mount used when Android does not report one.
pub const ANDROID_FALLBACK_STORAGE: &str = "/sdcard";

/// Directory under the home directory receiving generated reports.
pub const REPORTS_DIR_NAME: &str = "AdminReports";

/// Environment variable naming a candidate data root.
pub const USERS_ROOT_ENV: &str = "MYCAM_USERS_ROOT";

/// Environment variable overriding the settings directory.
pub const SETTINGS_DIR_ENV: &str = "MYCAM_SETTINGS_DIR";
