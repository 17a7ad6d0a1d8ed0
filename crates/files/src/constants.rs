/// Directory under the home directory that receives per-user exports.
pub const EXPORTS_DIR_NAME: &str = "PhotoExports";

/// Directory under the home directory that receives single-file downloads.
pub const DOWNLOADS_DIR_NAME: &str = "Downloads";

/// Placeholder shown when a file size cannot be read.
pub const UNKNOWN_SIZE: &str = "Unknown size";
