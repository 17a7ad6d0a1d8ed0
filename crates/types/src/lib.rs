//! Shared value types for the MyCam admin tooling.
//!
//! Identifiers supplied from outside the core (directory names, `profile.json` fields,
//! CLI arguments) are validated once here so the rest of the workspace can rely on
//! their format.

mod media;
mod mobile;

pub use media::{MediaType, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use mobile::{MobileNumber, MOBILE_NUMBER_LEN};

/// Errors that can occur when creating validated identifier types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The input was not exactly ten ASCII digits
    #[error("mobile number must be exactly {MOBILE_NUMBER_LEN} digits, got {0:?}")]
    InvalidMobileNumber(String),

    /// The extension is not a recognised image or video extension
    #[error("unsupported media extension: {0:?}")]
    UnsupportedExtension(String),
}
