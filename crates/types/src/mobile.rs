//! The ten-digit mobile number that names each user directory.

use crate::IdentifierError;
use std::{fmt, str::FromStr};

/// Number of digits in a user identifier.
pub const MOBILE_NUMBER_LEN: usize = 10;

/// A user identifier: exactly ten ASCII decimal digits.
///
/// The same value names the user's directory (`users/<mobile>/`) and prefixes every
/// upload filename (`<mobile>_<anything>.<ext>`). Ordering is lexicographic, which for
/// fixed-width digit strings equals numeric ordering.
///
/// # Construction
/// - [`MobileNumber::parse`] accepts only input that is already canonical.
/// - [`MobileNumber::from_digits_in`] strips every non-digit first (`profile.json` values
///   such as `"+91 98765-43210"` are common) and accepts the result only if exactly ten
///   digits remain.
/// - [`MobileNumber::from_upload_name`] reads the prefix of an upload filename.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Validates a canonical ten-digit identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidMobileNumber`] if `input` is not exactly ten ASCII
    /// digits. Surrounding whitespace is not trimmed.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        if Self::is_canonical(input) {
            Ok(Self(input.to_owned()))
        } else {
            Err(IdentifierError::InvalidMobileNumber(input.to_owned()))
        }
    }

    /// Extracts the digits from free-form text and accepts them if there are exactly ten.
    pub fn from_digits_in(input: &str) -> Option<Self> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        Self::parse(&digits).ok()
    }

    /// Reads the identifier from an upload filename's first underscore-delimited segment.
    ///
    /// `"0123456789_20240101_1.jpg"` yields `0123456789`; names without a ten-digit
    /// leading segment yield `None`.
    pub fn from_upload_name(file_name: &str) -> Option<Self> {
        let prefix = file_name.split('_').next().unwrap_or_default();
        Self::parse(prefix).ok()
    }

    /// Returns `true` if `input` is exactly ten ASCII digits.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == MOBILE_NUMBER_LEN && input.bytes().all(|b| b.is_ascii_digit())
    }

    /// The prefix every upload filename of this user starts with (`"<mobile>_"`).
    pub fn upload_prefix(&self) -> String {
        format!("{}_", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MobileNumber {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for MobileNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for MobileNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for MobileNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MobileNumber::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_ten_digits() {
        let mobile = MobileNumber::parse("0123456789").unwrap();
        assert_eq!(mobile.as_str(), "0123456789");
        assert_eq!(mobile.to_string(), "0123456789");
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        for input in ["", "123456789", "12345678901", "12345abcde", " 0123456789", "０１２３４５６７８９"] {
            assert!(
                matches!(
                    MobileNumber::parse(input),
                    Err(IdentifierError::InvalidMobileNumber(_))
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_digits_in_strips_formatting() {
        let mobile = MobileNumber::from_digits_in(" 98765-43210 ").unwrap();
        assert_eq!(mobile.as_str(), "9876543210");

        assert!(MobileNumber::from_digits_in("+91 98765 43210").is_none());
        assert!(MobileNumber::from_digits_in("no digits").is_none());
    }

    #[test]
    fn test_from_upload_name() {
        assert_eq!(
            MobileNumber::from_upload_name("0123456789_20240101_1.jpg")
                .unwrap()
                .as_str(),
            "0123456789"
        );
        assert!(MobileNumber::from_upload_name("0123456789.jpg").is_none());
        assert!(MobileNumber::from_upload_name("012345678_x.jpg").is_none());
        assert!(MobileNumber::from_upload_name("avatar_0123456789.jpg").is_none());
    }

    #[test]
    fn test_upload_prefix_and_ordering() {
        let a = MobileNumber::parse("0000000001").unwrap();
        let b = MobileNumber::parse("1000000000").unwrap();
        assert!(a < b);
        assert_eq!(a.upload_prefix(), "0000000001_");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: MobileNumber = serde_json::from_str("\"0123456789\"").unwrap();
        assert_eq!(ok.as_str(), "0123456789");
        assert!(serde_json::from_str::<MobileNumber>("\"12\"").is_err());
    }
}
