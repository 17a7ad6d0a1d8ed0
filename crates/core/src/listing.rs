//! Enumeration results that keep track of what was skipped.
//!
//! Directory scans never fail outright: a missing or unreadable directory simply
//! contributes nothing. [`Listing`] carries the items together with a [`ScanIssue`] for
//! every error that was suppressed, so callers can tell a genuinely empty tree from a
//! tree that could not be read. A missing path (`NotFound`) is treated as genuinely
//! empty and produces no issue.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Why a path was skipped during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanIssueKind {
    /// The path exists but could not be read
    Unreadable(io::ErrorKind),
    /// A `profile.json` could not be parsed
    MalformedProfile(String),
}

/// A suppressed error encountered while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
    pub path: PathBuf,
    pub kind: ScanIssueKind,
}

impl fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScanIssueKind::Unreadable(kind) => {
                write!(f, "{}: unreadable ({kind})", self.path.display())
            }
            ScanIssueKind::MalformedProfile(reason) => {
                write!(f, "{}: malformed profile ({reason})", self.path.display())
            }
        }
    }
}

/// Items found by a scan plus the errors suppressed along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub issues: Vec<ScanIssue>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl<T> Listing<T> {
    /// `true` when nothing was suppressed.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Keeps only the items matching `keep`; issues are carried over unchanged.
    pub fn retain(mut self, keep: impl FnMut(&T) -> bool) -> Self {
        self.items.retain(keep);
        self
    }

    /// Records an I/O error. `NotFound` means "nothing there" and is not recorded.
    pub(crate) fn suppress_io(&mut self, path: &Path, err: &io::Error) {
        if err.kind() == io::ErrorKind::NotFound {
            return;
        }
        tracing::warn!("skipping unreadable path {}: {}", path.display(), err);
        self.issues.push(ScanIssue {
            path: path.to_path_buf(),
            kind: ScanIssueKind::Unreadable(err.kind()),
        });
    }

    pub(crate) fn suppress_profile(&mut self, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!("skipping malformed profile {}: {}", path.display(), reason);
        self.issues.push(ScanIssue {
            path: path.to_path_buf(),
            kind: ScanIssueKind::MalformedProfile(reason),
        });
    }

    pub(crate) fn absorb<U>(&mut self, other: Listing<U>) -> Vec<U> {
        self.issues.extend(other.issues);
        other.items
    }
}

impl<T> IntoIterator for Listing<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Listing<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_not_an_issue() {
        let mut listing: Listing<u8> = Listing::default();
        listing.suppress_io(
            Path::new("/missing"),
            &io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(listing.is_clean());
        assert!(listing.is_empty());
    }

    #[test]
    fn test_other_errors_are_recorded() {
        let mut listing: Listing<u8> = Listing::default();
        listing.suppress_io(
            Path::new("/locked"),
            &io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        listing.suppress_profile(Path::new("/u/profile.json"), "expected value");

        assert_eq!(listing.issues.len(), 2);
        assert_eq!(
            listing.issues[0].kind,
            ScanIssueKind::Unreadable(io::ErrorKind::PermissionDenied)
        );
        assert!(listing.issues[1].to_string().contains("malformed profile"));
    }

    #[test]
    fn test_retain_keeps_issues() {
        let mut listing = Listing {
            items: vec![1, 2, 3, 4],
            issues: Vec::new(),
        };
        listing.suppress_profile(Path::new("/p"), "bad");

        let evens = listing.retain(|n| n % 2 == 0);

        assert_eq!(evens.items, vec![2, 4]);
        assert_eq!(evens.issues.len(), 1);
    }
}
