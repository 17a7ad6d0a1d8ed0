//! Destination-scoped copy service.
//!
//! [`ExportService`] is bound to one destination directory and copies source files
//! into it by basename. It backs both bulk per-user exports and single-file downloads.
//!
//! # Copy semantics
//!
//! - The destination directory is created at construction time if missing
//! - Files are copied by content; permissions follow [`std::fs::copy`]
//! - The source modification time is applied to the copy where the copy is writable
//! - An existing file with the same name in the destination is overwritten
//! - Sources are never modified

use crate::FilesError;
use std::fs;
use std::path::{Path, PathBuf};

/// Service that copies files into a single destination directory.
#[derive(Debug)]
pub struct ExportService {
    /// Directory receiving the copies
    destination: PathBuf,
}

impl ExportService {
    /// Creates a service for `destination`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `destination` exists but is not a directory
    /// - the directory cannot be created (I/O)
    pub fn new(destination: &Path) -> Result<Self, FilesError> {
        if destination.exists() && !destination.is_dir() {
            return Err(FilesError::InvalidDestination(format!(
                "Path is not a directory: {}",
                destination.display()
            )));
        }

        fs::create_dir_all(destination).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create destination directory {}: {}",
                    destination.display(),
                    e
                ),
            ))
        })?;

        Ok(Self {
            destination: destination.to_path_buf(),
        })
    }

    /// Copies one file into the destination, keeping its basename and modification time.
    ///
    /// # Returns
    ///
    /// The path of the new copy.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `source` does not exist or is not a regular file
    /// - the copy fails (I/O)
    pub fn copy(&self, source: &Path) -> Result<PathBuf, FilesError> {
        let metadata = fs::metadata(source)
            .map_err(|_| FilesError::NotAFile(source.display().to_string()))?;
        if !metadata.is_file() {
            return Err(FilesError::NotAFile(source.display().to_string()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| FilesError::NotAFile(source.display().to_string()))?;
        let target = self.destination.join(file_name);

        fs::copy(source, &target).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    target.display(),
                    e
                ),
            ))
        })?;

        // Read-only sources produce read-only copies, so the timestamp is best-effort.
        if let Ok(modified) = metadata.modified() {
            let stamped = fs::OpenOptions::new()
                .write(true)
                .open(&target)
                .and_then(|copy| copy.set_modified(modified));
            if let Err(e) = stamped {
                tracing::warn!(
                    "failed to keep modification time on {}: {}",
                    target.display(),
                    e
                );
            }
        }

        tracing::debug!("copied {} -> {}", source.display(), target.display());
        Ok(target)
    }

    /// Copies every source in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first `FilesError` raised by [`Self::copy`]; files copied before the
    /// failure are left in place.
    pub fn copy_all<'a, I>(&self, sources: I) -> Result<Vec<PathBuf>, FilesError>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        sources.into_iter().map(|source| self.copy(source)).collect()
    }

    /// Returns the destination directory.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_with_mtime(path: &Path, contents: &[u8], secs: u64) {
        fs::write(path, contents).unwrap();
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn test_new_creates_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("exports").join("user_0123456789");

        let service = ExportService::new(&dest).unwrap();

        assert!(dest.is_dir());
        assert_eq!(service.destination(), dest.as_path());
    }

    #[test]
    fn test_new_rejects_file_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("not-a-dir");
        fs::write(&dest, "x").unwrap();

        let result = ExportService::new(&dest);

        assert!(matches!(result, Err(FilesError::InvalidDestination(_))));
    }

    #[test]
    fn test_copy_preserves_content_and_mtime() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("0123456789_1.jpg");
        write_with_mtime(&source, b"jpeg bytes", 1_700_000_000);

        let service = ExportService::new(&temp.path().join("out")).unwrap();
        let copied = service.copy(&source).unwrap();

        assert_eq!(copied, temp.path().join("out").join("0123456789_1.jpg"));
        assert_eq!(fs::read(&copied).unwrap(), b"jpeg bytes");
        assert_eq!(
            fs::metadata(&copied).unwrap().modified().unwrap(),
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
        );
        assert!(source.exists(), "source must not be moved");
    }

    #[test]
    fn test_copy_missing_source() {
        let temp = TempDir::new().unwrap();
        let service = ExportService::new(&temp.path().join("out")).unwrap();

        let result = service.copy(&temp.path().join("missing.jpg"));

        assert!(matches!(result, Err(FilesError::NotAFile(_))));
    }

    #[test]
    fn test_copy_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let service = ExportService::new(&temp.path().join("out")).unwrap();

        let result = service.copy(temp.path());

        assert!(matches!(result, Err(FilesError::NotAFile(_))));
    }

    #[test]
    fn test_copy_all_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("a.jpg");
        fs::write(&good, b"a").unwrap();
        let missing = temp.path().join("b.jpg");

        let service = ExportService::new(&temp.path().join("out")).unwrap();
        let result = service.copy_all([good.as_path(), missing.as_path()]);

        assert!(result.is_err());
        assert!(temp.path().join("out").join("a.jpg").exists());
    }

    #[test]
    fn test_copy_all_returns_targets_in_order() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.jpg");
        let b = temp.path().join("b.mp4");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let service = ExportService::new(&temp.path().join("out")).unwrap();
        let copied = service.copy_all([a.as_path(), b.as_path()]).unwrap();

        assert_eq!(
            copied,
            vec![
                temp.path().join("out").join("a.jpg"),
                temp.path().join("out").join("b.mp4")
            ]
        );
    }
}
