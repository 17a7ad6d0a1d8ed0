//! Recognising a data root on disk.
//!
//! A data root is any directory with a `users/` subdirectory that shows signs of the
//! capture app's layout:
//!
//! ```text
//! <root>/
//!   users/
//!     <mobile>/
//!       uploads/
//!         <mobile>_<anything>.<ext>
//!   trash/
//! ```

use crate::constants::{UPLOADS_DIR_NAME, USERS_DIR_NAME};
use crate::listing::Listing;
use mycam_types::MobileNumber;
use std::fs;
use std::path::Path;

/// Returns `true` if `path` looks like a data root.
///
/// Accepted when `path/users` is a directory and either
/// - an entry directly inside it is named with exactly ten digits, or
/// - some `users/*/uploads/*` entry's first underscore-delimited segment is ten digits.
///
/// Unreadable directories count as "no evidence" rather than errors.
pub fn looks_like_users_root(path: &Path) -> bool {
    let users_dir = path.join(USERS_DIR_NAME);
    if !users_dir.is_dir() {
        return false;
    }

    if let Ok(entries) = fs::read_dir(&users_dir) {
        let has_mobile_entry = entries.flatten().any(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(MobileNumber::is_canonical)
        });
        if has_mobile_entry {
            return true;
        }
    }

    nested_upload_names(&users_dir)
        .iter()
        .any(|name| MobileNumber::from_upload_name(name).is_some())
}

/// Names of every `<users_dir>/*/uploads/*` entry, in directory order.
///
/// Hidden entries (leading `.`) are skipped at both wildcard levels. Entries whose
/// names are not valid UTF-8 cannot carry an identifier and are skipped too.
pub(crate) fn nested_upload_names(users_dir: &Path) -> Listing<String> {
    let mut listing = Listing::default();

    let user_entries = match fs::read_dir(users_dir) {
        Ok(it) => it,
        Err(e) => {
            listing.suppress_io(users_dir, &e);
            return listing;
        }
    };

    for user_entry in user_entries.flatten() {
        if is_hidden(&user_entry.file_name()) || !user_entry.path().is_dir() {
            continue;
        }

        let uploads_dir = user_entry.path().join(UPLOADS_DIR_NAME);
        let upload_entries = match fs::read_dir(&uploads_dir) {
            Ok(it) => it,
            Err(e) => {
                listing.suppress_io(&uploads_dir, &e);
                continue;
            }
        };

        for upload in upload_entries.flatten() {
            let name = upload.file_name();
            if is_hidden(&name) {
                continue;
            }
            if let Some(name) = name.to_str() {
                listing.items.push(name.to_owned());
            }
        }
    }

    listing
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rejects_missing_users_dir() {
        let temp = TempDir::new().unwrap();
        assert!(!looks_like_users_root(temp.path()));
    }

    #[test]
    fn test_rejects_users_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("users"), "not a dir").unwrap();
        assert!(!looks_like_users_root(temp.path()));
    }

    #[test]
    fn test_rejects_empty_users_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("users")).unwrap();
        assert!(!looks_like_users_root(temp.path()));
    }

    #[test]
    fn test_accepts_mobile_named_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("users").join("1234567890")).unwrap();
        assert!(looks_like_users_root(temp.path()));
    }

    #[test]
    fn test_accepts_upload_prefix_under_named_user() {
        let temp = TempDir::new().unwrap();
        let uploads = temp.path().join("users").join("alice").join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        fs::write(uploads.join("1234567890_20240101_1.jpg"), b"x").unwrap();

        assert!(looks_like_users_root(temp.path()));
    }

    #[test]
    fn test_rejects_non_mobile_layout() {
        let temp = TempDir::new().unwrap();
        let uploads = temp.path().join("users").join("alice").join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        fs::write(uploads.join("holiday.jpg"), b"x").unwrap();
        fs::create_dir_all(temp.path().join("users").join("12345")).unwrap();

        assert!(!looks_like_users_root(temp.path()));
    }

    #[test]
    fn test_nested_upload_names_skips_hidden_and_files() {
        let temp = TempDir::new().unwrap();
        let users = temp.path().join("users");
        let uploads = users.join("bob").join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        fs::write(uploads.join("1111111111_a.jpg"), b"x").unwrap();
        fs::write(uploads.join(".DS_Store"), b"x").unwrap();
        fs::write(users.join("stray.txt"), b"x").unwrap();
        let hidden = users.join(".cache").join("uploads");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("2222222222_b.jpg"), b"x").unwrap();

        let names = nested_upload_names(&users);

        assert_eq!(names.items, vec!["1111111111_a.jpg".to_owned()]);
        assert!(names.is_clean());
    }
}
