//! Persisted approval flags.
//!
//! One JSON object maps a normalised absolute path to `true`/`false`:
//!
//! ```json
//! {"/data/users/0123456789/uploads/0123456789_1.jpg": true}
//! ```
//!
//! The file is read once when the store is loaded and rewritten whole on every toggle.
//! There is no locking; two processes toggling at the same time lose one update.

use crate::{AdminError, AdminResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// In-memory approval map backed by a sidecar file.
#[derive(Debug)]
pub struct ApprovalStore {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

impl ApprovalStore {
    /// Loads the sidecar at `path`. A missing or malformed file starts an empty map.
    pub fn load(path: &Path) -> Self {
        let flags = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed approvals {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            flags,
        }
    }

    /// Location of the sidecar file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flips the flag for `file` (unset counts as unapproved) and persists the map.
    ///
    /// # Returns
    ///
    /// The new flag value.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::ApprovalsWrite` if the sidecar cannot be written. The
    /// in-memory flag is restored first, so memory and disk stay in step.
    pub fn toggle(&mut self, file: &Path) -> AdminResult<bool> {
        let key = approval_key(file);
        let previous = self.flags.get(&key).copied();
        let approved = !previous.unwrap_or(false);
        self.flags.insert(key.clone(), approved);

        if let Err(e) = self.save() {
            match previous {
                Some(flag) => self.flags.insert(key, flag),
                None => self.flags.remove(&key),
            };
            return Err(e);
        }

        tracing::info!(
            "{} {}",
            if approved { "approved" } else { "unapproved" },
            key
        );
        Ok(approved)
    }

    pub fn is_approved(&self, file: &Path) -> bool {
        self.flags
            .get(&approval_key(file))
            .copied()
            .unwrap_or(false)
    }

    /// Every path whose flag is `true`.
    pub fn approved(&self) -> Vec<PathBuf> {
        self.paths_with(true)
    }

    /// Every path toggled at least once whose flag is now `false`.
    pub fn unapproved(&self) -> Vec<PathBuf> {
        self.paths_with(false)
    }

    /// The raw map, keyed by normalised path.
    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    fn paths_with(&self, wanted: bool) -> Vec<PathBuf> {
        self.flags
            .iter()
            .filter(|(_, &flag)| flag == wanted)
            .map(|(path, _)| PathBuf::from(path))
            .collect()
    }

    fn save(&self) -> AdminResult<()> {
        let json = serde_json::to_string(&self.flags).map_err(AdminError::Serialization)?;
        fs::write(&self.path, json).map_err(AdminError::ApprovalsWrite)
    }
}

fn approval_key(file: &Path) -> String {
    normalize_path(file).to_string_lossy().into_owned()
}

/// Makes `path` absolute and removes `.` and `..` components without touching the disk.
///
/// Symlinks are not resolved, so a flag survives the file being moved away and back.
/// Relative paths are anchored at the current directory; if that is unavailable the
/// path is only cleaned.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/data/users/./1234567890/../1234567890/uploads/a.jpg")),
            PathBuf::from("/data/users/1234567890/uploads/a.jpg")
        );
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("/a/b/")), PathBuf::from("/a/b"));
        assert!(normalize_path(Path::new("relative/x.jpg")).is_absolute());
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let temp = TempDir::new().unwrap();
        let sidecar = temp.path().join("approved.json");
        let file = Path::new("/data/users/1234567890/uploads/1234567890_1.jpg");
        let mut store = ApprovalStore::load(&sidecar);

        assert!(!store.is_approved(file));
        assert!(store.toggle(file).unwrap());
        assert!(store.is_approved(file));
        assert_eq!(
            fs::read_to_string(&sidecar).unwrap(),
            r#"{"/data/users/1234567890/uploads/1234567890_1.jpg":true}"#
        );

        assert!(!store.toggle(file).unwrap());
        assert!(!store.is_approved(file));
        assert_eq!(
            fs::read_to_string(&sidecar).unwrap(),
            r#"{"/data/users/1234567890/uploads/1234567890_1.jpg":false}"#
        );
    }

    #[test]
    fn test_equivalent_paths_share_a_flag() {
        let temp = TempDir::new().unwrap();
        let mut store = ApprovalStore::load(&temp.path().join("approved.json"));

        store.toggle(Path::new("/data/u/./a.jpg")).unwrap();

        assert!(store.is_approved(Path::new("/data/u/a.jpg")));
        assert!(store.is_approved(Path::new("/data/x/../u/a.jpg")));
    }

    #[test]
    fn test_partition_only_lists_toggled_paths() {
        let temp = TempDir::new().unwrap();
        let mut store = ApprovalStore::load(&temp.path().join("approved.json"));

        store.toggle(Path::new("/d/a.jpg")).unwrap();
        store.toggle(Path::new("/d/b.jpg")).unwrap();
        store.toggle(Path::new("/d/b.jpg")).unwrap();

        assert_eq!(store.approved(), vec![PathBuf::from("/d/a.jpg")]);
        assert_eq!(store.unapproved(), vec![PathBuf::from("/d/b.jpg")]);
        assert!(!store.is_approved(Path::new("/d/never.jpg")));
    }

    #[test]
    fn test_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let sidecar = temp.path().join("approved.json");
        let mut store = ApprovalStore::load(&sidecar);
        store.toggle(Path::new("/d/a.jpg")).unwrap();
        store.toggle(Path::new("/d/b.mp4")).unwrap();
        store.toggle(Path::new("/d/b.mp4")).unwrap();

        let reloaded = ApprovalStore::load(&sidecar);

        assert_eq!(reloaded.flags(), store.flags());
    }

    #[test]
    fn test_malformed_sidecar_starts_empty() {
        let temp = TempDir::new().unwrap();
        let sidecar = temp.path().join("approved.json");
        fs::write(&sidecar, "[1, 2, 3]").unwrap();

        let store = ApprovalStore::load(&sidecar);

        assert!(store.flags().is_empty());
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let temp = TempDir::new().unwrap();
        let sidecar = temp.path().join("missing-dir").join("approved.json");
        let mut store = ApprovalStore::load(&sidecar);

        let result = store.toggle(Path::new("/d/a.jpg"));

        assert!(matches!(result, Err(AdminError::ApprovalsWrite(_))));
        assert!(!store.is_approved(Path::new("/d/a.jpg")));
        assert!(store.flags().is_empty());
    }
}
