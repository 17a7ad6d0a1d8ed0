//! The upload repository.
//!
//! [`UploadRepository`] is the single stateful object of the admin tooling. It binds to
//! one data root, enumerates users and their uploads from the directory convention,
//! archives users into `trash/`, and owns the approval flags.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//!   users/
//!     <mobile>/
//!       profile.json          # optional, {"mobile": "..."}
//!       uploads/
//!         <mobile>_<anything>.<ext>
//!   trash/
//!     <unix_ts>_<mobile>/     # archived user directories
//! ```
//!
//! ## Failure model
//!
//! Enumeration never fails: missing directories read as empty, and anything else that
//! goes wrong is reported on the returned [`Listing`]. `set_root` and `delete_user`
//! answer with a plain `bool`. Writes the caller must know about (approval flags,
//! exports) return `AdminResult`.
//!
//! Everything runs synchronously on the caller's thread with no locking.

use crate::approvals::{normalize_path, ApprovalStore};
use crate::config::{load_saved_root, save_root, AdminConfig};
use crate::constants::{
    PROFILE_JSON_FILENAME, TRASH_DIR_NAME, UPLOADS_DIR_NAME, USERS_DIR_NAME,
};
use crate::discovery::{looks_like_users_root, nested_upload_names};
use crate::listing::Listing;
use crate::upload::{ApprovalFilter, ExportSummary, Upload, UploadDetails};
use crate::{AdminError, AdminResult};
use chrono::Utc;
use mycam_files::{ExportService, FileDetails, DOWNLOADS_DIR_NAME, EXPORTS_DIR_NAME};
use mycam_types::{MediaType, MobileNumber};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Filesystem-backed repository of users, uploads and approval flags.
#[derive(Debug)]
pub struct UploadRepository {
    cfg: AdminConfig,
    root: PathBuf,
    users_dir: PathBuf,
    trash_dir: PathBuf,
    approvals: ApprovalStore,
}

impl UploadRepository {
    /// Opens the repository described by `cfg`.
    ///
    /// The data root is, in order of preference: the root pinned on the config, the
    /// saved root from `settings.json` if it still looks like a data root, or the result
    /// of the platform search. `users/` and `trash/` are created beneath it if missing.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::StorageDirCreation` if the settings directory, `users/` or
    /// `trash/` cannot be created.
    pub fn open(cfg: AdminConfig) -> AdminResult<Self> {
        create_dir(cfg.settings_dir())?;

        let root = match cfg.explicit_root() {
            Some(root) => root.to_path_buf(),
            None => load_saved_root(&cfg.settings_path())
                .filter(|saved| {
                    let valid = looks_like_users_root(saved);
                    if !valid {
                        tracing::warn!(
                            "saved data root {} no longer looks valid",
                            saved.display()
                        );
                    }
                    valid
                })
                .unwrap_or_else(|| cfg.root_search().resolve()),
        };
        let root = normalize_path(&root);

        let users_dir = root.join(USERS_DIR_NAME);
        let trash_dir = root.join(TRASH_DIR_NAME);
        create_dir(&users_dir)?;
        create_dir(&trash_dir)?;

        let approvals = ApprovalStore::load(&cfg.approvals_path());

        tracing::info!("data root: {}", root.display());
        Ok(Self {
            cfg,
            root,
            users_dir,
            trash_dir,
            approvals,
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.cfg
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users_dir(&self) -> &Path {
        &self.users_dir
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    /// Persists `path` as the saved data root without switching to it.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` if the settings file cannot be written.
    pub fn save_root(&self, path: &Path) -> AdminResult<()> {
        save_root(&self.cfg.settings_path(), path)
    }

    /// Switches to a new data root and saves it.
    ///
    /// Returns `false`, leaving the current root in place, if `path` does not look like
    /// a data root or the setting cannot be saved.
    pub fn set_root(&mut self, path: &Path) -> bool {
        if !looks_like_users_root(path) {
            tracing::warn!("rejected data root {}", path.display());
            return false;
        }

        let root = normalize_path(path);
        if let Err(e) = self.save_root(&root) {
            tracing::warn!("could not save data root {}: {}", root.display(), e);
            return false;
        }

        self.users_dir = root.join(USERS_DIR_NAME);
        self.trash_dir = root.join(TRASH_DIR_NAME);
        self.root = root;
        tracing::info!("data root set to {}", self.root.display());
        true
    }

    /// Lists every user, sorted and without duplicates.
    ///
    /// Users come from `users/` subdirectories named with a mobile number, or from the
    /// `mobile` field of `profile.json` inside other subdirectories. If neither yields
    /// anything, upload filename prefixes under `users/*/uploads/` are used instead.
    pub fn list_users(&self) -> Listing<MobileNumber> {
        let mut listing = Listing::default();
        let mut found = BTreeSet::new();

        match fs::read_dir(&self.users_dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(e) => {
                            listing.suppress_io(&self.users_dir, &e);
                            continue;
                        }
                    };

                    let path = entry.path();
                    if !path.is_dir() {
                        continue;
                    }

                    let name = entry.file_name();
                    if let Some(mobile) = name.to_str().and_then(|n| MobileNumber::parse(n).ok()) {
                        found.insert(mobile);
                    } else if let Some(mobile) =
                        read_profile_mobile(&path.join(PROFILE_JSON_FILENAME), &mut listing)
                    {
                        found.insert(mobile);
                    }
                }
            }
            Err(e) => listing.suppress_io(&self.users_dir, &e),
        }

        if found.is_empty() {
            let names = listing.absorb(nested_upload_names(&self.users_dir));
            found.extend(
                names
                    .iter()
                    .filter_map(|name| MobileNumber::from_upload_name(name)),
            );
        }

        listing.items = found.into_iter().collect();
        listing
    }

    /// Users whose mobile number contains `query`. A blank query matches everyone.
    pub fn search_users(&self, query: &str) -> Listing<MobileNumber> {
        let blank = query.trim().is_empty();
        self.list_users()
            .retain(|mobile| blank || mobile.as_str().contains(query))
    }

    /// `<root>/users/<mobile>/uploads`
    pub fn uploads_dir(&self, mobile: &MobileNumber) -> PathBuf {
        self.users_dir.join(mobile.as_str()).join(UPLOADS_DIR_NAME)
    }

    /// Lists a user's uploads, most recent first.
    ///
    /// Only regular files directly in the uploads directory whose name starts with
    /// `<mobile>_` and whose extension is a known image or video extension are included.
    /// Files with equal timestamps keep filename order.
    pub fn list_uploads_for_user(&self, mobile: &MobileNumber) -> Listing<Upload> {
        let mut listing = Listing::default();
        let dir = self.uploads_dir(mobile);

        let entries = match fs::read_dir(&dir) {
            Ok(it) => it,
            Err(e) => {
                listing.suppress_io(&dir, &e);
                return listing;
            }
        };

        let prefix = mobile.upload_prefix();
        let mut candidates: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                        continue;
                    };
                    if name.starts_with(&prefix) {
                        candidates.push((name, entry.path()));
                    }
                }
                Err(e) => listing.suppress_io(&dir, &e),
            }
        }
        candidates.sort();

        for (_, path) in candidates {
            let Some(media_type) = MediaType::from_path(&path) else {
                continue;
            };
            let metadata = match fs::metadata(&path) {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    listing.suppress_io(&path, &e);
                    continue;
                }
            };
            let created_at = metadata
                .modified()
                .map(unix_secs)
                .unwrap_or_else(|_| unix_secs(SystemTime::now()));
            listing.items.push(Upload::new(path, media_type, created_at));
        }

        listing
            .items
            .sort_by(|a, b| b.created_at().total_cmp(&a.created_at()));
        listing
    }

    /// [`Self::list_uploads_for_user`] narrowed by approval state.
    pub fn list_uploads_filtered(
        &self,
        mobile: &MobileNumber,
        filter: ApprovalFilter,
    ) -> Listing<Upload> {
        self.list_uploads_for_user(mobile)
            .retain(|upload| filter.admits(self.is_approved(upload.path())))
    }

    /// Moves `users/<mobile>` to `trash/<unix_ts>_<mobile>` with a single rename.
    ///
    /// # Returns
    ///
    /// The archive directory.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` if:
    /// - the user directory does not exist ([`AdminError::UserNotFound`])
    /// - `trash/` cannot be created
    /// - the archive directory already exists or the rename fails
    ///   (for example across filesystems) ([`AdminError::Archive`])
    pub fn archive_user(&self, mobile: &MobileNumber) -> AdminResult<PathBuf> {
        let src = self.users_dir.join(mobile.as_str());
        if !src.is_dir() {
            return Err(AdminError::UserNotFound(mobile.to_string()));
        }

        create_dir(&self.trash_dir)?;
        let dst = self
            .trash_dir
            .join(format!("{}_{}", Utc::now().timestamp(), mobile));

        if dst.exists() {
            return Err(AdminError::Archive {
                from: src,
                to: dst,
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "archive directory already exists",
                ),
            });
        }

        fs::rename(&src, &dst).map_err(|source| AdminError::Archive {
            from: src.clone(),
            to: dst.clone(),
            source,
        })?;

        tracing::info!("archived user {} to {}", mobile, dst.display());
        Ok(dst)
    }

    /// Archives a user; `true` only if the directory was moved.
    pub fn delete_user(&self, mobile: &MobileNumber) -> bool {
        match self.archive_user(mobile) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("delete of user {} failed: {}", mobile, e);
                false
            }
        }
    }

    /// Flips the approval flag of `path` and saves every flag.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::ApprovalsWrite` if the approvals file cannot be written.
    pub fn toggle_approval(&mut self, path: &Path) -> AdminResult<bool> {
        self.approvals.toggle(path)
    }

    pub fn is_approved(&self, path: &Path) -> bool {
        self.approvals.is_approved(path)
    }

    pub fn approved_files(&self) -> Vec<PathBuf> {
        self.approvals.approved()
    }

    pub fn unapproved_files(&self) -> Vec<PathBuf> {
        self.approvals.unapproved()
    }

    pub fn approvals(&self) -> &ApprovalStore {
        &self.approvals
    }

    /// Collects preview information for one file.
    pub fn upload_details(&self, path: &Path) -> UploadDetails {
        let file = FileDetails::inspect(path);
        let user = MobileNumber::from_upload_name(&file.file_name);
        UploadDetails {
            approved: self.is_approved(path),
            file,
            user,
        }
    }

    /// Copies every upload of `mobile` into `destination`.
    ///
    /// Without a destination, a fresh `~/PhotoExports/user_<mobile>_<unix_ts>` is used.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Files` if the destination cannot be created or any copy fails.
    pub fn export_user_uploads(
        &self,
        mobile: &MobileNumber,
        destination: Option<&Path>,
    ) -> AdminResult<ExportSummary> {
        let directory = match destination {
            Some(dir) => dir.to_path_buf(),
            None => self.cfg.home_dir().join(EXPORTS_DIR_NAME).join(format!(
                "user_{}_{}",
                mobile,
                Utc::now().timestamp()
            )),
        };

        let uploads = self.list_uploads_for_user(mobile);
        let service = ExportService::new(&directory)?;
        let files = service.copy_all(uploads.iter().map(Upload::path))?;

        tracing::info!(
            "exported {} files for {} to {}",
            files.len(),
            mobile,
            directory.display()
        );
        Ok(ExportSummary { directory, files })
    }

    /// Copies one file into `destination`, or `~/Downloads` when none is given.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Files` if the source is not a file or the copy fails.
    pub fn download_file(&self, path: &Path, destination: Option<&Path>) -> AdminResult<PathBuf> {
        let directory = match destination {
            Some(dir) => dir.to_path_buf(),
            None => self.cfg.home_dir().join(DOWNLOADS_DIR_NAME),
        };
        let copied = ExportService::new(&directory)?.copy(path)?;
        tracing::info!("downloaded {} to {}", path.display(), copied.display());
        Ok(copied)
    }
}

fn create_dir(path: &Path) -> AdminResult<()> {
    fs::create_dir_all(path).map_err(|source| AdminError::StorageDirCreation {
        path: path.to_path_buf(),
        source,
    })
}

/// Seconds since the Unix epoch, negative for times before it.
fn unix_secs(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Reads the `mobile` field of a `profile.json`, accepting strings or numbers.
///
/// A missing file is silently skipped; unreadable or unparsable files are recorded.
fn read_profile_mobile<T>(profile: &Path, listing: &mut Listing<T>) -> Option<MobileNumber> {
    let contents = match fs::read_to_string(profile) {
        Ok(contents) => contents,
        Err(e) => {
            listing.suppress_io(profile, &e);
            return None;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            listing.suppress_profile(profile, e.to_string());
            return None;
        }
    };

    let mobile = match value.get("mobile") {
        Some(serde_json::Value::String(s)) => s.trim().to_owned(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return None,
    };
    MobileNumber::from_digits_in(&mobile)
}
