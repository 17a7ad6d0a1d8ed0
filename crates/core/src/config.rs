//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Environment variables, the home directory and platform facts
//! are collected by the binary and handed over here; nothing in the core reads process-wide
//! state while serving a request.

use crate::constants::{
    ANDROID_FALLBACK_STORAGE, APPROVALS_FILENAME, APP_FOLDER_NAME, MAX_APPDATA_ENTRIES,
    SETTINGS_DIR_NAME, SETTINGS_FILENAME, WINDOWS_APP_NAMES,
};
use crate::discovery::looks_like_users_root;
use crate::{AdminError, AdminResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Platform family, which decides where a data root is searched for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Android,
    /// Linux, macOS and anything else with a conventional home directory
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Unix
        }
    }
}

/// Inputs for locating a data root when none has been saved.
#[derive(Clone, Debug)]
pub struct RootSearch {
    platform: Platform,
    home_dir: PathBuf,
    override_root: Option<PathBuf>,
    local_app_data: Option<PathBuf>,
    roaming_app_data: Option<PathBuf>,
    external_storage: Option<PathBuf>,
}

impl RootSearch {
    pub fn new(platform: Platform, home_dir: PathBuf) -> Self {
        Self {
            platform,
            home_dir,
            override_root: None,
            local_app_data: None,
            roaming_app_data: None,
            external_storage: None,
        }
    }

    /// Candidate root supplied by the operator (`MYCAM_USERS_ROOT`).
    pub fn with_override_root(mut self, path: Option<PathBuf>) -> Self {
        self.override_root = path;
        self
    }

    /// Windows `%LOCALAPPDATA%` and `%APPDATA%`.
    pub fn with_app_data(mut self, local: Option<PathBuf>, roaming: Option<PathBuf>) -> Self {
        self.local_app_data = local;
        self.roaming_app_data = roaming;
        self
    }

    /// Android primary external storage (`EXTERNAL_STORAGE`).
    pub fn with_external_storage(mut self, path: Option<PathBuf>) -> Self {
        self.external_storage = path;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// `~/MyCameraApp`, used when nothing better is found.
    pub fn fallback_root(&self) -> PathBuf {
        self.home_dir.join(APP_FOLDER_NAME)
    }

    /// Shared-storage root on Android: `<external storage>/MyCameraApp`.
    pub fn android_shared_root(&self) -> PathBuf {
        self.external_storage
            .clone()
            .unwrap_or_else(|| PathBuf::from(ANDROID_FALLBACK_STORAGE))
            .join(APP_FOLDER_NAME)
    }

    /// Platform-specific directories probed with [`looks_like_users_root`], in order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        match self.platform {
            Platform::Windows => self.windows_candidates(),
            Platform::Android => vec![self.android_shared_root()],
            Platform::Unix => vec![
                self.home_dir.join(".local").join("share").join("PhotoApp"),
                self.home_dir.join(APP_FOLDER_NAME),
            ],
        }
    }

    fn windows_candidates(&self) -> Vec<PathBuf> {
        let local = self
            .local_app_data
            .clone()
            .unwrap_or_else(|| self.home_dir.join("AppData").join("Local"));
        let roaming = self
            .roaming_app_data
            .clone()
            .unwrap_or_else(|| self.home_dir.join("AppData").join("Roaming"));

        let mut candidates = Vec::new();
        for base in [&local, &roaming] {
            for app_name in WINDOWS_APP_NAMES {
                candidates.push(base.join(app_name));
            }
        }
        for base in [&local, &roaming] {
            if let Ok(entries) = fs::read_dir(base) {
                candidates.extend(
                    entries
                        .take(MAX_APPDATA_ENTRIES)
                        .flatten()
                        .map(|entry| entry.path()),
                );
            }
        }
        candidates.push(self.home_dir.join(APP_FOLDER_NAME));
        candidates
    }

    /// Picks a data root.
    ///
    /// Order: a valid override, then (Android only) the shared-storage root without
    /// validation, then the first valid platform candidate, then [`Self::fallback_root`].
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.override_root {
            if looks_like_users_root(path) {
                tracing::debug!("using data root from override: {}", path.display());
                return path.clone();
            }
            tracing::warn!(
                "ignoring override {}: no users/ directory with mobile-numbered entries",
                path.display()
            );
        }

        if self.platform == Platform::Android {
            return self.android_shared_root();
        }

        if let Some(found) = self
            .candidates()
            .into_iter()
            .find(|p| looks_like_users_root(p))
        {
            tracing::debug!("found data root at {}", found.display());
            return found;
        }

        let fallback = self.fallback_root();
        tracing::debug!("no data root found, falling back to {}", fallback.display());
        fallback
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct AdminConfig {
    settings_dir: PathBuf,
    explicit_root: Option<PathBuf>,
    root_search: RootSearch,
}

impl AdminConfig {
    /// Create a new `AdminConfig`.
    pub fn new(settings_dir: PathBuf, root_search: RootSearch) -> Self {
        Self {
            settings_dir,
            explicit_root: None,
            root_search,
        }
    }

    /// Pins the data root, bypassing the saved setting and the search.
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.explicit_root = Some(root);
        self
    }

    /// `<home>/.admin_mycam`
    pub fn default_settings_dir(home_dir: &Path) -> PathBuf {
        home_dir.join(SETTINGS_DIR_NAME)
    }

    pub fn settings_dir(&self) -> &Path {
        &self.settings_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings_dir.join(SETTINGS_FILENAME)
    }

    pub fn approvals_path(&self) -> PathBuf {
        self.settings_dir.join(APPROVALS_FILENAME)
    }

    pub fn explicit_root(&self) -> Option<&Path> {
        self.explicit_root.as_deref()
    }

    pub fn root_search(&self) -> &RootSearch {
        &self.root_search
    }

    pub fn home_dir(&self) -> &Path {
        self.root_search.home_dir()
    }
}

/// Contents of `settings.json`.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct Settings {
    #[serde(default)]
    root: Option<PathBuf>,
}

/// Reads the saved root, if any. Missing or malformed files yield `None`.
pub(crate) fn load_saved_root(settings_path: &Path) -> Option<PathBuf> {
    let contents = fs::read_to_string(settings_path).ok()?;
    match serde_json::from_str::<Settings>(&contents) {
        Ok(settings) => settings.root,
        Err(e) => {
            tracing::warn!(
                "ignoring malformed settings {}: {}",
                settings_path.display(),
                e
            );
            None
        }
    }
}

/// Writes `{"root": <path>}` to `settings_path`, creating its directory.
pub(crate) fn save_root(settings_path: &Path, root: &Path) -> AdminResult<()> {
    if let Some(parent) = settings_path.parent() {
        fs::create_dir_all(parent).map_err(|source| AdminError::StorageDirCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let settings = Settings {
        root: Some(root.to_path_buf()),
    };
    let json = serde_json::to_string(&settings).map_err(AdminError::Serialization)?;
    fs::write(settings_path, json).map_err(AdminError::SettingsWrite)
}
