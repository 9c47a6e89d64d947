use std::path::{Path, PathBuf};

use crate::app::session::Session;
use crate::domain::paths::search_path_lookup;
use crate::domain::profile;
use crate::domain::{PathCandidates, ResolvedPaths, RunConfig};
use crate::ports::{DiskImageTool, ProcessLauncher, ReleaseSource};

/// Application context holding settings and dependencies for command execution.
pub struct AppContext<R: ReleaseSource, D: DiskImageTool, L: ProcessLauncher> {
    base_dir: PathBuf,
    config: RunConfig,
    session: Session,
    release_source: R,
    disk_image: D,
    launcher: L,
    lookup: fn(&str) -> Option<PathBuf>,
}

impl<R: ReleaseSource, D: DiskImageTool, L: ProcessLauncher> AppContext<R, D, L> {
    /// Create a new application context.
    pub fn new(
        base_dir: PathBuf,
        config: RunConfig,
        session: Session,
        release_source: R,
        disk_image: D,
        launcher: L,
    ) -> Self {
        Self {
            base_dir,
            config,
            session,
            release_source,
            disk_image,
            launcher,
            lookup: search_path_lookup,
        }
    }

    /// Replace the search-path lookup used for the binary fallback.
    pub fn with_lookup(mut self, lookup: fn(&str) -> Option<PathBuf>) -> Self {
        self.lookup = lookup;
        self
    }

    /// Directory that defaults and relative paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn release_source(&self) -> &R {
        &self.release_source
    }

    pub fn disk_image(&self) -> &D {
        &self.disk_image
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(profile::CONFIG_FILE)
    }

    pub fn launcher_path(&self) -> PathBuf {
        self.base_dir.join(profile::LAUNCHER_FILE)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.config.effective_bin_dir(&self.base_dir)
    }

    /// Resolve every directory role against the current filesystem.
    pub fn resolve_paths(&self) -> ResolvedPaths {
        let candidates = PathCandidates::from_config(&self.base_dir, &self.config);
        ResolvedPaths::resolve(&candidates, self.lookup)
    }
}
