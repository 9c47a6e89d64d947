//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::{Path, PathBuf};

use crate::adapters::{
    DetachedProcessLauncher, DialoguerPrompter, HdiutilDiskImage, HttpReleaseSource,
};
use crate::app::AppContext;
use crate::app::commands::run;
use crate::app::session::Session;
use crate::domain::profile;

pub use crate::app::commands::run::Action;
pub use crate::domain::{AppError, InteractionMode, RunConfig, Verbosity};

type SystemContext = AppContext<HttpReleaseSource, HdiutilDiskImage, DetachedProcessLauncher>;

/// Directory holding the running executable.
pub fn default_base_dir() -> Result<PathBuf, AppError> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        AppError::config_error(format!("Cannot determine the directory of {}", exe.display()))
    })
}

/// Run `action` against `base_dir` with the system adapters.
pub fn run(
    base_dir: impl Into<PathBuf>,
    mode: InteractionMode,
    action: Action,
) -> Result<(), AppError> {
    let base_dir = base_dir.into();
    let loaded = RunConfig::load(&base_dir.join(profile::CONFIG_FILE))?;
    let first_run = loaded.is_none();
    let ctx = create_context(base_dir, loaded.unwrap_or_default(), mode)?;
    run::execute(&ctx, action, first_run)
}

/// Install or replace the calibre bundle under `base_dir`.
pub fn upgrade_install_at(
    base_dir: impl Into<PathBuf>,
    mode: InteractionMode,
) -> Result<(), AppError> {
    run(base_dir, mode, Action::UpgradeInstall)
}

/// Write the launcher script and settings file into `base_dir`.
pub fn create_launcher_at(
    base_dir: impl Into<PathBuf>,
    mode: InteractionMode,
) -> Result<(), AppError> {
    run(base_dir, mode, Action::CreateLauncher)
}

/// Start calibre from `base_dir`, bootstrapping it on first use.
pub fn start_at(base_dir: impl Into<PathBuf>, mode: InteractionMode) -> Result<(), AppError> {
    run(base_dir, mode, Action::Start)
}

fn create_context(
    base_dir: PathBuf,
    config: RunConfig,
    mode: InteractionMode,
) -> Result<SystemContext, AppError> {
    let session = Session::new(mode, Box::new(DialoguerPrompter::new()));
    Ok(AppContext::new(
        base_dir,
        config,
        session,
        HttpReleaseSource::new(mode.shows_status())?,
        HdiutilDiskImage::new(),
        DetachedProcessLauncher::new(),
    ))
}
