//! First-run setup for a base directory without a settings file.

use std::fs;

use crate::app::AppContext;
use crate::app::commands::{install, launcher};
use crate::domain::{AppError, Executable, ResolvedPaths};
use crate::ports::{DiskImageTool, ProcessLauncher, ReleaseSource};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub installed: bool,
    pub launcher_written: bool,
}

/// Create the default directories, write a commented settings file, then offer to install
/// calibre and to write the launcher.
pub fn execute<R, D, L>(ctx: &AppContext<R, D, L>) -> Result<BootstrapOutcome, AppError>
where
    R: ReleaseSource,
    D: DiskImageTool,
    L: ProcessLauncher,
{
    let session = ctx.session();
    let base = ctx.base_dir();
    session.status(format!("Setting up a portable calibre in {}", base.display()));

    for dir in ctx.config().bootstrap_dirs(base) {
        if dir.is_dir() {
            continue;
        }
        session.perform(&format!("create directory {}", dir.display()), || {
            fs::create_dir_all(&dir).map_err(AppError::from)
        })?;
    }

    let config_path = ctx.config_path();
    let settings = launcher::render_config(base, &ResolvedPaths::default(), ctx.config())?;
    session.perform(&format!("write settings {}", config_path.display()), || {
        fs::write(&config_path, &settings).map_err(AppError::from)
    })?;

    let mut outcome = BootstrapOutcome::default();

    let already_installed = matches!(ctx.resolve_paths().executable, Executable::Managed(_));
    if !already_installed && session.confirm("Download and install calibre now?", true)? {
        install::execute(ctx)?;
        outcome.installed = !session.is_dry_run();
    }

    if session.confirm("Create a launcher for future runs?", true)? {
        let resolved = ctx.resolve_paths();
        outcome.launcher_written = launcher::execute(ctx, &resolved)?.written;
    }

    Ok(outcome)
}
