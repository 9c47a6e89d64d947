//! Start calibre with the portable environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::AppContext;
use crate::app::session::Session;
use crate::domain::profile;
use crate::domain::{AppError, ResolvedPaths, RunConfig};
use crate::ports::{DiskImageTool, LaunchCommand, ProcessLauncher, ReleaseSource};

/// Result of a start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started(LaunchCommand),
    /// Dry run; the command was printed instead of run.
    Planned(LaunchCommand),
    Declined,
}

/// Confirm, clear stale temp files, and start calibre detached.
pub fn execute<R, D, L>(
    ctx: &AppContext<R, D, L>,
    resolved: &ResolvedPaths,
) -> Result<StartOutcome, AppError>
where
    R: ReleaseSource,
    D: DiskImageTool,
    L: ProcessLauncher,
{
    let session = ctx.session();
    let config = ctx.config();

    if config.confirm_start() && !session.confirm("Start calibre?", true)? {
        session.status("Not starting calibre.");
        return Ok(StartOutcome::Declined);
    }

    if config.cleanup() {
        if let Some(temp) = &resolved.temp {
            match resolved.temp_cleanup_conflict(ctx.base_dir(), &ctx.bin_dir()) {
                Some(reason) => {
                    session.warn(format!("Not clearing {}: {}", temp.display(), reason))
                }
                None => clear_directory(session, temp)?,
            }
        }
    }

    let command = build_command(resolved, config);
    let spawned =
        session.perform(&format!("start {}", command), || ctx.launcher().spawn_detached(&command))?;
    match spawned {
        Some(()) => {
            session.success("calibre started");
            Ok(StartOutcome::Started(command))
        }
        None => Ok(StartOutcome::Planned(command)),
    }
}

/// Program, library argument, and environment for the resolved paths.
pub fn build_command(resolved: &ResolvedPaths, config: &RunConfig) -> LaunchCommand {
    let mut args = Vec::new();
    if let Some(library) = &resolved.library {
        args.push(profile::LIBRARY_ARG.to_string());
        args.push(library.display().to_string());
    }
    LaunchCommand {
        program: resolved.executable.program(),
        args,
        env: resolved.environment(config.interface_language.as_deref()),
    }
}

fn clear_directory(session: &Session, dir: &Path) -> Result<(), AppError> {
    let entries: Vec<PathBuf> =
        fs::read_dir(dir)?.filter_map(|e| e.ok().map(|e| e.path())).collect();
    if entries.is_empty() {
        return Ok(());
    }

    session.perform(
        &format!("remove {} stale item(s) from {}", entries.len(), dir.display()),
        || {
            for entry in &entries {
                let is_dir = fs::symlink_metadata(entry).map(|m| m.is_dir()).unwrap_or(false);
                if is_dir {
                    fs::remove_dir_all(entry)?;
                } else {
                    fs::remove_file(entry)?;
                }
            }
            Ok(())
        },
    )?;
    Ok(())
}
