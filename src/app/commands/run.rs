//! Top-level dispatch for a single invocation.

use crate::app::AppContext;
use crate::app::commands::{bootstrap, install, launcher, start};
use crate::app::session::Session;
use crate::domain::{AppError, DirectoryRole, Executable, ResolvedPaths};
use crate::ports::{DiskImageTool, ProcessLauncher, ReleaseSource};

/// What the invocation was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Resolve paths and start calibre, bootstrapping on first run.
    #[default]
    Start,
    /// Install or replace the bundle, then exit.
    UpgradeInstall,
    /// Write the launcher and settings file, then exit.
    CreateLauncher,
}

/// Run `action`. `first_run` is set when no settings file existed.
pub fn execute<R, D, L>(
    ctx: &AppContext<R, D, L>,
    action: Action,
    first_run: bool,
) -> Result<(), AppError>
where
    R: ReleaseSource,
    D: DiskImageTool,
    L: ProcessLauncher,
{
    tracing::debug!(?action, first_run, base = %ctx.base_dir().display(), "dispatching");
    match action {
        Action::UpgradeInstall => {
            install::execute(ctx)?;
            Ok(())
        }
        Action::CreateLauncher => {
            let resolved = ctx.resolve_paths();
            launcher::execute(ctx, &resolved)?;
            Ok(())
        }
        Action::Start => start_session(ctx, first_run),
    }
}

fn start_session<R, D, L>(ctx: &AppContext<R, D, L>, first_run: bool) -> Result<(), AppError>
where
    R: ReleaseSource,
    D: DiskImageTool,
    L: ProcessLauncher,
{
    let session = ctx.session();
    if first_run {
        bootstrap::execute(ctx)?;
    }

    let mut resolved = ctx.resolve_paths();
    print_summary(session, &resolved);

    if !resolved.executable.is_resolved() {
        session.warn("calibre was found neither in the binary directory nor on PATH");
        if !first_run && session.confirm("Download and install calibre now?", true)? {
            install::execute(ctx)?;
            resolved = ctx.resolve_paths();
        }
    }

    start::execute(ctx, &resolved)?;
    Ok(())
}

fn print_summary(session: &Session, resolved: &ResolvedPaths) {
    for role in DirectoryRole::ALL {
        let shown = match role {
            DirectoryRole::Binary => match &resolved.executable {
                Executable::Managed(exe) => exe.display().to_string(),
                Executable::SearchPath(exe) => format!("{} (from PATH)", exe.display()),
                Executable::Unresolved => "Not found".to_string(),
            },
            _ => resolved
                .get(role)
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "Not found".to_string()),
        };
        session.status(format!("{:<9} {}", format!("{}:", role), shown));
    }

    if resolved.metadata_override().is_some() {
        session.warn(
            "Using the metadata database override; library switching is disabled in calibre",
        );
    }
    for role in resolved.unresolved_roles() {
        // Metadata is optional and Binary was reported above.
        if matches!(role, DirectoryRole::Config | DirectoryRole::Library | DirectoryRole::Temp) {
            session.warn(format!("No {} directory found", role.label().to_lowercase()));
        }
    }
}
