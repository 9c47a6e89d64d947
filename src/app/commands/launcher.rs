//! Generate the relocatable launcher script and refresh the settings file.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::context;

use crate::app::AppContext;
use crate::domain::{AppError, ResolvedPaths, RunConfig};
use crate::ports::{DiskImageTool, ProcessLauncher, ReleaseSource};
use crate::services::templates::{self, CONFIG_TEMPLATE, LAUNCHER_TEMPLATE};

const BASE_DIR_VAR: &str = "$BASE_DIR";

/// Files produced by the launcher writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherOutcome {
    pub launcher: PathBuf,
    pub config: PathBuf,
    /// False on a dry run.
    pub written: bool,
}

/// Write `calibre-portable.command` and `calibre-portable.toml` into the base directory.
///
/// The script runs this binary against its own directory, so settings edits apply to the
/// next launch and the whole tree can be moved.
pub fn execute<R, D, L>(
    ctx: &AppContext<R, D, L>,
    resolved: &ResolvedPaths,
) -> Result<LauncherOutcome, AppError>
where
    R: ReleaseSource,
    D: DiskImageTool,
    L: ProcessLauncher,
{
    let session = ctx.session();
    let base = ctx.base_dir();
    let launcher = ctx.launcher_path();
    let config = ctx.config_path();

    let script = render_launcher(base, &std::env::current_exe()?)?;
    let settings = render_config(base, resolved, ctx.config())?;

    let written = session
        .perform(&format!("write launcher {}", launcher.display()), || {
            write_executable(&launcher, &script)
        })?
        .is_some();
    session.perform(&format!("write settings {}", config.display()), || {
        fs::write(&config, &settings).map_err(AppError::from)
    })?;

    if written {
        session.success(format!("Created {}", launcher.display()));
    }
    Ok(LauncherOutcome { launcher, config, written })
}

/// Settings file text with explicit values active and everything else commented out.
pub fn render_config(
    base: &Path,
    resolved: &ResolvedPaths,
    config: &RunConfig,
) -> Result<String, AppError> {
    templates::render(
        CONFIG_TEMPLATE,
        context! {
            entries => config.entries(base, resolved),
            version => env!("CARGO_PKG_VERSION"),
            generated_at => templates::generated_at(),
        },
    )
}

fn render_launcher(base: &Path, program: &Path) -> Result<String, AppError> {
    templates::render(
        LAUNCHER_TEMPLATE,
        context! {
            program => shell_value(base, program),
            version => env!("CARGO_PKG_VERSION"),
            generated_at => templates::generated_at(),
        },
    )
}

/// Value for a double-quoted shell word, anchored at `$BASE_DIR` when under `base`.
fn shell_value(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) if rel.as_os_str().is_empty() => BASE_DIR_VAR.to_string(),
        Ok(rel) => {
            format!("{}/{}", BASE_DIR_VAR, escape_double_quoted(&rel.display().to_string()))
        }
        Err(_) => escape_double_quoted(&path.display().to_string()),
    }
}

fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn write_executable(path: &Path, content: &str) -> Result<(), AppError> {
    fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}
