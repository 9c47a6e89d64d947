//! calibre-portable: run calibre from a self-contained, relocatable directory.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    Action, create_launcher_at, default_base_dir, run, start_at, upgrade_install_at,
};
pub use app::commands::install::InstallOutcome;
pub use app::commands::launcher::LauncherOutcome;
pub use app::commands::start::StartOutcome;
pub use domain::{AppError, InteractionMode, ResolvedPaths, RunConfig, Verbosity};
