//! CLI Adapter.

use std::path::PathBuf;

use clap::Parser;

use crate::app::api::{self, Action};
use crate::app::logging;
use crate::app::session;
use crate::domain::{AppError, InteractionMode, Verbosity};

#[derive(Parser, Debug)]
#[command(name = "calibre-portable")]
#[command(disable_version_flag = true)]
#[command(
    about = "Run calibre from a self-contained, relocatable directory",
    long_about = None
)]
struct Cli {
    /// Download and install (or replace) calibre, then exit
    #[arg(short = 'u', long)]
    upgrade_install: bool,
    /// Write the launcher script and settings file, then exit
    #[arg(short = 'c', long)]
    create_launcher: bool,
    /// Show more output
    #[arg(short = 'v', long)]
    verbose: bool,
    /// Show all output, including trace diagnostics
    #[arg(short = 'V', long)]
    very_verbose: bool,
    /// Confirm before each major action
    #[arg(short = 'd', long, visible_alias = "step", visible_short_alias = 't')]
    debug: bool,
    /// Print what would be done without changing anything
    #[arg(short = 'r', long)]
    dry_run: bool,
    /// Only show errors and prompts
    #[arg(short = 's', long)]
    silent: bool,
    /// Show nothing and take default answers
    #[arg(short = 'S', long)]
    very_silent: bool,
    /// Directory holding the portable tree (defaults to the executable's directory)
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,
}

impl Cli {
    fn mode(&self) -> InteractionMode {
        InteractionMode {
            verbosity: Verbosity::from_flags(
                self.verbose,
                self.very_verbose,
                self.silent,
                self.very_silent,
            ),
            dry_run: self.dry_run,
            step: self.debug,
        }
    }

    fn action(&self) -> Action {
        if self.upgrade_install {
            Action::UpgradeInstall
        } else if self.create_launcher {
            Action::CreateLauncher
        } else {
            Action::Start
        }
    }
}

pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let mode = cli.mode();
    logging::init(mode.verbosity);

    let action = cli.action();
    let result = match cli.base_dir {
        Some(dir) => Ok(dir),
        None => api::default_base_dir(),
    }
    .and_then(|base_dir| api::run(base_dir, mode, action));

    if let Err(e) = result {
        std::process::exit(report(mode, &e));
    }
}

fn report(mode: InteractionMode, err: &AppError) -> i32 {
    match err {
        AppError::Aborted => {
            if mode.shows_status() {
                println!("Aborted.");
            }
        }
        AppError::Interrupted => session::print_error(mode, "Interrupted; cleaned up"),
        _ => session::print_error(mode, &err.to_string()),
    }
    tracing::debug!(error = ?err, "run failed");
    err.exit_code()
}
