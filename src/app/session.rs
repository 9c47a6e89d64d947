//! Interaction controller: output levels, dry-run reporting, and step confirmation.

use console::style;

use crate::domain::{AppError, InteractionMode};
use crate::ports::Prompter;

/// User-facing side of a run.
///
/// Built once from the parsed flags and shared by reference with every command.
pub struct Session {
    mode: InteractionMode,
    prompter: Box<dyn Prompter>,
}

impl Session {
    pub fn new(mode: InteractionMode, prompter: Box<dyn Prompter>) -> Self {
        Self { mode, prompter }
    }

    pub fn is_dry_run(&self) -> bool {
        self.mode.dry_run
    }

    pub fn status(&self, message: impl AsRef<str>) {
        if self.mode.shows_status() {
            println!("{}", message.as_ref());
        }
    }

    pub fn success(&self, message: impl AsRef<str>) {
        if self.mode.shows_status() {
            println!("✅ {}", message.as_ref());
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if self.mode.shows_status() {
            eprintln!("⚠️  {}", message.as_ref());
        }
    }

    pub fn dry_run(&self, action: impl AsRef<str>) {
        if !self.mode.is_very_silent() {
            println!("[dry-run] {}", action.as_ref());
        }
    }

    /// Ask a yes/no question. Very silent runs take the default without asking.
    pub fn confirm(&self, question: &str, default: bool) -> Result<bool, AppError> {
        if self.mode.is_very_silent() {
            return Ok(default);
        }
        self.prompter.confirm(question, default)
    }

    /// Pause before a major action in step mode; declining aborts the run.
    ///
    /// Very silent runs take the default and continue without asking.
    pub fn step(&self, action: &str) -> Result<(), AppError> {
        if !self.mode.step || self.mode.is_very_silent() {
            return Ok(());
        }
        if self.prompter.confirm(&format!("Next: {}. Continue?", action), true)? {
            Ok(())
        } else {
            Err(AppError::Aborted)
        }
    }

    /// Run a mutating action, or report it in dry-run mode.
    pub fn perform<T>(
        &self,
        action: &str,
        f: impl FnOnce() -> Result<T, AppError>,
    ) -> Result<Option<T>, AppError> {
        if self.mode.dry_run {
            self.dry_run(action);
            return Ok(None);
        }
        self.step(action)?;
        tracing::info!(action, "performing");
        f().map(Some)
    }
}

/// Errors are shown unless very silent, highlighted when stderr is a terminal.
pub fn print_error(mode: InteractionMode, message: &str) {
    if !mode.is_very_silent() {
        eprintln!("{}", style(format!("Error: {}", message)).red().bold().for_stderr());
    }
}
