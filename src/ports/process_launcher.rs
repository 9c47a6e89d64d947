use std::fmt;
use std::path::PathBuf;

use crate::domain::AppError;

/// Fully assembled application invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(&'static str, String)>,
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={:?} ", key, value)?;
        }
        write!(f, "{:?}", self.program.display().to_string())?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}

/// Port for starting the application without waiting for it.
pub trait ProcessLauncher {
    fn spawn_detached(&self, command: &LaunchCommand) -> Result<(), AppError>;
}
