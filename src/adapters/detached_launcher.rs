//! Fire-and-forget process start.

use std::process::{Command, Stdio};

use crate::domain::AppError;
use crate::ports::{LaunchCommand, ProcessLauncher};

/// Starts the application in its own process group with null stdio and does not wait.
#[derive(Debug, Clone, Default)]
pub struct DetachedProcessLauncher;

impl DetachedProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for DetachedProcessLauncher {
    fn spawn_detached(&self, command: &LaunchCommand) -> Result<(), AppError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .envs(command.env.iter().map(|(key, value)| (*key, value.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn().map_err(|err| AppError::ExternalTool {
            tool: command.program.display().to_string(),
            error: err.to_string(),
        })?;
        tracing::info!(pid = child.id(), program = %command.program.display(), "started");
        Ok(())
    }
}
