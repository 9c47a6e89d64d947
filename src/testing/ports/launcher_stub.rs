use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::{LaunchCommand, ProcessLauncher};

/// Records launch requests instead of starting processes.
#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<LaunchCommand>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<LaunchCommand> {
        self.launched.lock().unwrap().clone()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn spawn_detached(&self, command: &LaunchCommand) -> Result<(), AppError> {
        self.launched.lock().unwrap().push(command.clone());
        Ok(())
    }
}
