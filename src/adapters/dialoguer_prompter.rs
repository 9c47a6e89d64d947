//! Terminal prompts using dialoguer.

use std::io::{ErrorKind, IsTerminal};

use dialoguer::{Confirm, Error as DialoguerError};

use crate::domain::AppError;
use crate::ports::Prompter;

/// Asks on the terminal. Without a terminal on stdin the default answer is taken.
#[derive(Debug, Clone, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool, AppError> {
        if !std::io::stdin().is_terminal() {
            tracing::debug!(question, default, "stdin is not a terminal; using default answer");
            return Ok(default);
        }

        match Confirm::new().with_prompt(question).default(default).interact() {
            Ok(answer) => Ok(answer),
            Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => {
                Err(AppError::Interrupted)
            }
            Err(err) => Err(AppError::Prompt(err.to_string())),
        }
    }
}
