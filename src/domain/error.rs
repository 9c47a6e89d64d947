use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for calibre-portable operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configuration value was rejected.
    #[error("Invalid setting '{key}': {reason}")]
    Validation { key: String, reason: String },

    /// No disk image link found on the download page.
    #[error("No download link matching '*.dmg' found on {page}")]
    Discovery { page: String },

    /// Downloading the disk image failed.
    #[error("Download of {url} failed: {details}")]
    Download { url: String, details: String },

    /// Mounting the disk image failed or produced no volume path.
    #[error("Mounting {image} failed: {details}")]
    Mount { image: PathBuf, details: String },

    /// The application bundle is missing from the mounted volume.
    #[error("{bundle} not found on mounted volume {volume}")]
    BundleNotFound { bundle: String, volume: PathBuf },

    /// An external tool could not be run or exited unsuccessfully.
    #[error("{tool} failed: {error}")]
    ExternalTool { tool: String, error: String },

    /// Rendering an embedded template failed.
    #[error("Failed to render {name}: {details}")]
    Template { name: String, details: String },

    /// Reading an interactive answer failed.
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// The user declined to continue at a step prompt.
    #[error("Aborted by user")]
    Aborted,

    /// The run was interrupted (SIGINT).
    #[error("Interrupted")]
    Interrupted,
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub(crate) fn validation(key: &str, reason: impl Into<String>) -> Self {
        AppError::Validation { key: key.to_string(), reason: reason.into() }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Aborted => 0,
            AppError::Interrupted => 130,
            _ => 1,
        }
    }
}
