pub mod disk_image;
pub mod error;
pub mod interaction;
pub mod paths;
pub mod profile;
pub mod run_config;

pub use error::AppError;
pub use interaction::{InteractionMode, Verbosity};
pub use paths::{DirectoryRole, Executable, PathCandidates, ResolvedPaths};
pub use run_config::{ConfigEntry, RunConfig};
