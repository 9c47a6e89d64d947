mod disk_image_tool;
mod process_launcher;
mod prompter;
mod release_source;

pub use disk_image_tool::DiskImageTool;
pub use process_launcher::{LaunchCommand, ProcessLauncher};
pub use prompter::Prompter;
pub use release_source::ReleaseSource;
