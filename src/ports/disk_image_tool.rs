use std::path::Path;

use crate::domain::AppError;

/// Port for the OS disk image mechanism.
pub trait DiskImageTool {
    /// Attach the image and return the tool's raw output.
    fn attach(&self, image: &Path) -> Result<String, AppError>;

    /// Detach a previously attached volume.
    fn detach(&self, mount_point: &Path) -> Result<(), AppError>;

    /// Copy a bundle out of a volume, preserving resource forks and extended attributes.
    fn copy_bundle(&self, source: &Path, dest: &Path) -> Result<(), AppError>;
}
