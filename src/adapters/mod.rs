pub mod detached_launcher;
pub mod dialoguer_prompter;
pub mod hdiutil_disk_image;
pub mod http_release_source;

pub use detached_launcher::DetachedProcessLauncher;
pub use dialoguer_prompter::DialoguerPrompter;
pub use hdiutil_disk_image::HdiutilDiskImage;
pub use http_release_source::HttpReleaseSource;
