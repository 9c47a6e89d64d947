mod disk_image_stub;
mod launcher_stub;
mod prompter_stub;
mod release_source_stub;

pub use self::disk_image_stub::FakeDiskImage;
pub use self::launcher_stub::RecordingLauncher;
pub use self::prompter_stub::ScriptedPrompter;
pub use self::release_source_stub::FakeReleaseSource;
