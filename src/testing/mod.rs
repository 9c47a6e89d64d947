pub mod ports;

#[allow(unused_imports)]
pub use ports::FakeDiskImage;
#[allow(unused_imports)]
pub use ports::FakeReleaseSource;
#[allow(unused_imports)]
pub use ports::RecordingLauncher;
#[allow(unused_imports)]
pub use ports::ScriptedPrompter;
