use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use crate::domain::AppError;
use crate::domain::profile;
use crate::ports::DiskImageTool;

/// Simulates `hdiutil` with a real directory standing in for the mounted volume.
pub struct FakeDiskImage {
    _root: TempDir,
    volume: PathBuf,
    attach_output: String,
    pub calls: Mutex<Vec<String>>,
    on_attach: Option<Box<dyn Fn() + Send + Sync>>,
}

impl FakeDiskImage {
    /// Volume containing a bundle whose executable holds `marker`.
    pub fn with_bundle(marker: &str) -> Self {
        let fake = Self::empty_volume();
        let exe_dir = fake.volume.join(profile::BUNDLE_NAME).join(profile::BUNDLE_EXECUTABLE_DIR);
        fs::create_dir_all(&exe_dir).unwrap();
        fs::write(exe_dir.join(profile::EXECUTABLE_NAME), marker).unwrap();
        fake
    }

    /// Volume mounts but holds no bundle.
    pub fn empty_volume() -> Self {
        let root = TempDir::new().unwrap();
        let volume = root.path().join("calibre-8.1.0");
        fs::create_dir_all(&volume).unwrap();
        let attach_output = format!(
            "/dev/disk9\tGUID_partition_scheme\t\n/dev/disk9s1\tApple_HFS\t{}\n",
            volume.display()
        );
        Self { _root: root, volume, attach_output, calls: Mutex::new(Vec::new()), on_attach: None }
    }

    /// Attach succeeds but reports no mounted volume.
    pub fn without_mount_point() -> Self {
        let mut fake = Self::empty_volume();
        fake.attach_output = "/dev/disk9\tGUID_partition_scheme\t\n".to_string();
        fake
    }

    pub fn on_attach(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_attach = Some(Box::new(hook));
        self
    }

    pub fn volume(&self) -> &Path {
        &self.volume
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn detach_count(&self) -> usize {
        self.calls().iter().filter(|call| call.starts_with("detach")).count()
    }
}

impl DiskImageTool for FakeDiskImage {
    fn attach(&self, image: &Path) -> Result<String, AppError> {
        assert!(image.is_file(), "image must be downloaded before attach");
        self.calls.lock().unwrap().push(format!("attach {}", image.display()));
        if let Some(hook) = &self.on_attach {
            hook();
        }
        Ok(self.attach_output.clone())
    }

    fn detach(&self, mount_point: &Path) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(format!("detach {}", mount_point.display()));
        Ok(())
    }

    fn copy_bundle(&self, source: &Path, dest: &Path) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(format!("copy {}", source.display()));
        copy_tree(source, dest)?;
        Ok(())
    }
}

fn copy_tree(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}
