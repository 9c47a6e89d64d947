//! Shared testing harness for `calibre-portable` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const RECORD_TIMEOUT: Duration = Duration::from_secs(10);

/// Isolated portable tree plus a scratch area outside it.
pub(crate) struct TestContext {
    root: TempDir,
    base_dir: PathBuf,
}

impl TestContext {
    /// Create an empty base directory.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let base_dir = root.path().join("portable");
        fs::create_dir_all(&base_dir).expect("Failed to create base directory");
        Self { root, base_dir }
    }

    /// Directory passed as `--base-dir`.
    pub(crate) fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Scratch directory that is not part of the portable tree.
    pub(crate) fn root(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for the compiled binary pointed at the base directory.
    pub(crate) fn cli(&self) -> Command {
        self.cli_for(&self.base_dir)
    }

    /// Build a command for the compiled binary pointed at another base directory.
    pub(crate) fn cli_for(&self, base_dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("calibre-portable")
            .expect("Failed to locate calibre-portable binary");
        cmd.arg("--base-dir").arg(base_dir).env_remove("RUST_LOG");
        cmd
    }

    /// Create the default config, library and temp directories.
    pub(crate) fn create_default_dirs(&self) {
        for dir in ["CalibreConfig", "CalibreLibrary", "CalibreTemp"] {
            fs::create_dir_all(self.base_dir.join(dir)).expect("Failed to create default dir");
        }
    }

    /// Write `calibre-portable.toml` into the base directory.
    pub(crate) fn write_config(&self, content: &str) {
        fs::write(self.base_dir.join("calibre-portable.toml"), content)
            .expect("Failed to write config");
    }

    /// Path where the fake calibre records its invocation.
    pub(crate) fn record_path(&self) -> PathBuf {
        self.root.path().join("calibre-invocation.txt")
    }

    /// Install a shell script standing in for the managed calibre executable.
    ///
    /// The script writes its arguments and calibre environment to [`Self::record_path`].
    #[cfg(unix)]
    pub(crate) fn install_fake_calibre(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let exe_dir = self.base_dir.join("Calibre/calibre.app/Contents/MacOS");
        fs::create_dir_all(&exe_dir).expect("Failed to create bundle directory");
        let exe = exe_dir.join("calibre");
        let record = self.record_path();
        let script = format!(
            r#"#!/bin/sh
{{
  echo "args: $*"
  echo "CALIBRE_CONFIG_DIRECTORY=$CALIBRE_CONFIG_DIRECTORY"
  echo "CALIBRE_TEMP_DIR=$CALIBRE_TEMP_DIR"
  echo "CALIBRE_CACHE_DIRECTORY=$CALIBRE_CACHE_DIRECTORY"
  echo "CALIBRE_OVERRIDE_LANG=$CALIBRE_OVERRIDE_LANG"
}} > "{record}.partial"
mv "{record}.partial" "{record}"
"#,
            record = record.display()
        );
        fs::write(&exe, script).expect("Failed to write fake calibre");
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake calibre executable");
        exe
    }

    /// Wait for the detached fake calibre to write its record.
    pub(crate) fn wait_for_record(&self) -> String {
        let record = self.record_path();
        let deadline = Instant::now() + RECORD_TIMEOUT;
        while Instant::now() < deadline {
            if let Ok(content) = fs::read_to_string(&record) {
                return content;
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("fake calibre did not run within {:?}", RECORD_TIMEOUT);
    }

    /// Names of the entries directly under the base directory.
    pub(crate) fn base_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.base_dir)
            .expect("Failed to read base directory")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
