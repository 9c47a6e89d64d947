//! Disk image handling through `hdiutil` and `ditto`.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use crate::domain::AppError;
use crate::ports::DiskImageTool;

#[derive(Debug, Clone, Default)]
pub struct HdiutilDiskImage;

impl HdiutilDiskImage {
    pub fn new() -> Self {
        Self
    }
}

impl DiskImageTool for HdiutilDiskImage {
    fn attach(&self, image: &Path) -> Result<String, AppError> {
        let args = [
            OsStr::new("attach"),
            OsStr::new("-nobrowse"),
            OsStr::new("-noautoopen"),
            image.as_os_str(),
        ];
        let output = run_command("hdiutil", &args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn detach(&self, mount_point: &Path) -> Result<(), AppError> {
        let args = [OsStr::new("detach"), OsStr::new("-quiet"), mount_point.as_os_str()];
        run_command("hdiutil", &args)?;
        Ok(())
    }

    fn copy_bundle(&self, source: &Path, dest: &Path) -> Result<(), AppError> {
        run_command("ditto", &[source.as_os_str(), dest.as_os_str()])?;
        Ok(())
    }
}

fn run_command(program: &str, args: &[&OsStr]) -> Result<Output, AppError> {
    let rendered = || {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        format!("{} {}", program, args.join(" "))
    };
    tracing::debug!(command = %rendered(), "running external tool");

    let output = Command::new(program).args(args).output().map_err(|err| {
        AppError::ExternalTool { tool: program.to_string(), error: err.to_string() }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::ExternalTool {
            tool: program.to_string(),
            error: format!("command failed: {}\nstderr:\n{}", rendered(), stderr.trim()),
        });
    }

    Ok(output)
}
