//! Install or upgrade the calibre bundle from the published disk image.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::app::AppContext;
use crate::domain::disk_image::{find_disk_image_link, image_file_name, parse_mount_point};
use crate::domain::profile;
use crate::domain::AppError;
use crate::ports::{DiskImageTool, ProcessLauncher, ReleaseSource};
use crate::services::interrupt::{self, InterruptGuard};

const WORK_DIR_PREFIX: &str = ".calibre-install-";

/// Result of an install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The bundle was placed at `bundle`; `replaced` is set when an older one was removed.
    Installed { bundle: PathBuf, replaced: bool },
    /// Dry run; nothing was fetched or written.
    Planned { bundle: PathBuf },
}

/// Download the latest disk image, copy its bundle into the binary directory, and clean up.
///
/// The working directory is created next to the binary directory and removed on every
/// exit path. A mounted volume is detached exactly once, even when a later step fails.
pub fn execute<R, D, L>(ctx: &AppContext<R, D, L>) -> Result<InstallOutcome, AppError>
where
    R: ReleaseSource,
    D: DiskImageTool,
    L: ProcessLauncher,
{
    let session = ctx.session();
    let bin_dir = ctx.bin_dir();
    let bundle = bin_dir.join(profile::BUNDLE_NAME);
    let page = Url::parse(profile::DOWNLOAD_PAGE)
        .map_err(|e| AppError::config_error(format!("Invalid download page URL: {}", e)))?;

    if session.is_dry_run() {
        session.dry_run(format!("look up the latest disk image on {}", page));
        session.dry_run("download it into a temporary directory");
        session.dry_run(format!("mount it and copy {}", profile::BUNDLE_NAME));
        session.dry_run(format!("replace {}", bundle.display()));
        return Ok(InstallOutcome::Planned { bundle });
    }

    let _interrupt = InterruptGuard::install();
    let staging_parent = bin_dir.parent().unwrap_or(ctx.base_dir()).to_path_buf();
    fs::create_dir_all(&staging_parent)?;
    let work = tempfile::Builder::new().prefix(WORK_DIR_PREFIX).tempdir_in(&staging_parent)?;
    tracing::debug!(work = %work.path().display(), "created install working directory");

    let result = run_steps(ctx, &page, work.path(), &bin_dir);

    let work_path = work.path().to_path_buf();
    if let Err(err) = work.close() {
        tracing::warn!(
            path = %work_path.display(),
            error = %err,
            "failed to remove working directory"
        );
    }

    match result {
        Err(_) if interrupt::requested() => Err(AppError::Interrupted),
        Err(err) => Err(err),
        Ok(replaced) => {
            session.success(format!("Installed {}", bundle.display()));
            Ok(InstallOutcome::Installed { bundle, replaced })
        }
    }
}

fn run_steps<R, D, L>(
    ctx: &AppContext<R, D, L>,
    page: &Url,
    work: &Path,
    bin_dir: &Path,
) -> Result<bool, AppError>
where
    R: ReleaseSource,
    D: DiskImageTool,
    L: ProcessLauncher,
{
    let session = ctx.session();

    session.status(format!("Looking up the latest calibre release on {}", page));
    let html = ctx.release_source().fetch_page(page)?;
    let image_url = find_disk_image_link(&html, page)
        .ok_or_else(|| AppError::Discovery { page: page.to_string() })?;
    check_interrupt()?;

    session.step(&format!("download {}", image_url))?;
    session.status(format!("Downloading {}", image_url));
    let image = work.join(image_file_name(&image_url));
    let bytes = ctx.release_source().download(&image_url, &image)?;
    verify_download(&image_url, &image)?;
    tracing::info!(bytes, image = %image.display(), "disk image downloaded");
    check_interrupt()?;

    session.step("mount the disk image")?;
    let output = ctx
        .disk_image()
        .attach(&image)
        .map_err(|e| AppError::Mount { image: image.clone(), details: e.to_string() })?;
    let mount_point = parse_mount_point(&output).ok_or_else(|| AppError::Mount {
        image: image.clone(),
        details: "hdiutil reported no mounted volume".to_string(),
    })?;
    let volume = MountedVolume::new(ctx.disk_image(), mount_point);
    check_interrupt()?;

    let source = volume.path().join(profile::BUNDLE_NAME);
    if !source.is_dir() {
        return Err(AppError::BundleNotFound {
            bundle: profile::BUNDLE_NAME.to_string(),
            volume: volume.path().to_path_buf(),
        });
    }

    session.status(format!("Copying {}", profile::BUNDLE_NAME));
    let staged = work.join(profile::BUNDLE_NAME);
    ctx.disk_image().copy_bundle(&source, &staged)?;
    volume.unmount();
    check_interrupt()?;

    session.step(&format!("replace {}", bin_dir.join(profile::BUNDLE_NAME).display()))?;
    replace_bundle(&staged, bin_dir)
}

fn check_interrupt() -> Result<(), AppError> {
    if interrupt::requested() {
        Err(AppError::Interrupted)
    } else {
        Ok(())
    }
}

fn verify_download(url: &Url, image: &Path) -> Result<(), AppError> {
    let failed =
        |details: &str| AppError::Download { url: url.to_string(), details: details.into() };
    match fs::metadata(image) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        Ok(_) => Err(failed("downloaded file is empty")),
        Err(_) => Err(failed("downloaded file is missing")),
    }
}

/// Move the staged bundle into place, returning whether an older bundle was removed.
fn replace_bundle(staged: &Path, bin_dir: &Path) -> Result<bool, AppError> {
    fs::create_dir_all(bin_dir)?;
    let dest = bin_dir.join(profile::BUNDLE_NAME);

    let replaced = match fs::symlink_metadata(&dest) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(&dest)?;
            true
        }
        Ok(_) => {
            fs::remove_file(&dest)?;
            true
        }
        Err(_) => false,
    };
    fs::rename(staged, &dest)?;
    make_traversable(bin_dir)?;
    Ok(replaced)
}

#[cfg(unix)]
fn make_traversable(dir: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_traversable(_dir: &Path) -> Result<(), AppError> {
    Ok(())
}

/// Detaches the volume when dropped unless [`MountedVolume::unmount`] already did.
struct MountedVolume<'a, D: DiskImageTool> {
    tool: &'a D,
    path: PathBuf,
    attached: bool,
}

impl<'a, D: DiskImageTool> MountedVolume<'a, D> {
    fn new(tool: &'a D, path: PathBuf) -> Self {
        tracing::debug!(volume = %path.display(), "disk image mounted");
        Self { tool, path, attached: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn unmount(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Err(err) = self.tool.detach(&self.path) {
            tracing::warn!(volume = %self.path.display(), error = %err, "failed to detach volume");
        }
    }
}

impl<D: DiskImageTool> Drop for MountedVolume<'_, D> {
    fn drop(&mut self) {
        self.detach();
    }
}
