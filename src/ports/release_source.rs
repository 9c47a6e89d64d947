use std::path::Path;

use url::Url;

use crate::domain::AppError;

/// Port for discovering and fetching the release disk image.
pub trait ReleaseSource {
    /// Fetch the download page body.
    fn fetch_page(&self, url: &Url) -> Result<String, AppError>;

    /// Download `url` into `dest`, returning the number of bytes written.
    fn download(&self, url: &Url, dest: &Path) -> Result<u64, AppError>;
}
