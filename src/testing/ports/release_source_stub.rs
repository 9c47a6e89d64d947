use std::fs;
use std::path::Path;
use std::sync::Mutex;

use url::Url;

use crate::domain::AppError;
use crate::ports::ReleaseSource;

/// Serves a canned download page and image body, recording every request.
pub struct FakeReleaseSource {
    page: String,
    image: Option<Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeReleaseSource {
    pub fn new(page: &str, image: &[u8]) -> Self {
        Self {
            page: page.to_string(),
            image: Some(image.to_vec()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Page links to a disk image and the image body is non-empty.
    pub fn with_release() -> Self {
        Self::new(
            r#"<a href="https://download.example.com/8.1.0/calibre-8.1.0.dmg">Download</a>"#,
            b"disk image bytes",
        )
    }

    /// Downloads fail at the transport level.
    pub fn failing_download(page: &str) -> Self {
        Self { page: page.to_string(), image: None, requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl ReleaseSource for FakeReleaseSource {
    fn fetch_page(&self, url: &Url) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(format!("page {}", url));
        Ok(self.page.clone())
    }

    fn download(&self, url: &Url, dest: &Path) -> Result<u64, AppError> {
        self.requests.lock().unwrap().push(format!("download {}", url));
        let image = self.image.as_ref().ok_or_else(|| AppError::Download {
            url: url.to_string(),
            details: "connection reset".to_string(),
        })?;
        fs::write(dest, image)?;
        Ok(image.len() as u64)
    }
}
