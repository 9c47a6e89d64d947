//! Release discovery and download over HTTP using reqwest.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use url::Url;

use crate::domain::AppError;
use crate::ports::ReleaseSource;
use crate::services::interrupt;

const USER_AGENT: &str = concat!("calibre-portable/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 30;
const CHUNK_SIZE: usize = 64 * 1024;

/// HTTP transport for the download page and disk image.
///
/// Each call performs a single request. The body transfer has no overall timeout so that
/// large images on slow links are not cut off.
#[derive(Debug, Clone)]
pub struct HttpReleaseSource {
    client: Client,
    show_progress: bool,
}

impl HttpReleaseSource {
    pub fn new(show_progress: bool) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| AppError::ExternalTool {
                tool: "HTTP client".to_string(),
                error: e.to_string(),
            })?;

        Ok(Self { client, show_progress })
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    bar.set_style(style);
                }
                bar
            }
            None => ProgressBar::new_spinner(),
        }
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn fetch_page(&self, url: &Url) -> Result<String, AppError> {
        let failed = |details: String| AppError::Download { url: url.to_string(), details };

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| failed(format!("request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status)));
        }
        response.text().map_err(|e| failed(format!("unreadable body: {}", e)))
    }

    fn download(&self, url: &Url, dest: &Path) -> Result<u64, AppError> {
        let failed = |details: String| AppError::Download { url: url.to_string(), details };

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| failed(format!("request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status)));
        }

        let bar = self.progress_bar(response.content_length());
        let mut file = File::create(dest)?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            if interrupt::requested() {
                bar.abandon();
                return Err(AppError::Interrupted);
            }
            let read = match response.read(&mut buf) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    bar.abandon();
                    return Err(failed(format!("transfer interrupted: {}", err)));
                }
            };
            file.write_all(&buf[..read])?;
            written += read as u64;
            bar.inc(read as u64);
        }

        file.flush()?;
        bar.finish_and_clear();
        tracing::info!(url = %url, bytes = written, dest = %dest.display(), "download complete");
        Ok(written)
    }
}
