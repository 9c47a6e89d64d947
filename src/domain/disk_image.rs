//! Parsing helpers for the disk image distribution.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::profile::DISK_IMAGE_EXTENSION;

static DISK_IMAGE_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?i)href\s*=\s*["']([^"'#?]+\.{}(?:\?[^"']*)?)["']"#,
        DISK_IMAGE_EXTENSION
    ))
    .expect("disk image link pattern is valid")
});

/// First disk image link on the download page, resolved against the page URL.
pub fn find_disk_image_link(page_html: &str, page_url: &Url) -> Option<Url> {
    DISK_IMAGE_HREF
        .captures_iter(page_html)
        .filter_map(|captures| captures.get(1))
        .find_map(|href| page_url.join(href.as_str().trim()).ok())
}

/// Volume mount point reported by `hdiutil attach`.
///
/// Output lines are tab separated; a mounted partition carries its mount point in the last
/// column. Volume names may contain spaces, so the column is taken whole.
pub fn parse_mount_point(attach_output: &str) -> Option<PathBuf> {
    attach_output.lines().find_map(|line| {
        let last = line.rsplit('\t').next()?.trim();
        (last.starts_with('/') && !last.starts_with("/dev/")).then(|| PathBuf::from(last))
    })
}

/// File name for a downloaded image, taken from the last URL path segment.
pub fn image_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("calibre.{}", DISK_IMAGE_EXTENSION))
}
