//! Fixed facts about the calibre distribution and the portable directory layout.

/// Page listing the current macOS release.
pub const DOWNLOAD_PAGE: &str = "https://calibre-ebook.com/download_osx";

/// File extension of the disk image distribution.
pub const DISK_IMAGE_EXTENSION: &str = "dmg";

/// Application bundle at the root of the mounted volume.
pub const BUNDLE_NAME: &str = "calibre.app";

/// Executable path inside the bundle.
pub const BUNDLE_EXECUTABLE_DIR: &str = "Contents/MacOS";
pub const EXECUTABLE_NAME: &str = "calibre";

/// Argument used to pass the active library.
pub const LIBRARY_ARG: &str = "--with-library";

/// Database file looked up in the metadata directory.
pub const METADATA_DB: &str = "metadata.db";

/// Files written into the base directory.
pub const CONFIG_FILE: &str = "calibre-portable.toml";
pub const LAUNCHER_FILE: &str = "calibre-portable.command";

/// Default directory names, relative to the base directory.
pub const DEFAULT_CONFIG_DIR: &str = "CalibreConfig";
pub const DEFAULT_LIBRARY_DIR: &str = "CalibreLibrary";
pub const DEFAULT_TEMP_DIR: &str = "CalibreTemp";
pub const DEFAULT_METADATA_DIR: &str = "CalibreMetadata";
pub const DEFAULT_BIN_DIR: &str = "Calibre";

/// Maximum number of library candidates in the config file.
pub const MAX_LIBRARY_DIRS: usize = 3;

/// Environment variables understood by calibre.
pub mod env {
    pub const CONFIG_DIRECTORY: &str = "CALIBRE_CONFIG_DIRECTORY";
    pub const TEMP_DIR: &str = "CALIBRE_TEMP_DIR";
    pub const CACHE_DIRECTORY: &str = "CALIBRE_CACHE_DIRECTORY";
    pub const OVERRIDE_DATABASE_PATH: &str = "CALIBRE_OVERRIDE_DATABASE_PATH";
    pub const OVERRIDE_LANG: &str = "CALIBRE_OVERRIDE_LANG";
}
