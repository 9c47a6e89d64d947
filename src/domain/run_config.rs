//! Persisted launcher settings (`calibre-portable.toml`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::paths::ResolvedPaths;
use crate::domain::profile::{self, MAX_LIBRARY_DIRS};
use crate::domain::AppError;

/// Settings loaded from the config file.
///
/// Every field is optional so that rendering can tell an explicit setting from a default.
/// Relative paths are interpreted against the base directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub config_dir: Option<PathBuf>,
    pub library_dirs: Option<Vec<PathBuf>>,
    pub metadata_dir: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    pub tmp_dir: Option<PathBuf>,
    pub interface_language: Option<String>,
    pub no_confirm_start: Option<bool>,
    pub no_cleanup: Option<bool>,
}

impl RunConfig {
    /// Parse and validate config file content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, AppError> {
        let config: RunConfig = toml::from_str(content)
            .map_err(|source| AppError::ConfigParse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file, returning `None` when it does not exist yet.
    pub fn load(path: &Path) -> Result<Option<Self>, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let single_paths = [
            ("config_dir", &self.config_dir),
            ("metadata_dir", &self.metadata_dir),
            ("bin_dir", &self.bin_dir),
            ("tmp_dir", &self.tmp_dir),
        ];
        for (key, value) in single_paths {
            if value.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(AppError::validation(key, "path must not be empty"));
            }
        }

        if let Some(dirs) = &self.library_dirs {
            if dirs.len() > MAX_LIBRARY_DIRS {
                return Err(AppError::validation(
                    "library_dirs",
                    format!("at most {} entries allowed, found {}", MAX_LIBRARY_DIRS, dirs.len()),
                ));
            }
            if dirs.iter().any(|p| p.as_os_str().is_empty()) {
                return Err(AppError::validation("library_dirs", "paths must not be empty"));
            }
        }

        if let Some(lang) = &self.interface_language {
            let valid = !lang.is_empty()
                && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(AppError::validation(
                    "interface_language",
                    format!("'{}' is not a language code", lang),
                ));
            }
        }

        Ok(())
    }

    pub fn confirm_start(&self) -> bool {
        !self.no_confirm_start.unwrap_or(false)
    }

    pub fn cleanup(&self) -> bool {
        !self.no_cleanup.unwrap_or(false)
    }

    pub fn config_dir_candidates(&self, base: &Path) -> Vec<PathBuf> {
        with_default(base, self.config_dir.as_deref(), profile::DEFAULT_CONFIG_DIR)
    }

    pub fn library_dir_candidates(&self, base: &Path) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self
            .library_dirs
            .iter()
            .flatten()
            .map(|dir| absolute(base, dir))
            .collect();
        candidates.push(base.join(profile::DEFAULT_LIBRARY_DIR));
        candidates
    }

    pub fn metadata_dir_candidates(&self, base: &Path) -> Vec<PathBuf> {
        with_default(base, self.metadata_dir.as_deref(), profile::DEFAULT_METADATA_DIR)
    }

    pub fn tmp_dir_candidates(&self, base: &Path) -> Vec<PathBuf> {
        with_default(base, self.tmp_dir.as_deref(), profile::DEFAULT_TEMP_DIR)
    }

    /// Directory that holds (or will hold) the installed bundle.
    pub fn effective_bin_dir(&self, base: &Path) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => absolute(base, dir),
            None => base.join(profile::DEFAULT_BIN_DIR),
        }
    }

    /// Directories created on first run.
    pub fn bootstrap_dirs(&self, base: &Path) -> Vec<PathBuf> {
        vec![
            self.config_dir_candidates(base).remove(0),
            self.library_dir_candidates(base).remove(0),
            self.tmp_dir_candidates(base).remove(0),
        ]
    }

    /// One entry per recognized key, carrying the value to show in a generated file.
    ///
    /// Explicit settings stay active; everything else is written commented out with the
    /// currently resolved value, or the default when nothing resolved.
    pub fn entries(&self, base: &Path, resolved: &ResolvedPaths) -> Vec<ConfigEntry> {
        let path_value = |explicit: &Option<PathBuf>, current: Option<&Path>, fallback: &str| {
            let shown = match explicit {
                Some(dir) => dir.clone(),
                None => current.map(Path::to_path_buf).unwrap_or_else(|| base.join(fallback)),
            };
            toml_string(&relative_to(base, &shown))
        };

        let library_value = match &self.library_dirs {
            Some(dirs) => dirs.clone(),
            None => vec![
                resolved
                    .library
                    .clone()
                    .unwrap_or_else(|| base.join(profile::DEFAULT_LIBRARY_DIR)),
            ],
        };
        let library_literal = toml::Value::Array(
            library_value
                .iter()
                .map(|dir| toml::Value::String(relative_to(base, dir)))
                .collect(),
        )
        .to_string();

        let bin_dir = self.bin_dir.clone().unwrap_or_else(|| self.effective_bin_dir(base));

        vec![
            ConfigEntry {
                key: "config_dir",
                note: "calibre settings directory",
                value: path_value(
                    &self.config_dir,
                    resolved.config.as_deref(),
                    profile::DEFAULT_CONFIG_DIR,
                ),
                active: self.config_dir.is_some(),
            },
            ConfigEntry {
                key: "library_dirs",
                note: "library candidates, first existing one wins (up to 3)",
                value: library_literal,
                active: self.library_dirs.is_some(),
            },
            ConfigEntry {
                key: "metadata_dir",
                note: "directory with a metadata.db overriding the library database \
                       (disables library switching)",
                value: path_value(
                    &self.metadata_dir,
                    resolved.metadata.as_deref(),
                    profile::DEFAULT_METADATA_DIR,
                ),
                active: self.metadata_dir.is_some(),
            },
            ConfigEntry {
                key: "bin_dir",
                note: "directory holding calibre.app",
                value: toml_string(&relative_to(base, &bin_dir)),
                active: self.bin_dir.is_some(),
            },
            ConfigEntry {
                key: "tmp_dir",
                note: "temporary files and cache",
                value: path_value(
                    &self.tmp_dir,
                    resolved.temp.as_deref(),
                    profile::DEFAULT_TEMP_DIR,
                ),
                active: self.tmp_dir.is_some(),
            },
            ConfigEntry {
                key: "interface_language",
                note: "interface language override, e.g. \"de\" or \"pt_BR\"",
                value: toml_string(self.interface_language.as_deref().unwrap_or("en")),
                active: self.interface_language.is_some(),
            },
            ConfigEntry {
                key: "no_confirm_start",
                note: "start calibre without asking",
                value: self.no_confirm_start.unwrap_or(false).to_string(),
                active: self.no_confirm_start.is_some(),
            },
            ConfigEntry {
                key: "no_cleanup",
                note: "keep temp directory contents between sessions",
                value: self.no_cleanup.unwrap_or(false).to_string(),
                active: self.no_cleanup.is_some(),
            },
        ]
    }
}

/// A single line of a generated config file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub note: &'static str,
    /// TOML literal for the value.
    pub value: String,
    pub active: bool,
}

fn with_default(base: &Path, explicit: Option<&Path>, default: &str) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> =
        explicit.map(|dir| absolute(base, dir)).into_iter().collect();
    candidates.push(base.join(default));
    candidates
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn relative_to(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => path.display().to_string(),
    }
}

fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
