//! Directory roles and first-match-wins resolution.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::profile::{self, env};
use crate::domain::RunConfig;

/// Directories the launcher needs to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectoryRole {
    Config,
    Library,
    Temp,
    Metadata,
    Binary,
}

impl DirectoryRole {
    pub const ALL: [DirectoryRole; 5] = [
        DirectoryRole::Config,
        DirectoryRole::Library,
        DirectoryRole::Temp,
        DirectoryRole::Metadata,
        DirectoryRole::Binary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DirectoryRole::Config => "CONFIG",
            DirectoryRole::Library => "LIBRARY",
            DirectoryRole::Temp => "TEMP",
            DirectoryRole::Metadata => "METADATA",
            DirectoryRole::Binary => "BINARY",
        }
    }
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered candidates for every role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCandidates {
    config: Vec<PathBuf>,
    library: Vec<PathBuf>,
    temp: Vec<PathBuf>,
    metadata: Vec<PathBuf>,
    binary: Vec<PathBuf>,
}

impl PathCandidates {
    pub fn from_config(base: &Path, config: &RunConfig) -> Self {
        Self {
            config: config.config_dir_candidates(base),
            library: config.library_dir_candidates(base),
            temp: config.tmp_dir_candidates(base),
            metadata: config.metadata_dir_candidates(base),
            binary: vec![executable_dir(&config.effective_bin_dir(base))],
        }
    }

    pub fn for_role(&self, role: DirectoryRole) -> &[PathBuf] {
        match role {
            DirectoryRole::Config => &self.config,
            DirectoryRole::Library => &self.library,
            DirectoryRole::Temp => &self.temp,
            DirectoryRole::Metadata => &self.metadata,
            DirectoryRole::Binary => &self.binary,
        }
    }
}

/// Directory inside an installed bundle that holds the executable.
pub fn executable_dir(bin_dir: &Path) -> PathBuf {
    bin_dir.join(profile::BUNDLE_NAME).join(profile::BUNDLE_EXECUTABLE_DIR)
}

/// First candidate that exists as a directory. Later candidates are never consulted.
pub fn resolve_first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|candidate| candidate.is_dir()).cloned()
}

/// Where the executable to launch came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Executable {
    /// Inside the managed binary directory.
    Managed(PathBuf),
    /// Found on the process search path.
    SearchPath(PathBuf),
    /// Not found; launch the bare command name and let the OS search.
    #[default]
    Unresolved,
}

impl Executable {
    pub fn program(&self) -> PathBuf {
        match self {
            Executable::Managed(path) | Executable::SearchPath(path) => path.clone(),
            Executable::Unresolved => PathBuf::from(profile::EXECUTABLE_NAME),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Executable::Unresolved)
    }
}

/// Active path per role after resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub config: Option<PathBuf>,
    pub library: Option<PathBuf>,
    pub temp: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
    pub binary: Option<PathBuf>,
    pub executable: Executable,
}

impl ResolvedPaths {
    /// Resolve every role; `lookup` searches the process search path for a command name.
    pub fn resolve(candidates: &PathCandidates, lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let pick = |role| resolve_first_existing(candidates.for_role(role));

        let binary = pick(DirectoryRole::Binary);
        let managed = binary
            .as_ref()
            .map(|dir| dir.join(profile::EXECUTABLE_NAME))
            .filter(|exe| exe.is_file());

        let executable = match managed {
            Some(exe) => Executable::Managed(exe),
            None => match lookup(profile::EXECUTABLE_NAME) {
                Some(found) => {
                    tracing::info!(path = %found.display(), "using calibre from search path");
                    Executable::SearchPath(found)
                }
                None => Executable::Unresolved,
            },
        };

        let resolved = Self {
            config: pick(DirectoryRole::Config),
            library: pick(DirectoryRole::Library),
            temp: pick(DirectoryRole::Temp),
            metadata: pick(DirectoryRole::Metadata),
            binary,
            executable,
        };
        tracing::debug!(?resolved, "resolved directory roles");
        resolved
    }

    pub fn get(&self, role: DirectoryRole) -> Option<&Path> {
        match role {
            DirectoryRole::Config => self.config.as_deref(),
            DirectoryRole::Library => self.library.as_deref(),
            DirectoryRole::Temp => self.temp.as_deref(),
            DirectoryRole::Metadata => self.metadata.as_deref(),
            DirectoryRole::Binary => self.binary.as_deref(),
        }
    }

    pub fn unresolved_roles(&self) -> Vec<DirectoryRole> {
        DirectoryRole::ALL.into_iter().filter(|role| self.get(*role).is_none()).collect()
    }

    /// Database override path.
    ///
    /// Only set when the metadata directory holds a `metadata.db` and is not the active
    /// library. calibre disables library switching while the override is in effect.
    pub fn metadata_override(&self) -> Option<PathBuf> {
        let metadata = self.metadata.as_ref()?;
        let db = metadata.join(profile::METADATA_DB);
        if !db.is_file() {
            return None;
        }
        if self.library.as_ref().is_some_and(|library| same_dir(library, metadata)) {
            return None;
        }
        Some(db)
    }

    /// Why the temp directory must not be emptied, if it overlaps something it does not own.
    ///
    /// Temp may sit inside `base`, but not contain it, and it may neither contain nor sit
    /// inside the library, config, metadata or binary directory. The user's home, the
    /// system temp directory and `/` are never emptied.
    pub fn temp_cleanup_conflict(&self, base: &Path, bin_dir: &Path) -> Option<String> {
        let temp = canonical(self.temp.as_deref()?);

        let mut outside: Vec<(&str, PathBuf)> = vec![
            ("the base directory", canonical(base)),
            ("the system temp directory", canonical(&std::env::temp_dir())),
            ("the filesystem root", PathBuf::from("/")),
        ];
        if let Some(home) = std::env::var_os("HOME") {
            outside.push(("the home directory", canonical(Path::new(&home))));
        }
        if let Some(found) = outside.iter().find(|(_, dir)| dir.starts_with(&temp)) {
            return Some(format!("it contains {}", found.0));
        }

        let roles = [
            (DirectoryRole::Library, self.library.as_deref()),
            (DirectoryRole::Config, self.config.as_deref()),
            (DirectoryRole::Metadata, self.metadata.as_deref()),
            (DirectoryRole::Binary, Some(bin_dir)),
        ];
        roles.into_iter().find_map(|(role, dir)| {
            let dir = canonical(dir?);
            (dir.starts_with(&temp) || temp.starts_with(&dir))
                .then(|| format!("it overlaps the {} directory", role.label().to_lowercase()))
        })
    }

    /// Environment exported to calibre.
    pub fn environment(&self, language: Option<&str>) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(config) = &self.config {
            vars.push((env::CONFIG_DIRECTORY, config.display().to_string()));
        }
        if let Some(temp) = &self.temp {
            vars.push((env::TEMP_DIR, temp.display().to_string()));
            vars.push((env::CACHE_DIRECTORY, temp.display().to_string()));
        }
        if let Some(db) = self.metadata_override() {
            vars.push((env::OVERRIDE_DATABASE_PATH, db.display().to_string()));
        }
        if let Some(lang) = language {
            vars.push((env::OVERRIDE_LANG, lang.to_string()));
        }
        vars
    }
}

/// Look a command up on `PATH`.
pub fn search_path_lookup(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn no_lookup(_: &str) -> Option<PathBuf> {
        None
    }

    #[test]
    fn first_existing_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("A");
        let b = temp.path().join("B");
        let c = temp.path().join("C");
        fs::create_dir(&b).unwrap();
        fs::create_dir(&c).unwrap();

        assert_eq!(resolve_first_existing(&[a, b.clone(), c]), Some(b));
    }

    #[test]
    fn files_do_not_count_as_directories() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("A");
        fs::write(&file, "").unwrap();
        assert_eq!(resolve_first_existing(&[file]), None);
    }

    #[test]
    fn unresolved_library_is_reported_not_fatal() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("CalibreConfig")).unwrap();

        let candidates = PathCandidates::from_config(temp.path(), &RunConfig::default());
        let resolved = ResolvedPaths::resolve(&candidates, no_lookup);

        assert_eq!(resolved.config, Some(temp.path().join("CalibreConfig")));
        assert!(resolved.library.is_none());
        assert!(resolved.unresolved_roles().contains(&DirectoryRole::Library));
    }

    #[test]
    fn binary_falls_back_to_search_path() {
        let temp = TempDir::new().unwrap();
        let candidates = PathCandidates::from_config(temp.path(), &RunConfig::default());

        let resolved =
            ResolvedPaths::resolve(&candidates, |name| Some(PathBuf::from("/usr/bin").join(name)));
        assert_eq!(resolved.executable, Executable::SearchPath(PathBuf::from("/usr/bin/calibre")));

        let resolved = ResolvedPaths::resolve(&candidates, no_lookup);
        assert_eq!(resolved.executable, Executable::Unresolved);
        assert_eq!(resolved.executable.program(), PathBuf::from("calibre"));
    }

    #[test]
    fn managed_executable_preferred_over_search_path() {
        let temp = TempDir::new().unwrap();
        let exe_dir = executable_dir(&temp.path().join("Calibre"));
        fs::create_dir_all(&exe_dir).unwrap();
        fs::write(exe_dir.join("calibre"), "").unwrap();

        let candidates = PathCandidates::from_config(temp.path(), &RunConfig::default());
        let resolved =
            ResolvedPaths::resolve(&candidates, |_| Some(PathBuf::from("/usr/bin/calibre")));

        assert_eq!(resolved.binary, Some(exe_dir.clone()));
        assert_eq!(resolved.executable, Executable::Managed(exe_dir.join("calibre")));
    }

    #[test]
    fn metadata_override_requires_database_outside_library() {
        let temp = TempDir::new().unwrap();
        let library = temp.path().join("CalibreLibrary");
        let metadata = temp.path().join("CalibreMetadata");
        fs::create_dir_all(&library).unwrap();
        fs::create_dir_all(&metadata).unwrap();

        let mut resolved = ResolvedPaths {
            library: Some(library.clone()),
            metadata: Some(metadata.clone()),
            ..Default::default()
        };
        assert_eq!(resolved.metadata_override(), None, "no database file yet");

        fs::write(metadata.join("metadata.db"), "").unwrap();
        assert_eq!(resolved.metadata_override(), Some(metadata.join("metadata.db")));

        resolved.library = Some(metadata.clone());
        assert_eq!(resolved.metadata_override(), None, "metadata dir is the active library");
    }

    #[test]
    fn environment_reuses_temp_as_cache() {
        let resolved = ResolvedPaths {
            config: Some(PathBuf::from("/p/CalibreConfig")),
            temp: Some(PathBuf::from("/p/CalibreTemp")),
            ..Default::default()
        };
        let vars = resolved.environment(Some("fr"));
        assert_eq!(
            vars,
            vec![
                ("CALIBRE_CONFIG_DIRECTORY", "/p/CalibreConfig".to_string()),
                ("CALIBRE_TEMP_DIR", "/p/CalibreTemp".to_string()),
                ("CALIBRE_CACHE_DIRECTORY", "/p/CalibreTemp".to_string()),
                ("CALIBRE_OVERRIDE_LANG", "fr".to_string()),
            ]
        );
    }

    #[test]
    fn temp_inside_base_may_be_emptied() {
        let base = TempDir::new().unwrap();
        let temp = base.path().join("CalibreTemp");
        let library = base.path().join("CalibreLibrary");
        fs::create_dir_all(&temp).unwrap();
        fs::create_dir_all(&library).unwrap();

        let resolved =
            ResolvedPaths { temp: Some(temp), library: Some(library), ..Default::default() };
        let bin_dir = base.path().join("Calibre");
        assert_eq!(resolved.temp_cleanup_conflict(base.path(), &bin_dir), None);
    }

    #[test]
    fn temp_sharing_a_directory_with_another_role_is_refused() {
        let base = TempDir::new().unwrap();
        let library = base.path().join("CalibreLibrary");
        fs::create_dir_all(library.join("Author")).unwrap();
        let bin_dir = base.path().join("Calibre");

        let same = ResolvedPaths {
            temp: Some(library.clone()),
            library: Some(library.clone()),
            ..Default::default()
        };
        let reason = same.temp_cleanup_conflict(base.path(), &bin_dir).unwrap();
        assert!(reason.contains("library"), "{reason}");

        let nested = ResolvedPaths {
            temp: Some(library.join("Author")),
            library: Some(library.clone()),
            ..Default::default()
        };
        assert!(nested.temp_cleanup_conflict(base.path(), &bin_dir).is_some());

        let parent = ResolvedPaths {
            temp: Some(base.path().to_path_buf()),
            library: Some(library),
            ..Default::default()
        };
        let reason = parent.temp_cleanup_conflict(base.path(), &bin_dir).unwrap();
        assert!(reason.contains("base directory"), "{reason}");
    }

    #[test]
    fn temp_at_filesystem_root_is_refused() {
        let base = TempDir::new().unwrap();
        let resolved = ResolvedPaths { temp: Some(PathBuf::from("/")), ..Default::default() };
        let bin_dir = base.path().join("Calibre");
        assert!(resolved.temp_cleanup_conflict(base.path(), &bin_dir).is_some());
    }

    proptest! {
        #[test]
        fn resolves_to_first_existing_of_any_layout(
            layout in proptest::collection::vec(any::<bool>(), 1..6)
        ) {
            let temp = TempDir::new().unwrap();
            let candidates: Vec<PathBuf> = layout
                .iter()
                .enumerate()
                .map(|(index, exists)| {
                    let path = temp.path().join(format!("candidate-{index}"));
                    if *exists {
                        fs::create_dir(&path).unwrap();
                    }
                    path
                })
                .collect();

            let expected =
                layout.iter().position(|exists| *exists).map(|index| candidates[index].clone());
            prop_assert_eq!(resolve_first_existing(&candidates), expected);
        }
    }
}
