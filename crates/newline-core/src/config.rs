//! Run configuration.
//!
//! Defaults live in [`Config::default`]. A repository can override them with
//! an optional YAML file (`.github/newline.yml` by default):
//!
//! ```yaml
//! autoCommit: false
//! ignorePaths:
//!   - "vendor/**"
//! ```
//!
//! Each key present in the file replaces the default value wholesale; absent
//! keys keep their default. A missing or unusable file means defaults.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Repo-relative location of the config file when none is given.
pub const DEFAULT_CONFIG_PATH: &str = ".github/newline.yml";

/// Ignore patterns used when the config file does not name any.
pub const DEFAULT_IGNORE_PATHS: &[&str] = &["bin/**", "node_modules/**", "out/**"];

/// Resolved, read-only configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fold fixes into a commit on the PR branch
    pub auto_commit: bool,
    /// Repo-relative glob patterns excluded from remediation
    pub ignore_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_commit: true,
            ignore_paths: DEFAULT_IGNORE_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Keys read from the config file. `None` means "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub auto_commit: Option<bool>,
    pub ignore_paths: Option<Vec<String>>,
}

/// Where the effective config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

impl Config {
    /// Apply overrides on top of `self`. Present keys replace, absent keys keep.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(auto_commit) = overrides.auto_commit {
            self.auto_commit = auto_commit;
        }
        if let Some(ignore_paths) = overrides.ignore_paths {
            self.ignore_paths = ignore_paths;
        }
        self
    }

    /// Compiled matcher for `ignore_paths`.
    pub fn ignore_set(&self) -> Result<GlobSet, ConfigError> {
        compile_ignore_set(&self.ignore_paths)
    }

    /// Read and validate overrides from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides = if text.trim().is_empty() {
            ConfigOverrides::default()
        } else {
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };
        let config = Config::default().merge(overrides);
        config.ignore_set()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> (Self, ConfigSource) {
        match Config::load(path) {
            Ok(config) => {
                info!("Config file loaded.");
                debug!(?config, "effective config");
                (config, ConfigSource::File)
            }
            Err(err) => {
                info!("Config file not found or unusable. Using defaults...");
                debug!(error = %err, "config load failure");
                (Config::default(), ConfigSource::Defaults)
            }
        }
    }
}

/// Resolve the config file location against the repository root.
pub fn resolve_config_path(repo_root: &Path, config_path: &Path) -> PathBuf {
    repo_root.join(config_path)
}

fn pattern_glob(pattern: &str) -> Result<Glob, ConfigError> {
    GlobBuilder::new(pattern.trim_start_matches("./"))
        .literal_separator(true)
        .build()
        .map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

/// Compile ignore patterns into a matcher over repo-relative `/` paths.
///
/// `*` and `?` stay within one path component; `**` spans components.
pub fn compile_ignore_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(pattern_glob(pattern)?);
    }
    builder.build().map_err(|source| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert!(config.auto_commit);
        assert_eq!(config.ignore_paths, vec!["bin/**", "node_modules/**", "out/**"]);
    }

    #[test]
    fn merge_replaces_only_present_keys() {
        let merged = Config::default().merge(ConfigOverrides {
            auto_commit: Some(false),
            ignore_paths: None,
        });
        assert!(!merged.auto_commit);
        assert_eq!(merged.ignore_paths, Config::default().ignore_paths);

        let merged = Config::default().merge(ConfigOverrides {
            auto_commit: None,
            ignore_paths: Some(vec!["vendor/**".to_string()]),
        });
        assert!(merged.auto_commit);
        assert_eq!(merged.ignore_paths, vec!["vendor/**"]);
    }

    #[test]
    fn load_reads_camel_case_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("newline.yml");
        std::fs::write(&path, "autoCommit: false\nignorePaths:\n  - docs/**\nextra: 1\n").unwrap();

        let (config, source) = Config::load_or_default(&path);
        assert_eq!(source, ConfigSource::File);
        assert!(!config.auto_commit);
        assert_eq!(config.ignore_paths, vec!["docs/**"]);
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("newline.yml");
        std::fs::write(&path, "").unwrap();

        let (config, source) = Config::load_or_default(&path);
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let (config, source) = Config::load_or_default(&dir.path().join("absent.yml"));
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("newline.yml");
        std::fs::write(&path, "autoCommit: [not, a, bool\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Yaml { .. })));

        std::fs::write(&path, "autoCommit: \"sometimes\"\n").unwrap();
        let (config, source) = Config::load_or_default(&path);
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_glob_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("newline.yml");
        std::fs::write(&path, "autoCommit: false\nignorePaths:\n  - \"src/[a-\"\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::InvalidGlob { .. })
        ));
        let (config, _) = Config::load_or_default(&path);
        assert!(config.auto_commit);
    }

    #[test]
    fn star_does_not_cross_directories() {
        let set = compile_ignore_set(&["*.txt".to_string(), "bin/**".to_string()]).unwrap();
        assert!(set.is_match("notes.txt"));
        assert!(!set.is_match("docs/notes.txt"));
        assert!(set.is_match("bin/a/b/c"));
        assert!(!set.is_match("src/bin.rs"));
    }

    #[test]
    fn resolve_config_path_joins_root() {
        let p = resolve_config_path(Path::new("/work"), Path::new(DEFAULT_CONFIG_PATH));
        assert_eq!(p, PathBuf::from("/work/.github/newline.yml"));
    }
}
