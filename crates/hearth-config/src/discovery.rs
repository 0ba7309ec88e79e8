//! Config file discovery and layered merging.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/hearth/config.toml` (user config)
//! 2. `./hearth.toml` (project-local), or an explicit `--config` path
//! 3. CLI arguments (handled externally)

use std::path::{Path, PathBuf};

use crate::{ConfigError, HearthConfig, Result, SESSION_KEY_ENV};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "hearth.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for config directory resolution.
const APP_NAME: &str = "hearth";

/// Environment variable to override the user config directory.
const CONFIG_DIR_ENV: &str = "HEARTH_CONFIG_DIR";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: HearthConfig,
    /// Sources that were checked, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Warnings generated during loading (e.g., plaintext session key).
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load configuration by discovering and merging all config layers.
///
/// An explicit `path` replaces the project-local `hearth.toml` and must exist.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(path, None)
}

/// Load configuration with explicit control over the user config directory.
///
/// `user_dir` overrides both `HEARTH_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(path: Option<&Path>, user_dir: Option<&Path>) -> Result<LoadedConfig> {
    let mut config = HearthConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    // 1. User config
    let user_path = match user_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => user_config_path(),
    };
    if let Some(user_path) = user_path {
        sources.push(load_layer(&mut config, &user_path, &mut warnings));
    }

    // 2. Explicit file or project-local config
    match path {
        Some(path) => {
            config.merge(load_config_file(path)?);
            sources.push(ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            });
        }
        None => {
            let project_path = PathBuf::from(PROJECT_CONFIG_FILE);
            sources.push(load_layer(&mut config, &project_path, &mut warnings));
        }
    }

    if config.session.as_ref().is_some_and(|s| s.has_plaintext_key()) {
        warnings.push(format!(
            "Session key found in plaintext config file; prefer the {} environment variable",
            SESSION_KEY_ENV
        ));
    }

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<HearthConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    HearthConfig::from_toml(&contents)
}

/// Path of the user config file.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// User config directory for hearth.
///
/// Checks `HEARTH_CONFIG_DIR` first, then falls back to the platform default.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Try to load a config file and merge it into the existing config.
///
/// Missing files are skipped; unreadable or malformed files become warnings.
fn load_layer(config: &mut HearthConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    let loaded = match load_config_file(path) {
        Ok(layer) => {
            config.merge(layer);
            true
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            false
        }
    };
    ConfigSource {
        path: path.to_path_buf(),
        loaded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_layers_merge_with_explicit_file_on_top() {
        let user_dir = TempDir::new().unwrap();
        fs::write(
            user_dir.path().join(USER_CONFIG_FILE),
            "[server]\nbind = \"127.0.0.1:1111\"\n[session]\ncookie_name = \"user\"\n",
        )
        .unwrap();

        let project = TempDir::new().unwrap();
        let explicit = project.path().join("custom.toml");
        fs::write(&explicit, "[session]\ncookie_name = \"explicit\"\n").unwrap();

        let loaded = load_config_with_options(Some(&explicit), Some(user_dir.path())).unwrap();
        assert_eq!(loaded.config.server().bind, "127.0.0.1:1111");
        assert_eq!(loaded.config.session().cookie_name, "explicit");
        assert_eq!(loaded.loaded_from().len(), 2);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let user_dir = TempDir::new().unwrap();
        let missing = user_dir.path().join("nope.toml");
        let err = load_config_with_options(Some(&missing), Some(user_dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_malformed_user_layer_is_warning() {
        let user_dir = TempDir::new().unwrap();
        fs::write(user_dir.path().join(USER_CONFIG_FILE), "[server\n").unwrap();

        let explicit = user_dir.path().join("ok.toml");
        fs::write(&explicit, "").unwrap();

        let loaded = load_config_with_options(Some(&explicit), Some(user_dir.path())).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].starts_with("Failed to load"));
    }

    #[test]
    fn test_plaintext_key_warns() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("hearth.toml");
        fs::write(&explicit, "[session]\nkey = \"abc\"\n").unwrap();

        let loaded = load_config_with_options(Some(&explicit), Some(dir.path())).unwrap();
        assert!(loaded.warnings.iter().any(|w| w.contains(SESSION_KEY_ENV)));
    }
}
