//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/foldertree/foldertree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `FOLDERTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for foldertree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// TOML dataset of folder records (default: built-in sample data)
    pub data_file: Option<PathBuf>,
    /// Worker threads for cross-organization aggregation (0 = one per core)
    pub workers: usize,
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub workers: Option<usize>,
}

/// Get the XDG config directory for foldertree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "foldertree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("foldertree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(data_file) = &self.data_file {
            self.data_file = Some(PathBuf::from(expand_path(
                data_file.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .or_else(|| self.data_file.clone()),
            workers: overlay.workers.unwrap_or(self.workers),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional explicit config file (must exist if given)
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply FOLDERTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FOLDERTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("workers") {
            settings.workers = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("FOLDERTREE_WORKERS={val}: {e}"),
            })?;
        }

        Ok(settings)
    }

    /// Load a single config file on top of compiled defaults, ignoring
    /// global config and environment.
    pub fn load_file_only(path: &Path) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let config = Config::builder()
            .set_default("workers", defaults.workers as i64)
            .map_err(config_err)?
            .add_source(File::from(path).required(true))
            .build()
            .map_err(config_err)?;

        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# foldertree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/foldertree/foldertree.toml
#   Local:  file given with --config
#   Env:    FOLDERTREE_* environment variables (explicit overrides)

# TOML dataset of [[folders]] records (name, org_id, path).
# Without it the built-in sample data is used.
# data_file = "~/folders.toml"

# Worker threads for `foldertree all` (0 = one per core)
# workers = 0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_sample_data_and_auto_workers() {
        let settings = Settings::default();
        assert!(settings.data_file.is_none());
        assert_eq!(settings.workers, 0);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings {
            data_file: Some(PathBuf::from("/data/base.toml")),
            workers: 2,
        };
        let overlay = RawSettings {
            data_file: None,
            workers: Some(8),
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.data_file, Some(PathBuf::from("/data/base.toml")));
        assert_eq!(merged.workers, 8);
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: Some(PathBuf::from("~/folders.toml")),
            workers: 0,
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.data_file.unwrap();
        assert!(
            path.to_string_lossy().starts_with(&home),
            "data_file should start with home dir: {}",
            path.display()
        );
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.data_file.is_none());
        assert!(raw.workers.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips() {
        let settings = Settings {
            data_file: Some(PathBuf::from("/data/folders.toml")),
            workers: 4,
        };
        let raw: RawSettings = toml::from_str(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
