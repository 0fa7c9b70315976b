//! Loader settings.
//!
//! `defaults/bakery.default.toml` is embedded so the documented defaults and
//! [`LoaderConfig::default`] never drift apart. [`ConfigLoader`] layers files,
//! `BAKERY_*` environment variables and explicit overrides on top of it.

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;

use crate::error::Result;
use crate::scanner::Termination;

const DEFAULT_TOML: &str = include_str!("../defaults/bakery.default.toml");
pub const ENV_PREFIX: &str = "BAKERY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderConfig {
    pub termination: Termination,
    pub unique_recipe_names: bool,
    pub sort_entries: bool,
    pub follow_links: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            termination: Termination::Lenient,
            unique_recipe_names: false,
            sort_entries: false,
            follow_links: false,
        }
    }
}

impl LoaderConfig {
    /// Strict termination and unique names, for callers that want every
    /// anomaly in a recipe tree reported.
    pub fn strict() -> Self {
        Self {
            termination: Termination::Strict,
            unique_recipe_names: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `BAKERY_*` environment variables, e.g. `BAKERY_TERMINATION=strict`.
    pub fn with_env(mut self) -> Self {
        self.builder = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<LoaderConfig> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BakeryError;

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = ConfigLoader::new().build().expect("defaults to deserialize");
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn overrides_win_over_defaults() {
        let config = ConfigLoader::new()
            .set_override("termination", "strict")
            .and_then(|loader| loader.set_override("sort_entries", true))
            .and_then(ConfigLoader::build)
            .expect("overrides to apply");
        assert_eq!(config.termination, Termination::Strict);
        assert!(config.sort_entries);
        assert!(!config.unique_recipe_names);
    }

    #[test]
    fn files_layer_over_defaults() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("bakery.toml");
        std::fs::write(&path, "sort_entries = true\nfollow_links = true\n").expect("write settings");
        let config = ConfigLoader::new()
            .with_file(&path)
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .expect("file to apply");
        assert!(config.sort_entries);
        assert!(config.follow_links);
        assert_eq!(config.termination, Termination::Lenient);
    }

    #[test]
    fn missing_required_file_is_a_config_error() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let err = ConfigLoader::new().with_file(dir.path().join("absent.toml")).build().unwrap_err();
        assert!(matches!(err, BakeryError::Config(_)), "got {err:?}");
    }

    #[test]
    fn environment_layers_over_files() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("bakery.toml");
        std::fs::write(&path, "termination = \"lenient\"\nsort_entries = true\n").expect("write settings");
        // no other test reads BAKERY_* variables
        unsafe {
            std::env::set_var("BAKERY_TERMINATION", "strict");
            std::env::set_var("BAKERY_UNIQUE_RECIPE_NAMES", "true");
        }
        let config = ConfigLoader::new().with_file(&path).with_env().build();
        unsafe {
            std::env::remove_var("BAKERY_TERMINATION");
            std::env::remove_var("BAKERY_UNIQUE_RECIPE_NAMES");
        }
        let config = config.expect("env to apply");
        assert_eq!(config.termination, Termination::Strict);
        assert!(config.unique_recipe_names);
        assert!(config.sort_entries, "file values the environment leaves alone survive");
    }
}
