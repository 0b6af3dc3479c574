//! Shared configuration loader for the mill site generator.
//!
//! `defaults/mill.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MillConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mill_site::watch::WatchOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/mill.default.toml");

/// Top-level configuration consumed by mill applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MillConfig {
    pub site: SiteSection,
    pub paths: PathsSection,
    pub watch: WatchSection,
}

/// Site identity.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
    pub title: String,
    pub cname: String,
}

/// Where content comes from and where output goes.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Relative to `input`.
    pub template: PathBuf,
}

/// Watch-mode knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    pub poll_interval_ms: u64,
}

impl From<&WatchSection> for WatchOptions {
    fn from(section: &WatchSection) -> Self {
        WatchOptions {
            poll_interval: Duration::from_millis(section.poll_interval_ms),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
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

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MillConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MillConfig, ConfigError> {
    Loader::new().build()
}
