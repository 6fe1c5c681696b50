//! Configuration loader for jsp2rest.
//!
//! `defaults/jsp2rest.default.toml` is embedded into the binary so that the documented
//! defaults and runtime behavior stay in sync. The CLI layers an optional
//! `jsp2rest.toml`, an explicit `--config` file and flag overrides on top of those
//! defaults via [`Loader`] before deserializing into [`Jsp2RestConfig`].

use crate::jsp::driver::DriverOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/jsp2rest.default.toml");

/// File picked up from the working directory when present
pub const LOCAL_CONFIG_FILE: &str = "jsp2rest.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Jsp2RestConfig {
    pub convert: ConvertConfig,
    pub logging: LoggingConfig,
}

/// Knobs of the generated class.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub package: String,
    pub embed_source: bool,
    pub named_component: bool,
}

impl ConvertConfig {
    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            embed_source: self.embed_source,
            named_component: self.named_component,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset
    pub level: String,
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

    /// Apply a single key/value override, e.g. `convert.package` from a CLI flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Jsp2RestConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Jsp2RestConfig, ConfigError> {
    Loader::new().build()
}
