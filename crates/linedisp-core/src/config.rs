/*!
 * Configuration management for linedisp.
 *
 * This module loads the settings used to pick and open a display: which
 * driver and protocol to use, the text encoding, and the driver options.
 */
use std::path::Path;

use config::{Config as ConfigLib, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::DriverConfig;

/// Top-level linedisp configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Display selection and driver options
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "linedisp_drivers=trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to include the event target in log lines
    #[serde(default = "default_log_target")]
    pub with_target: bool,
}

/// Which display to open and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Registered driver name
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Protocol name
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Code page label for row text; `None` sends UTF-8 unchanged
    #[serde(default)]
    pub encoding: Option<String>,

    /// Driver specific options
    #[serde(default)]
    pub options: DriverConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            with_target: default_log_target(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            protocol: default_protocol(),
            encoding: None,
            options: DriverConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_target() -> bool {
    true
}

fn default_driver() -> String {
    "serial".to_string()
}

fn default_protocol() -> String {
    "firich".to_string()
}

/// A builder for creating a configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<String>,
    environment_prefix: Option<String>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config file path
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Set the environment variable prefix for configuration.
    ///
    /// Variables look like `PREFIX__DISPLAY__OPTIONS__PORT`.
    pub fn with_environment_prefix<S: AsRef<str>>(mut self, prefix: S) -> Self {
        self.environment_prefix = Some(prefix.as_ref().to_string());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        let mut config_builder = ConfigLib::builder().add_source(
            ConfigLib::try_from(&Config::default())
                .map_err(|e| Error::config(format!("Failed to create default config: {}", e)))?,
        );

        if let Some(config_file) = self.config_file {
            let path = Path::new(&config_file);
            if path.exists() {
                debug!("Loading configuration from {}", config_file);
                config_builder = config_builder.add_source(File::with_name(&config_file));
            } else {
                debug!("Configuration file {} does not exist, using defaults", config_file);
            }
        }

        if let Some(prefix) = self.environment_prefix {
            debug!("Loading configuration from environment variables with prefix {}", prefix);
            config_builder = config_builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = config_builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build configuration: {}", e)))?
            .try_deserialize::<Config>()
            .map_err(|e| Error::config(format!("Failed to deserialize configuration: {}", e)))?;

        info!(
            driver = %config.display.driver,
            protocol = %config.display.protocol,
            "Configuration loaded"
        );
        Ok(config)
    }
}
