//! Configuration management.

use serde::Deserialize;
use std::path::Path;

use crate::observability::{LogFormat, LoggingConfig};
use crate::rendering::ColumnLayout;
use crate::{Error, Result};

/// Main configuration for embedfs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Column layout for table templates.
    pub table: ColumnLayout,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Table layout section.
    pub table: Option<ConfigFileTable>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Table section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileTable {
    /// Minimum column width.
    pub min_width: Option<usize>,
    /// Tab stop width.
    pub tab_width: Option<usize>,
    /// Cell padding.
    pub padding: Option<usize>,
    /// Padding character.
    pub pad_char: Option<char>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// `EnvFilter` directive string, e.g. `"embedfs=debug"`.
    pub filter: Option<String>,
    /// Output format: "pretty", "compact" or "json".
    pub format: Option<String>,
}

impl EmbedConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// Absent sections and keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::Config {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Converts a `ConfigFile` to `EmbedConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(table) = file.table {
            if let Some(v) = table.min_width {
                config.table.min_width = v;
            }
            if let Some(v) = table.tab_width {
                config.table.tab_width = v;
            }
            if let Some(v) = table.padding {
                config.table.padding = v;
            }
            if let Some(v) = table.pad_char {
                config.table.pad_char = v;
            }
        }
        if let Some(logging) = file.logging {
            if let Some(filter) = logging.filter {
                config.logging.filter = filter;
            }
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
        }

        config
    }

    /// Sets the table column layout.
    #[must_use]
    pub const fn with_table_layout(mut self, layout: ColumnLayout) -> Self {
        self.table = layout;
        self
    }
}
