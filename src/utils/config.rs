// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{from_delimited, DataError, Record, RecordDecoder, Schema};
use crate::display::{ShowOptions, DEFAULT_COLUMN_WIDTH, DEFAULT_SHOW_ROWS};
use crate::processing::Pipeline;
use super::{validate_delimiter, validate_range, ConfigError};

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
    pub decode: DecodeConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Table rendering configuration for `show()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub rows: usize,
    pub column_width: usize,
}

/// Delimited text decoding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub delimiter: char,
    pub quoted: bool,
    pub has_header: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            rows: DEFAULT_SHOW_ROWS,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            delimiter: ',',
            quoted: false,
            has_header: false,
        }
    }
}

impl Config {
    /// Load configuration from a `.json`, `.yaml` or `.yml` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config: Config = match extension.as_str() {
            "json" => serde_json::from_str(&contents)?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_range(self.display.column_width, 2, 1024, "display.column_width")
            .map_err(ConfigError::Invalid)?;
        validate_delimiter(self.decode.delimiter, self.decode.quoted)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.parse_level()?;
        Ok(())
    }

    /// Get the log level filter. Unknown levels fall back to `Info`;
    /// `validate` rejects them before that can happen for loaded files.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.parse_level().unwrap_or(log::LevelFilter::Info)
    }

    fn parse_level(&self) -> Result<log::LevelFilter, ConfigError> {
        self.logging.level.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "logging.level: unknown level '{}'",
                self.logging.level
            ))
        })
    }

    pub fn show_options(&self) -> ShowOptions {
        ShowOptions {
            rows: self.display.rows,
            column_width: self.display.column_width,
        }
    }

    /// Build a decoder for `schema` using the configured delimiter and quoting
    pub fn decoder_for(&self, schema: Arc<Schema>) -> Result<RecordDecoder, DataError> {
        RecordDecoder::new(schema, self.decode.delimiter)?.with_quoting(self.decode.quoted)
    }

    /// Lazily decode the delimited file at `path`, skipping its first line
    /// when `decode.has_header` is set
    pub fn from_delimited<P: AsRef<Path>>(
        &self,
        path: P,
        schema: Arc<Schema>,
    ) -> Result<Pipeline<Record>, DataError> {
        let decoder = self.decoder_for(schema)?;
        Ok(from_delimited(path, decoder, self.decode.has_header))
    }
}
