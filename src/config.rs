//! Codec configuration.
//!
//! Loaded from a TOML file. Every section is optional and falls back to its
//! defaults:
//!
//! ```toml
//! [compression]
//! level = 9
//! max_header_block_size = 262144
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! timestamps = false
//! target = true
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::compression::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_HEADER_BLOCK_SIZE};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Header compression settings
    #[serde(default)]
    pub compression: CompressionConfig,

    /// Logging settings (used by the binaries only)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression.level > 9 {
            return Err(ConfigError::Invalid(format!(
                "compression.level must be 0-9, got {}",
                self.compression.level
            )));
        }
        if self.compression.max_header_block_size == 0 {
            return Err(ConfigError::Invalid(
                "compression.max_header_block_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Header compression settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompressionConfig {
    /// zlib level for outbound header blocks (0-9)
    #[serde(default = "default_level")]
    pub level: u32,

    /// Largest decompressed header block accepted from the peer, in bytes
    #[serde(default = "default_max_header_block_size")]
    pub max_header_block_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            max_header_block_size: default_max_header_block_size(),
        }
    }
}

fn default_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

fn default_max_header_block_size() -> usize {
    DEFAULT_MAX_HEADER_BLOCK_SIZE
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "spdy=trace"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub timestamps: bool,

    /// Include the event target (module path) in each line
    #[serde(default = "default_true")]
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            timestamps: false,
            target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.compression.level, 9);
        assert_eq!(config.compression.max_header_block_size, 256 * 1024);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.logging.target);
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            [compression]
            level = 1
            max_header_block_size = 4096

            [logging]
            level = "spdy=trace"
            format = "json"
            timestamps = true
            target = false
            "#,
        )
        .unwrap();
        assert_eq!(config.compression.level, 1);
        assert_eq!(config.compression.max_header_block_size, 4096);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.timestamps);
        assert!(!config.logging.target);
    }

    #[test]
    fn test_reject_unknown_field() {
        let err = Config::parse("[compression]\nwindow = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_reject_bad_level() {
        let err = Config::parse("[compression]\nlevel = 12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_reject_zero_block_size() {
        let err = Config::parse("[compression]\nmax_header_block_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/spdy.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
