//! Config Parser: load game definitions from JSON or YAML
//!
//! ## Usage
//!
//! ```rust,ignore
//! let parser = ConfigParser::new();
//! let config = parser.load("games/classic.yaml")?;
//! let engine = PayoutEngine::from_config(config)?;
//! ```

use std::path::Path;

use sl_core::ConfigError;

use crate::config::GameConfig;

/// Config Parser
pub struct ConfigParser {
    /// Validation limits
    pub limits: ConfigLimits,
}

/// Parsing limits for untrusted files
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    pub max_name_length: usize,
    pub max_symbols: usize,
    pub max_paylines: usize,
    pub max_reels: usize,
    pub max_rows: usize,
    pub max_multiplier: u64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_name_length: 256,
            max_symbols: 50,
            max_paylines: 100,
            max_reels: 10,
            max_rows: 10,
            max_multiplier: 1_000_000,
        }
    }
}

impl ConfigParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            limits: ConfigLimits::default(),
        }
    }

    /// Create parser with custom limits
    pub fn with_limits(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Parse a JSON game definition
    pub fn parse_json(&self, json: &str) -> Result<GameConfig, ConfigParseError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigParseError::Json(e.to_string()))?;
        self.check(config)
    }

    /// Parse a YAML game definition
    pub fn parse_yaml(&self, yaml: &str) -> Result<GameConfig, ConfigParseError> {
        let config: GameConfig =
            serde_yml::from_str(yaml).map_err(|e| ConfigParseError::Yaml(e.to_string()))?;
        self.check(config)
    }

    /// Load from disk; `.yaml` / `.yml` parse as YAML, anything else as JSON
    pub fn load(&self, path: impl AsRef<Path>) -> Result<GameConfig, ConfigParseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigParseError::Io(format!("{}: {}", path.display(), e)))?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        log::debug!("[Parser] loading {} ({})", path.display(), if is_yaml { "yaml" } else { "json" });

        if is_yaml {
            self.parse_yaml(&text)
        } else {
            self.parse_json(&text)
        }
    }

    /// Check size limits, then semantic validity
    fn check(&self, config: GameConfig) -> Result<GameConfig, ConfigParseError> {
        self.validate(&config)?;
        config.validate()?;
        Ok(config)
    }

    /// Check size limits
    pub fn validate(&self, config: &GameConfig) -> Result<(), ConfigParseError> {
        let limits = &self.limits;

        if config.name.len() > limits.max_name_length {
            return Err(ConfigParseError::Validation(format!(
                "Game name too long: {} > {}",
                config.name.len(),
                limits.max_name_length
            )));
        }

        if config.symbols.len() > limits.max_symbols {
            return Err(ConfigParseError::Validation(format!(
                "Too many symbols: {} > {}",
                config.symbols.len(),
                limits.max_symbols
            )));
        }

        if config.cols > limits.max_reels {
            return Err(ConfigParseError::Validation(format!(
                "Too many reels: {} > {}",
                config.cols, limits.max_reels
            )));
        }

        if config.rows > limits.max_rows {
            return Err(ConfigParseError::Validation(format!(
                "Too many rows: {} > {}",
                config.rows, limits.max_rows
            )));
        }

        let payline_count = config.paylines.as_ref().map_or(0, Vec::len);
        if payline_count > limits.max_paylines {
            return Err(ConfigParseError::Validation(format!(
                "Too many paylines: {} > {}",
                payline_count, limits.max_paylines
            )));
        }

        let largest = config
            .symbols
            .iter()
            .flat_map(|s| s.pays.values().copied())
            .max()
            .unwrap_or(0);
        if largest > limits.max_multiplier {
            return Err(ConfigParseError::Validation(format!(
                "Multiplier too large: {} > {}",
                largest, limits.max_multiplier
            )));
        }

        Ok(())
    }
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Config parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
