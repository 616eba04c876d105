//! Configuration management for statera
//!
//! This module handles loading, validation, and management of
//! statera configuration from YAML files.

pub mod error;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorCode, ConfigErrorDetails, ConfigResult};

// ==================== Configuration Types ====================

/// Engine defaults applied when a line item is added without values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Placeholder name for new line items
    #[serde(default = "default_item_name")]
    pub default_item_name: String,
    /// Placeholder amount for new line items
    #[serde(default)]
    pub default_amount: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_item_name: default_item_name(),
            default_amount: Decimal::ZERO,
        }
    }
}

fn default_item_name() -> String {
    "New item".to_string()
}

/// Extra name aliases for income statement roles.
///
/// These are appended to the built-in vocabulary, never replacing it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RolesConfig {
    #[serde(default)]
    pub cost_of_sales: Vec<String>,
    #[serde(default)]
    pub depreciation: Vec<String>,
    #[serde(default)]
    pub financial_expense: Vec<String>,
    #[serde(default)]
    pub tax_expense: Vec<String>,
    #[serde(default)]
    pub inventory: Vec<String>,
}

impl RolesConfig {
    /// Iterate over every configured alias list with its key
    pub fn entries(&self) -> [(&'static str, &[String]); 5] {
        [
            ("cost_of_sales", self.cost_of_sales.as_slice()),
            ("depreciation", self.depreciation.as_slice()),
            ("financial_expense", self.financial_expense.as_slice()),
            ("tax_expense", self.tax_expense.as_slice()),
            ("inventory", self.inventory.as_slice()),
        ]
    }
}

/// Import/export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// Field delimiter for tabular files
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: String,
    /// Give every imported line item a fresh id
    #[serde(default = "default_false")]
    pub regenerate_ids_on_import: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            csv_delimiter: default_csv_delimiter(),
            regenerate_ids_on_import: false,
        }
    }
}

impl IoConfig {
    /// Delimiter as a single byte, falling back to a comma
    pub fn delimiter_byte(&self) -> u8 {
        match self.csv_delimiter.as_bytes() {
            [b] => *b,
            _ => b',',
        }
    }
}

fn default_csv_delimiter() -> String {
    ",".to_string()
}

fn default_false() -> bool {
    false
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding saved templates
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
        }
    }
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("./templates")
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol printed before amounts
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Engine defaults
    #[serde(default)]
    pub engine: EngineConfig,
    /// Role vocabulary extensions
    #[serde(default)]
    pub roles: RolesConfig,
    /// Import/export settings
    #[serde(default)]
    pub io: IoConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.io.csv_delimiter.len() != 1 {
            return Err(ConfigError::InvalidValue {
                field: "io.csv_delimiter".to_string(),
                reason: "Delimiter must be exactly one ASCII character".to_string(),
            });
        }

        for (key, aliases) in self.roles.entries() {
            if aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("roles.{}", key),
                    reason: "Role aliases must not be blank".to_string(),
                });
            }
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.engine.default_item_name, "New item");
        assert_eq!(config.engine.default_amount, Decimal::ZERO);
        assert_eq!(config.io.delimiter_byte(), b',');
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
engine:
  default_item_name: "Nueva partida"
roles:
  cost_of_sales: ["Costo de mercancía"]
io:
  csv_delimiter: ";"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.engine.default_item_name, "Nueva partida");
        assert_eq!(config.roles.cost_of_sales, vec!["Costo de mercancía".to_string()]);
        assert!(config.roles.depreciation.is_empty());
        assert_eq!(config.io.delimiter_byte(), b';');
        assert!(!config.io.regenerate_ids_on_import);
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.data.templates_dir, PathBuf::from("./templates"));
    }

    #[test]
    fn test_invalid_delimiter() {
        let err = Config::from_yaml("io:\n  csv_delimiter: \";;\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "io.csv_delimiter"));
    }

    #[test]
    fn test_blank_alias_rejected() {
        let err = Config::from_yaml("roles:\n  tax_expense: [\"  \"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "roles.tax_expense"));
    }

    #[test]
    fn test_invalid_log_level() {
        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("engine: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here/statera.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
