//! CLI configuration.

use anyhow::{bail, Context, Result};
use ritual_bag::Currency;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Bag defaults.
    #[serde(default)]
    pub bag: BagConfig,

    /// Where bags are stored.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog fixture for `add-from-catalog`.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Check values that serde accepts but the CLI cannot use.
    pub fn validate(&self) -> Result<()> {
        self.bag.currency()?;
        if self.bag.session.trim().is_empty() {
            bail!("bag.session must not be empty");
        }
        if self.storage.backend == StorageBackend::File && self.storage.dir.trim().is_empty() {
            bail!("storage.dir must be set for the file backend");
        }
        Ok(())
    }
}

/// Bag defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagConfig {
    /// ISO currency code for new bags.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Session used when `--session` is not given.
    #[serde(default = "default_session")]
    pub session: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_session() -> String {
    "default".to_string()
}

impl BagConfig {
    /// Parsed currency.
    pub fn currency(&self) -> Result<Currency> {
        match Currency::from_code(&self.currency) {
            Some(currency) => Ok(currency),
            None => bail!("Unsupported currency in config: {}", self.currency),
        }
    }
}

impl Default for BagConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            session: default_session(),
        }
    }
}

/// Storage backend kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One file per bag under `dir`.
    #[default]
    File,
    /// Process memory; nothing survives the command.
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Store directory, relative to the working directory.
    #[serde(default = "default_store_dir")]
    pub dir: String,
}

fn default_store_dir() -> String {
    ".ritual/store".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            dir: default_store_dir(),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a JSON catalog fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<String>,
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Human,
    /// JSON format (for log aggregation).
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `warn` or `ritual_cache=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default ritual.toml config file.
pub fn generate_default_config(currency: &str) -> String {
    format!(
        r#"# Ritual Bag configuration

[bag]
currency = "{currency}"
session = "default"

[storage]
# "file" keeps bags between commands, "memory" forgets them on exit
backend = "file"
dir = ".ritual/store"

[catalog]
# fixture = "demos/catalog.json"

[logging]
level = "warn"
format = "human"
"#,
        currency = currency
    )
}
