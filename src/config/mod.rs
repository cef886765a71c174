use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Accept the built-in admin/doctor/patient demo accounts
    #[serde(default = "default_true")]
    pub demo_accounts_enabled: bool,
    /// Minimum password length for local sign-ups
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_accounts_enabled: true,
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_password_length() -> usize {
    6
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Start collections from the bundled demo data
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Currency label attached to invoice totals
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "PKR".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
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

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse configuration file")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            billing: BillingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.data_dir, PathBuf::from("./data"));
        assert!(config.auth.demo_accounts_enabled);
        assert_eq!(config.auth.min_password_length, 6);
        assert!(config.storage.seed_demo_data);
        assert_eq!(config.billing.currency, "PKR");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [server]
            port = 9090

            [auth]
            demo_accounts_enabled = false

            [billing]
            currency = "USD"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.auth.demo_accounts_enabled);
        assert_eq!(config.auth.min_password_length, 6);
        assert_eq!(config.billing.currency, "USD");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::parse("[server\nport = ").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/clinic.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
