use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: LogRotation,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Log file rotation period
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    #[default]
    Never,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// In-flight requests past this deadline are dropped, rolling back any open transaction
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// PostgreSQL connection settings, overridable through `DB_*` variables
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// libpq sslmode: disable, allow, prefer, require, verify-ca, verify-full
    pub ssl_mode: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Issue `CREATE DATABASE` for `name` when the server does not have it yet
    pub create_if_missing: bool,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "wallet_db".to_string(),
            ssl_mode: "disable".to_string(),
            max_connections: 25,
            acquire_timeout_secs: 5,
            max_lifetime_secs: 300,
            create_if_missing: true,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    pub fn apply_env_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DB_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.port = parse_port("DB_PORT", port)?;
        }
        if let Some(user) = lookup("DB_USER") {
            self.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.password = password;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.name = name;
        }
        if let Some(ssl_mode) = lookup("DB_SSLMODE") {
            self.ssl_mode = ssl_mode;
        }
        Ok(())
    }
}

fn parse_port(key: &'static str, value: String) -> Result<u16, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

/// Optional dotenv file read before the process environment is consulted
pub const ENV_FILE: &str = "config.env";

impl AppConfig {
    /// Load `config/{env}.yaml`, then apply `DB_*` / `SERVER_PORT` overrides.
    ///
    /// Variables from `config.env` are loaded first when the file exists;
    /// variables already set in the environment take precedence.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        let _ = dotenv::from_filename(ENV_FILE);
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.database.apply_env_overrides(&lookup)?;
        if let Some(port) = lookup("SERVER_PORT") {
            self.gateway.port = parse_port("SERVER_PORT", port)?;
        }
        Ok(())
    }
}
