//! TOML-based configuration for salesboard.
//!
//! Supports a config file (salesboard.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.local]
//! driver = "mssql"
//! connection_string = "sqlserver://localhost/SQLEXPRESS?database=AdventureWorks2022&trusted_connection=true&encrypt=disable"
//!
//! [connections.cloud]
//! driver = "mssql"
//! connection_string = "${SALES_DB_CONNECTION_STRING}"
//!
//! [connections.sample]
//! driver = "sqlite"
//! connection_string = "./data/adventureworks.sqlite"
//!
//! [deployment]
//! local = "local"
//! cloud = "cloud"
//!
//! [worker]
//! path = "./salesboard-worker"
//! timeout_secs = 60
//!
//! [worker.pool]
//! max_idle_conns = 2
//! max_open_conns = 4
//!
//! [dashboard]
//! granularity = "quarter"
//! top_n = 10
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::{ConnectionConfig, Driver};
use super::deployment::Deployment;
use crate::model::Granularity;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: HashMap<String, ConnectionSettings>,

    /// Which connection serves each deployment environment.
    pub deployment: DeploymentSettings,

    /// Database worker configuration.
    pub worker: WorkerSettings,

    /// Dashboard defaults and limits.
    pub dashboard: DashboardSettings,

    /// Log output.
    pub logging: LoggingSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Database driver (mssql, duckdb, sqlite).
    pub driver: String,

    /// Connection string (supports ${ENV_VAR} expansion).
    pub connection_string: String,
}

impl ConnectionSettings {
    /// Get the driver type.
    pub fn driver_type(&self) -> Result<Driver, SettingsError> {
        Driver::from_str(&self.driver)
            .map_err(|_| SettingsError::UnsupportedDriver(self.driver.clone()))
    }

    /// Get the connection string with environment variables expanded.
    pub fn resolved_connection_string(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.connection_string)
    }

    fn resolve(&self, name: &str) -> Result<ResolvedConnection, SettingsError> {
        Ok(ResolvedConnection {
            name: name.to_string(),
            driver: self.driver_type()?,
            connection_string: self.resolved_connection_string()?,
        })
    }
}

/// A connection ready to hand to a database client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConnection {
    /// Profile name the connection came from.
    pub name: String,
    pub driver: Driver,
    /// Fully expanded, driver-specific connection string.
    pub connection_string: String,
}

impl ResolvedConnection {
    pub fn from_config(name: impl Into<String>, config: &ConnectionConfig) -> Self {
        Self {
            name: name.into(),
            driver: config.driver,
            connection_string: config.to_connection_string(),
        }
    }
}

/// Connection profile names per deployment environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentSettings {
    pub local: String,
    pub cloud: String,
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            local: "local".to_string(),
            cloud: "cloud".to_string(),
        }
    }
}

impl DeploymentSettings {
    pub fn profile_for(&self, deployment: Deployment) -> &str {
        match deployment {
            Deployment::Local => &self.local,
            Deployment::Cloud => &self.cloud,
        }
    }
}

/// Worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Path to worker binary.
    pub path: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection pool settings.
    pub pool: PoolSettings,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            path: None,
            timeout_secs: 30,
            pool: PoolSettings::default(),
        }
    }
}

impl WorkerSettings {
    /// Get the worker binary path.
    ///
    /// Returns the configured path, or searches common locations and `PATH`.
    pub fn worker_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            let expanded = expand_env_vars(path).ok()?;
            return Some(PathBuf::from(expanded));
        }

        let candidates = [
            "salesboard-worker",
            "./salesboard-worker",
            "./worker/salesboard-worker",
        ];

        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Some(path);
            }
        }

        // Try PATH
        if let Ok(output) = std::process::Command::new("which")
            .arg("salesboard-worker")
            .output()
        {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(PathBuf::from(path));
                }
            }
        }

        None
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Maximum number of idle connections per pool.
    pub max_idle_conns: u32,

    /// Maximum number of open connections per pool.
    pub max_open_conns: u32,

    /// Maximum connection lifetime (e.g., "5m", "1h").
    pub conn_max_lifetime: String,

    /// Maximum connection idle time (e.g., "1m", "30s").
    pub conn_max_idle_time: String,
}

impl Default for PoolSettings {
    fn default() -> Self {
        // One query per session: a single connection is plenty.
        Self {
            max_idle_conns: 1,
            max_open_conns: 1,
            conn_max_lifetime: "5m".to_string(),
            conn_max_idle_time: "1m".to_string(),
        }
    }
}

impl PoolSettings {
    /// Convert to worker command-line arguments.
    pub fn to_worker_args(&self) -> Vec<String> {
        vec![
            "-pool".to_string(),
            format!("-pool-max-idle={}", self.max_idle_conns),
            format!("-pool-max-open={}", self.max_open_conns),
            format!("-pool-conn-lifetime={}", self.conn_max_lifetime),
            format!("-pool-conn-idle={}", self.conn_max_idle_time),
        ]
    }
}

/// Dashboard defaults.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Initial time-bucket granularity.
    pub granularity: Granularity,

    /// Initial number of products in the ranking.
    pub top_n: usize,

    /// Smallest selectable ranking size.
    pub top_n_min: usize,

    /// Largest selectable ranking size.
    pub top_n_max: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            granularity: Granularity::Month,
            top_n: 10,
            top_n_min: 5,
            top_n_max: 50,
        }
    }
}

impl DashboardSettings {
    /// Clamp a requested ranking size into `[top_n_min, top_n_max]`.
    ///
    /// An inverted range (only reachable by building the struct by hand)
    /// resolves to `top_n_min`.
    pub fn clamp_top_n(&self, requested: usize) -> usize {
        requested.min(self.top_n_max).max(self.top_n_min)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.top_n_min == 0 || self.top_n_min > self.top_n_max {
            return Err(SettingsError::InvalidConfig(format!(
                "dashboard.top_n range [{}, {}] is empty",
                self.top_n_min, self.top_n_max
            )));
        }
        if !(self.top_n_min..=self.top_n_max).contains(&self.top_n) {
            return Err(SettingsError::InvalidConfig(format!(
                "dashboard.top_n = {} is outside [{}, {}]",
                self.top_n, self.top_n_min, self.top_n_max
            )));
        }
        Ok(())
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.dashboard.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SALESBOARD_CONFIG`
    /// 2. `./salesboard.toml`
    /// 3. `<config dir>/salesboard/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SALESBOARD_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("salesboard.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("salesboard").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Pick the connection for this session.
    ///
    /// An explicit `name` wins. Otherwise the deployment's profile is used,
    /// then a connection named `default`, then the only connection if exactly
    /// one is configured. With no connections at all, the local
    /// AdventureWorks instance is assumed.
    pub fn resolve_connection(
        &self,
        name: Option<&str>,
        deployment: Deployment,
    ) -> Result<ResolvedConnection, SettingsError> {
        if let Some(name) = name {
            return self.get_connection(name)?.resolve(name);
        }

        if self.connections.is_empty() {
            return Ok(ResolvedConnection::from_config(
                "builtin",
                &ConnectionConfig::adventure_works_local(),
            ));
        }

        let profile = self.deployment.profile_for(deployment);
        if let Some(conn) = self.connections.get(profile) {
            return conn.resolve(profile);
        }

        if let Some(conn) = self.connections.get("default") {
            return conn.resolve("default");
        }

        if self.connections.len() == 1 {
            if let Some((name, conn)) = self.connections.iter().next() {
                return conn.resolve(name);
            }
        }

        Err(SettingsError::ConnectionNotFound(profile.to_string()))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        if braced {
            while let Some(ch) = chars.next_if(|&ch| ch != '}') {
                var_name.push(ch);
            }
            chars.next(); // closing '}'
        } else {
            while let Some(ch) = chars.next_if(|&ch| ch.is_alphanumeric() || ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
