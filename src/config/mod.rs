//! Configuration module for salesboard.
//!
//! Handles connection configuration, deployment detection, environment
//! variables, and settings.

mod connection;
mod deployment;
mod settings;

pub use connection::{ConnectionConfig, ConnectionError, Driver};
pub use deployment::Deployment;
pub use settings::{
    expand_env_vars, ConnectionSettings, DashboardSettings, DeploymentSettings, LogFormat,
    LoggingSettings, PoolSettings, ResolvedConnection, Settings, SettingsError, WorkerSettings,
};
