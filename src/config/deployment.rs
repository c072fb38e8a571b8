//! Deployment environment detection.
//!
//! The environment picks which connection profile (and so which
//! `DatabaseClient` implementation) serves the session. Detection runs once
//! at startup; nothing switches drivers at query time.

use std::env;
use std::fmt;

/// Where the dashboard is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    /// Developer machine next to the database server.
    #[default]
    Local,
    /// Hosted deployment with SQL-login credentials.
    Cloud,
}

impl Deployment {
    /// Detect the deployment from `IS_CLOUD` and `DEPLOY_ENVIRONMENT`.
    pub fn detect() -> Self {
        Self::from_vars(
            env::var("IS_CLOUD").ok().as_deref(),
            env::var_os("DEPLOY_ENVIRONMENT").is_some(),
        )
    }

    /// `IS_CLOUD=true` (any case) or any `DEPLOY_ENVIRONMENT` means cloud.
    pub fn from_vars(is_cloud: Option<&str>, deploy_environment_set: bool) -> Self {
        let flagged = is_cloud
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if flagged || deploy_environment_set {
            Deployment::Cloud
        } else {
            Deployment::Local
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::Local => "local",
            Deployment::Cloud => "cloud",
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
