//! Database connection configuration.
//!
//! Supports configuration via environment variables:
//! - `SALESBOARD_DB_DRIVER`: Database driver (mssql, duckdb, sqlite)
//! - `SALESBOARD_DB_HOST`: Server hostname, or file path for DuckDB/SQLite
//! - `SALESBOARD_DB_NAME`: Database name
//! - `SALESBOARD_DB_PORT`: Port (optional, uses driver default)

use std::env;
use std::fmt;

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported driver: {0}. Supported: mssql, duckdb, sqlite")]
    UnsupportedDriver(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// Microsoft SQL Server, through the database worker
    MsSql,
    /// DuckDB file, through the database worker
    DuckDb,
    /// SQLite file, opened in-process
    Sqlite,
}

impl Driver {
    /// Parse driver from string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConnectionError> {
        match s.to_lowercase().as_str() {
            "mssql" | "sqlserver" | "sql_server" => Ok(Driver::MsSql),
            "duckdb" | "duck" => Ok(Driver::DuckDb),
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            other => Err(ConnectionError::UnsupportedDriver(other.to_string())),
        }
    }

    /// Get the driver name for the worker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::MsSql => "mssql",
            Driver::DuckDb => "duckdb",
            Driver::Sqlite => "sqlite",
        }
    }

    /// Whether tables are addressed as `Schema.Table`.
    ///
    /// SQLite ports of the sales database flatten schemas away.
    pub fn qualifies_schemas(&self) -> bool {
        matches!(self, Driver::MsSql | Driver::DuckDb)
    }

    /// Whether queries go through the external database worker.
    pub fn uses_worker(&self) -> bool {
        matches!(self, Driver::MsSql | Driver::DuckDb)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Database driver.
    pub driver: Driver,
    /// Server hostname, optionally with a `\INSTANCE` suffix.
    pub host: String,
    /// Database name.
    pub database: String,
    /// Port (optional).
    pub port: Option<u16>,
    /// Use Windows trusted connection (SQL Server).
    pub trusted_connection: bool,
    /// Username (if not using trusted connection).
    pub username: Option<String>,
    /// Password (if not using trusted connection).
    pub password: Option<String>,
    /// Request TLS encryption (SQL Server).
    pub encrypt: bool,
}

impl ConnectionConfig {
    /// Create a new connection config for SQL Server with trusted connection.
    pub fn mssql_trusted(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            driver: Driver::MsSql,
            host: host.into(),
            database: database.into(),
            port: None,
            trusted_connection: true,
            username: None,
            password: None,
            encrypt: true,
        }
    }

    /// Create a new connection config for SQL Server with SQL authentication.
    pub fn mssql_login(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            driver: Driver::MsSql,
            host: host.into(),
            database: database.into(),
            port: None,
            trusted_connection: false,
            username: Some(username.into()),
            password: Some(password.into()),
            encrypt: true,
        }
    }

    /// The local SQL Express instance hosting AdventureWorks2022.
    ///
    /// Used when no connection is configured anywhere.
    pub fn adventure_works_local() -> Self {
        Self {
            encrypt: false,
            ..Self::mssql_trusted("localhost\\SQLEXPRESS", "AdventureWorks2022")
        }
    }

    /// Create a new connection config for DuckDB.
    pub fn duckdb(path: impl Into<String>) -> Self {
        Self::file(Driver::DuckDb, path)
    }

    /// Create a new connection config for a SQLite file.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self::file(Driver::Sqlite, path)
    }

    fn file(driver: Driver, path: impl Into<String>) -> Self {
        Self {
            driver,
            host: path.into(), // For file databases, "host" is the file path
            database: String::new(),
            port: None,
            trusted_connection: false,
            username: None,
            password: None,
            encrypt: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SALESBOARD_DB_DRIVER`: mssql, duckdb or sqlite
    /// - `SALESBOARD_DB_HOST`: Server hostname (or file path)
    /// - `SALESBOARD_DB_NAME`: Database name (SQL Server only)
    ///
    /// Optional:
    /// - `SALESBOARD_DB_PORT`: Server port
    /// - `SALESBOARD_DB_USER`: Username (if not using trusted connection)
    /// - `SALESBOARD_DB_PASSWORD`: Password (if not using trusted connection)
    /// - `SALESBOARD_DB_ENCRYPT`: `false` to disable TLS (SQL Server)
    pub fn from_env() -> Result<Self, ConnectionError> {
        let driver_str = env::var("SALESBOARD_DB_DRIVER")
            .map_err(|_| ConnectionError::MissingEnvVar("SALESBOARD_DB_DRIVER".to_string()))?;

        let driver = Driver::from_str(&driver_str)?;

        let host = env::var("SALESBOARD_DB_HOST")
            .map_err(|_| ConnectionError::MissingEnvVar("SALESBOARD_DB_HOST".to_string()))?;

        // Database name is required for SQL Server only
        let database = match driver {
            Driver::MsSql => env::var("SALESBOARD_DB_NAME")
                .map_err(|_| ConnectionError::MissingEnvVar("SALESBOARD_DB_NAME".to_string()))?,
            Driver::DuckDb | Driver::Sqlite => env::var("SALESBOARD_DB_NAME").unwrap_or_default(),
        };

        let port = match env::var("SALESBOARD_DB_PORT") {
            Ok(p) => Some(p.parse().map_err(|_| {
                ConnectionError::InvalidConfig(format!("SALESBOARD_DB_PORT is not a port: {}", p))
            })?),
            Err(_) => None,
        };

        let username = env::var("SALESBOARD_DB_USER").ok();
        let password = env::var("SALESBOARD_DB_PASSWORD").ok();

        // Use trusted connection if no username/password provided (SQL Server only)
        let trusted_connection = driver == Driver::MsSql && username.is_none();

        let encrypt = env::var("SALESBOARD_DB_ENCRYPT")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(driver == Driver::MsSql);

        Ok(Self {
            driver,
            host,
            database,
            port,
            trusted_connection,
            username,
            password,
            encrypt,
        })
    }

    /// Build the connection string for the driver.
    pub fn to_connection_string(&self) -> String {
        match self.driver {
            Driver::MsSql => self.build_mssql_connection_string(),
            Driver::DuckDb => self.build_duckdb_connection_string(),
            Driver::Sqlite => self.host.clone(),
        }
    }

    fn build_mssql_connection_string(&self) -> String {
        // `server\INSTANCE` becomes `server/INSTANCE` in URL form
        let (server, instance) = match self.host.split_once('\\') {
            Some((server, instance)) => (server, Some(instance)),
            None => (self.host.as_str(), None),
        };

        let mut base = match self.port {
            Some(port) => format!("sqlserver://{}:{}", server, port),
            None => format!("sqlserver://{}", server),
        };
        if let Some(instance) = instance {
            base.push('/');
            base.push_str(instance);
        }

        // Query parameters
        let mut params = vec![format!("database={}", self.database)];

        if self.trusted_connection {
            params.push("trusted_connection=true".to_string());
        } else if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            params.push(format!("user id={}", user));
            params.push(format!("password={}", pass));
        }

        if !self.encrypt {
            params.push("encrypt=disable".to_string());
        }

        format!("{}?{}", base, params.join("&"))
    }

    fn build_duckdb_connection_string(&self) -> String {
        // For DuckDB, the connection string is just the file path
        // or ":memory:" for in-memory database
        if self.host.is_empty() || self.host == ":memory:" {
            ":memory:".to_string()
        } else {
            self.host.clone()
        }
    }

    /// Get the driver name for the worker.
    pub fn driver_name(&self) -> &'static str {
        self.driver.as_str()
    }
}
