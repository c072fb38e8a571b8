//! Worker communication module.
//!
//! SQL Server and DuckDB are reached through a separate database worker
//! process; this crate stays free of those native drivers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  salesboard (Rust + Tokio)                      │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                    WorkerClient (Async)                   │  │
//! │  │  - Spawns the worker as a child process                   │  │
//! │  │  - NDJSON protocol over stdin/stdout                      │  │
//! │  │  - Request IDs for request/response correlation           │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │               stdin (NDJSON) │ stdout (NDJSON)                  │
//! └──────────────────────────────┼──────────────────────────────────┘
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │           Database worker (long-running child process)          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use salesboard::config::WorkerSettings;
//! use salesboard::worker::{protocol::QueryTarget, WorkerClient};
//!
//! let client = WorkerClient::spawn(&WorkerSettings::default()).await?;
//! let target = QueryTarget {
//!     driver: "mssql".to_string(),
//!     connection_string: "sqlserver://localhost/SQLEXPRESS?database=AdventureWorks2022".to_string(),
//! };
//! let result = client.execute_query(&target, "SELECT 1").await?;
//! ```

mod client;
mod error;
pub mod protocol;

pub use client::WorkerClient;
pub use error::{RemoteKind, WorkerError, WorkerResult};
