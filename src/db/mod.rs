// src/db/mod.rs

use std::{fmt::Display, future::Future, time::Duration};

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlConnection},
    ConnectOptions, Connection,
};
use tokio::time::timeout;
use tracing::debug;

use crate::config::DbConfig;

pub mod error;
pub mod executor;
pub mod normalize;

pub use error::QueryError;
pub use executor::QueryExecutor;

/// A fixed SQL text plus the identifier used when logging failures.
#[derive(Debug, Clone, Copy)]
pub struct Statement {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Positional bind value for `?` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
}

/// Opens one fresh MySQL session per call. No pooling.
#[derive(Clone)]
pub struct ConnectionProvider {
    options: MySqlConnectOptions,
    connect_timeout: Duration,
}

impl ConnectionProvider {
    pub fn new(cfg: &DbConfig) -> Self {
        Self {
            options: cfg.connect_options(),
            connect_timeout: cfg.connect_timeout,
        }
    }

    pub async fn acquire(&self) -> Result<MySqlConnection, QueryError> {
        match timeout(self.connect_timeout, self.options.connect()).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(QueryError::Connection(e.to_string())),
            Err(_) => Err(QueryError::Connection(format!(
                "timed out after {:?}",
                self.connect_timeout
            ))),
        }
    }

    /// Opens and immediately closes a session.
    pub async fn check(&self) -> Result<(), QueryError> {
        let conn = self.acquire().await?;
        self.release(conn).await;
        Ok(())
    }

    /// Closes the session within the connect timeout. A failed or stalled
    /// close does not change the caller's outcome.
    pub async fn release(&self, conn: MySqlConnection) {
        close_within(self.connect_timeout, conn.close()).await;
    }
}

/// Returns whether the close finished cleanly. On timeout the close future is
/// dropped, which drops the socket with it.
async fn close_within<F, E>(limit: Duration, close: F) -> bool
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match timeout(limit, close).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            debug!(error = %e, "closing database connection failed");
            false
        }
        Err(_) => {
            debug!(after = ?limit, "closing database connection timed out, dropping it");
            false
        }
    }
}
