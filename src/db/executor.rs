// src/db/executor.rs

use std::time::Duration;

use sqlx::mysql::{MySqlConnection, MySqlRow};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{normalize::normalize_row, ConnectionProvider, Param, QueryError, Statement};
use crate::{config::DbConfig, models::{ResultSet, Row}};

/// Runs one statement on its own connection and returns normalized rows.
#[derive(Clone)]
pub struct QueryExecutor {
    provider: ConnectionProvider,
    query_timeout: Duration,
}

impl QueryExecutor {
    pub fn new(cfg: &DbConfig) -> Self {
        Self {
            provider: ConnectionProvider::new(cfg),
            query_timeout: cfg.query_timeout,
        }
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Every failure is logged here with the statement name and error kind;
    /// callers only branch on `Ok`/`Err`.
    pub async fn execute(&self, stmt: Statement, params: &[Param]) -> ResultSet {
        let result = self.run(stmt, params).await;
        match &result {
            Ok(rows) => debug!(query = stmt.name, rows = rows.len(), "query ok"),
            Err(e) => warn!(query = stmt.name, kind = e.kind(), error = %e, "query unavailable"),
        }
        result
    }

    async fn run(&self, stmt: Statement, params: &[Param]) -> ResultSet {
        let mut conn = self.provider.acquire().await?;
        let outcome = self.fetch(&mut conn, stmt, params).await;
        // released on every path, including normalization errors
        self.provider.release(conn).await;
        outcome
    }

    async fn fetch(
        &self,
        conn: &mut MySqlConnection,
        stmt: Statement,
        params: &[Param],
    ) -> Result<Vec<Row>, QueryError> {
        let mut query = sqlx::query(stmt.sql);
        for p in params {
            query = match p {
                Param::Int(v) => query.bind(*v),
            };
        }

        let rows: Vec<MySqlRow> = match timeout(self.query_timeout, query.fetch_all(&mut *conn)).await {
            Ok(Ok(rows)) => rows,
            Ok(Err(e)) => return Err(QueryError::Execution(e.to_string())),
            Err(_) => {
                return Err(QueryError::Execution(format!(
                    "timed out after {:?}",
                    self.query_timeout
                )))
            }
        };

        rows.iter().map(normalize_row).collect()
    }
}
