// src/db/error.rs

/// Why a query could not produce a result set. Handlers never see these
/// directly; they only learn that the result is unavailable.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Could not open a session to the database
    #[error("connection failed: {0}")]
    Connection(String),

    /// Statement was rejected or the fetch broke off
    #[error("execution failed: {0}")]
    Execution(String),

    /// A column value has no JSON representation
    #[error("cannot normalize column `{column}` of type {type_name}: {reason}")]
    Normalization {
        column: String,
        type_name: String,
        reason: String,
    },
}

impl QueryError {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Connection(_) => "connection",
            QueryError::Execution(_) => "execution",
            QueryError::Normalization { .. } => "normalization",
        }
    }
}
