// src/models/mod.rs

use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::QueryError;

/// One fetched record: column name → normalized value, in column order.
pub type Row = Map<String, Value>;

/// `Err` is the "unavailable" case, distinct from `Ok(vec![])`.
pub type ResultSet = Result<Vec<Row>, QueryError>;

// ───────────────────────────────────────
// Response shaping
// ───────────────────────────────────────

/// List shape: failure or no rows both become `[]`.
pub fn list_body(rs: ResultSet) -> Vec<Row> {
    rs.unwrap_or_default()
}

/// Scalar shape: the first row, or `{}` on failure / no rows.
pub fn object_body(rs: ResultSet) -> Row {
    rs.ok()
        .and_then(|rows| rows.into_iter().next())
        .unwrap_or_default()
}

// ───────────────────────────────────────
// DTOs
// ───────────────────────────────────────
#[derive(Debug, Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EndpointCatalog {
    pub financial: Vec<&'static str>,
    pub operational: Vec<&'static str>,
    pub customers: Vec<&'static str>,
    pub general: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct IndexResp {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointCatalog,
}
