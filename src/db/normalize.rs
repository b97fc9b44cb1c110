// src/db/normalize.rs
//
// Column values leave the database as driver types and must reach the client
// as plain JSON scalars. Decoding (driver → `Scalar`) and normalization
// (`Scalar` → JSON) are kept apart so the latter can be tested without a server.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde_json::{Number, Value};
use sqlx::{
    mysql::{MySql, MySqlRow},
    Column, Decode, Row, Type, TypeInfo, ValueRef,
};

use super::error::QueryError;
use crate::models::Row as JsonRow;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Json(Value),
}

impl Scalar {
    /// Converts to the transport representation. Decimals become the nearest
    /// double, date/time values become fixed-format text.
    pub fn into_json(self) -> Result<Value, String> {
        Ok(match self {
            Scalar::Null => Value::Null,
            Scalar::Int(i) => Value::from(i),
            Scalar::UInt(u) => Value::from(u),
            Scalar::Float(f) => float(f),
            Scalar::Decimal(d) => {
                let f = d
                    .to_f64()
                    .ok_or_else(|| format!("decimal {d} out of f64 range"))?;
                float(f)
            }
            Scalar::Text(s) => Value::String(s),
            Scalar::Date(d) => {
                Value::String(d.and_time(NaiveTime::MIN).format(DATETIME_FORMAT).to_string())
            }
            Scalar::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
            Scalar::Time(t) => Value::String(t.format(TIME_FORMAT).to_string()),
            Scalar::Json(v) => v,
        })
    }
}

// JSON has no NaN/Infinity
fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Decodes every column of `row` and normalizes it, keeping column order.
pub fn normalize_row(row: &MySqlRow) -> Result<JsonRow, QueryError> {
    let mut out = JsonRow::new();
    for (idx, col) in row.columns().iter().enumerate() {
        let scalar = decode_column(row, idx)?;
        let value = scalar.into_json().map_err(|reason| QueryError::Normalization {
            column: col.name().to_string(),
            type_name: col.type_info().name().to_string(),
            reason,
        })?;
        out.insert(col.name().to_string(), value);
    }
    Ok(out)
}

fn decode_column(row: &MySqlRow, idx: usize) -> Result<Scalar, QueryError> {
    let col = &row.columns()[idx];
    let type_name = col.type_info().name();

    let raw = row.try_get_raw(idx).map_err(|e| normalization(row, idx, e))?;
    if raw.is_null() {
        return Ok(Scalar::Null);
    }

    let unsigned = type_name.ends_with("UNSIGNED");
    let base = type_name.split_whitespace().next().unwrap_or(type_name);

    let scalar = match base {
        "NULL" => Scalar::Null,
        // TINYINT(1) flags stay 0/1 on the wire
        "BOOLEAN" => Scalar::Int(get::<i64>(row, idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" if unsigned => {
            Scalar::UInt(get::<u64>(row, idx)?)
        }
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Scalar::Int(get::<i64>(row, idx)?)
        }
        "YEAR" => Scalar::UInt(u64::from(get::<u16>(row, idx)?)),
        "FLOAT" => Scalar::Float(f64::from(get::<f32>(row, idx)?)),
        "DOUBLE" => Scalar::Float(get::<f64>(row, idx)?),
        "DECIMAL" => Scalar::Decimal(get::<Decimal>(row, idx)?),
        "DATE" => Scalar::Date(get::<NaiveDate>(row, idx)?),
        "DATETIME" | "TIMESTAMP" => Scalar::DateTime(get::<NaiveDateTime>(row, idx)?),
        "TIME" => Scalar::Time(get::<NaiveTime>(row, idx)?),
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            Scalar::Text(get::<String>(row, idx)?)
        }
        "JSON" => Scalar::Json(get::<sqlx::types::Json<Value>>(row, idx)?.0),
        // computed strings can arrive with a binary collation
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            let bytes = get::<Vec<u8>>(row, idx)?;
            let text = String::from_utf8(bytes).map_err(|e| normalization(row, idx, e))?;
            Scalar::Text(text)
        }
        _ => {
            return Err(normalization(row, idx, "unsupported column type"));
        }
    };
    Ok(scalar)
}

fn get<'r, T>(row: &'r MySqlRow, idx: usize) -> Result<T, QueryError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get::<T, _>(idx).map_err(|e| normalization(row, idx, e))
}

fn normalization(row: &MySqlRow, idx: usize, reason: impl std::fmt::Display) -> QueryError {
    let col = &row.columns()[idx];
    QueryError::Normalization {
        column: col.name().to_string(),
        type_name: col.type_info().name().to_string(),
        reason: reason.to_string(),
    }
}
