//! Handlers for the richer kinds: Uuid, DateTime, Decimal.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::DockError;
use crate::executor::Row;
use crate::handler::primitives::{expected, expected_json};
use crate::handler::{stored, TypeHandler};
use crate::value::{ColumnType, Value, ValueKind};

/// UUIDs: stored as hyphenated TEXT, JSON string.
pub struct UuidHandler;

impl TypeHandler for UuidHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Uuid
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Text
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        Uuid::parse_str(raw)
            .map(Value::Uuid)
            .map_err(|e| DockError::conversion("<value>", e.to_string()))
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::Uuid(u) => Ok(Value::Text(u.to_string())),
            other => Err(expected("uuid", other)),
        }
    }

    fn read_from_row(
        &self,
        kind: ValueKind,
        _elem: Option<ValueKind>,
        row: &Row,
        column: &str,
    ) -> Result<Value, DockError> {
        match stored(row, column)? {
            Value::Text(s) => self.parse_from_string(kind, s),
            Value::Uuid(u) => Ok(Value::Uuid(*u)),
            other => Err(expected("text-stored uuid", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::Uuid(u) => Ok(JsonValue::String(u.to_string())),
            other => Err(expected("uuid", other)),
        }
    }

    fn from_json(
        &self,
        kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        match json {
            JsonValue::String(s) => self.parse_from_string(kind, s),
            other => Err(expected_json("uuid string", other)),
        }
    }
}

/// UTC datetimes: stored as INTEGER unix milliseconds, JSON number.
///
/// String parsing accepts either a millisecond count or an RFC 3339
/// timestamp.
pub struct DateTimeHandler;

impl DateTimeHandler {
    fn from_millis(ms: i64) -> Result<Value, DockError> {
        DateTime::<Utc>::from_timestamp_millis(ms)
            .map(Value::DateTime)
            .ok_or_else(|| {
                DockError::conversion("<value>", format!("{} out of datetime range", ms))
            })
    }
}

impl TypeHandler for DateTimeHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::DateTime
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Integer
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        if let Ok(ms) = raw.parse::<i64>() {
            return Self::from_millis(ms);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
            .map_err(|e| DockError::conversion("<value>", e.to_string()))
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::DateTime(dt) => Ok(Value::Int(dt.timestamp_millis())),
            other => Err(expected("datetime", other)),
        }
    }

    fn read_from_row(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        row: &Row,
        column: &str,
    ) -> Result<Value, DockError> {
        match stored(row, column)? {
            Value::Int(ms) => Self::from_millis(*ms),
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            other => Err(expected("integer-stored datetime", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::DateTime(dt) => Ok(JsonValue::from(dt.timestamp_millis())),
            other => Err(expected("datetime", other)),
        }
    }

    fn from_json(
        &self,
        kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        match json {
            JsonValue::Number(n) => {
                let ms = n
                    .as_i64()
                    .ok_or_else(|| expected_json("millisecond timestamp", json))?;
                Self::from_millis(ms)
            }
            JsonValue::String(s) => self.parse_from_string(kind, s),
            other => Err(expected_json("datetime", other)),
        }
    }
}

/// Precision decimals: stored and serialized as TEXT so no digits are lost;
/// JSON reading also accepts plain numbers.
pub struct DecimalHandler;

impl TypeHandler for DecimalHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Decimal
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Text
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        Decimal::from_str(raw)
            .map(Value::Decimal)
            .map_err(|e| DockError::conversion("<value>", e.to_string()))
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::Decimal(d) => Ok(Value::Text(d.to_string())),
            other => Err(expected("decimal", other)),
        }
    }

    fn read_from_row(
        &self,
        kind: ValueKind,
        _elem: Option<ValueKind>,
        row: &Row,
        column: &str,
    ) -> Result<Value, DockError> {
        match stored(row, column)? {
            Value::Text(s) => self.parse_from_string(kind, s),
            Value::Decimal(d) => Ok(Value::Decimal(*d)),
            other => Err(expected("text-stored decimal", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::Decimal(d) => Ok(JsonValue::String(d.to_string())),
            other => Err(expected("decimal", other)),
        }
    }

    fn from_json(
        &self,
        kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        match json {
            JsonValue::String(s) => self.parse_from_string(kind, s),
            JsonValue::Number(n) => self.parse_from_string(kind, &n.to_string()),
            other => Err(expected_json("decimal", other)),
        }
    }
}
