//! Handlers for the primitive kinds: Bool, Int, Float, Text, Blob.

use serde_json::Value as JsonValue;

use crate::error::DockError;
use crate::executor::Row;
use crate::handler::{stored, TypeHandler};
use crate::value::{ColumnType, Value, ValueKind};

/// Booleans: INTEGER affinity, stored and bound as `1`/`0`, JSON boolean.
pub struct BoolHandler;

impl TypeHandler for BoolHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Bool
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Integer
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        match raw {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(DockError::conversion(
                "<value>",
                format!("'{}' is not a boolean", other),
            )),
        }
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
            other => Err(expected("boolean", other)),
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
            Value::Int(i) => Ok(Value::Bool(*i != 0)),
            Value::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(expected("integer-stored boolean", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            other => Err(expected("boolean", other)),
        }
    }

    fn from_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        match json {
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
            JsonValue::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
            other => Err(expected_json("boolean", other)),
        }
    }
}

/// Signed integers up to 64 bits: INTEGER affinity, JSON number.
pub struct IntHandler;

impl TypeHandler for IntHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Int
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Integer
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        raw.parse::<i64>()
            .map(Value::Int)
            .map_err(|e| DockError::conversion("<value>", e.to_string()))
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            other => Err(expected("integer", other)),
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
            Value::Int(i) => Ok(Value::Int(*i)),
            other => Err(expected("integer column", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::Int(i) => Ok(JsonValue::from(*i)),
            other => Err(expected("integer", other)),
        }
    }

    fn from_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        match json {
            JsonValue::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| expected_json("integer", json)),
            JsonValue::String(s) => self.parse_from_string(ValueKind::Int, s),
            other => Err(expected_json("integer", other)),
        }
    }
}

/// Floats: REAL affinity. Non-finite values serialize to the strings
/// `"NaN"`, `"Infinity"`, `"-Infinity"` (JSON numbers cannot carry them)
/// and parse back from the same spellings.
pub struct FloatHandler;

impl FloatHandler {
    fn special(raw: &str) -> Option<f64> {
        match raw {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        }
    }
}

impl TypeHandler for FloatHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Float
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Real
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        if let Some(v) = Self::special(raw) {
            return Ok(Value::Float(v));
        }
        raw.parse::<f64>()
            .map(Value::Float)
            .map_err(|e| DockError::conversion("<value>", e.to_string()))
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::Float(x) => Ok(Value::Float(*x)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            other => Err(expected("float", other)),
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
            Value::Float(x) => Ok(Value::Float(*x)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            other => Err(expected("real column", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::Float(x) => {
                if x.is_finite() {
                    Ok(serde_json::Number::from_f64(*x)
                        .map(JsonValue::Number)
                        .unwrap_or(JsonValue::Null))
                } else if x.is_nan() {
                    Ok(JsonValue::String("NaN".to_string()))
                } else if x.is_sign_positive() {
                    Ok(JsonValue::String("Infinity".to_string()))
                } else {
                    Ok(JsonValue::String("-Infinity".to_string()))
                }
            }
            other => Err(expected("float", other)),
        }
    }

    fn from_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        match json {
            JsonValue::Number(n) => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| expected_json("float", json)),
            JsonValue::String(s) => self.parse_from_string(ValueKind::Float, s),
            other => Err(expected_json("float", other)),
        }
    }
}

/// Strings: TEXT affinity, JSON string.
pub struct TextHandler;

impl TypeHandler for TextHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Text
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Text
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        Ok(Value::Text(raw.to_string()))
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::Text(s) => Ok(Value::Text(s.clone())),
            other => Err(expected("text", other)),
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
            Value::Text(s) => Ok(Value::Text(s.clone())),
            other => Err(expected("text column", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::Text(s) => Ok(JsonValue::String(s.clone())),
            other => Err(expected("text", other)),
        }
    }

    fn from_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        match json {
            JsonValue::String(s) => Ok(Value::Text(s.clone())),
            other => Err(expected_json("string", other)),
        }
    }
}

/// Byte arrays: BLOB affinity; JSON form is an array of byte numbers.
pub struct BlobHandler;

impl TypeHandler for BlobHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Blob
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Blob
    }

    fn parse_from_string(&self, _kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        Ok(Value::Blob(raw.as_bytes().to_vec()))
    }

    fn to_storage(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        match value {
            Value::Blob(b) => Ok(Value::Blob(b.clone())),
            other => Err(expected("blob", other)),
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
            Value::Blob(b) => Ok(Value::Blob(b.clone())),
            other => Err(expected("blob column", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        match value {
            Value::Blob(b) => Ok(JsonValue::Array(
                b.iter().map(|byte| JsonValue::from(*byte)).collect(),
            )),
            other => Err(expected("blob", other)),
        }
    }

    fn from_json(
        &self,
        _kind: ValueKind,
        _elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        let items = json
            .as_array()
            .ok_or_else(|| expected_json("byte array", json))?;
        let mut bytes = Vec::with_capacity(items.len());
        for item in items {
            let byte = item
                .as_u64()
                .and_then(|v| u8::try_from(v).ok())
                .ok_or_else(|| expected_json("byte (0-255)", item))?;
            bytes.push(byte);
        }
        Ok(Value::Blob(bytes))
    }
}

pub(super) fn expected(what: &str, actual: &Value) -> DockError {
    DockError::conversion("<value>", format!("expected {}, got {:?}", what, actual.kind()))
}

pub(super) fn expected_json(what: &str, actual: &JsonValue) -> DockError {
    DockError::conversion("<value>", format!("expected {}, got {}", what, actual))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_storage_form_is_integer() {
        let stored = BoolHandler
            .to_storage(ValueKind::Bool, None, &Value::Bool(true))
            .unwrap();
        assert_eq!(stored, Value::Int(1));
        let row = Row::new().with("flag", Value::Int(0));
        let back = BoolHandler
            .read_from_row(ValueKind::Bool, None, &row, "flag")
            .unwrap();
        assert_eq!(back, Value::Bool(false));
    }

    #[test]
    fn test_bool_parse_spellings() {
        assert_eq!(
            BoolHandler.parse_from_string(ValueKind::Bool, "1").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            BoolHandler
                .parse_from_string(ValueKind::Bool, "false")
                .unwrap(),
            Value::Bool(false)
        );
        assert!(BoolHandler.parse_from_string(ValueKind::Bool, "yes").is_err());
    }

    #[test]
    fn test_int_json_accepts_number_and_string() {
        let from_num = IntHandler
            .from_json(ValueKind::Int, None, &serde_json::json!(41))
            .unwrap();
        let from_str = IntHandler
            .from_json(ValueKind::Int, None, &serde_json::json!("41"))
            .unwrap();
        assert_eq!(from_num, Value::Int(41));
        assert_eq!(from_str, Value::Int(41));
    }

    #[test]
    fn test_int_json_rejects_fractional() {
        assert!(IntHandler
            .from_json(ValueKind::Int, None, &serde_json::json!(1.5))
            .is_err());
    }

    #[test]
    fn test_float_special_values_roundtrip_as_strings() {
        let json = FloatHandler
            .to_json(ValueKind::Float, None, &Value::Float(f64::INFINITY))
            .unwrap();
        assert_eq!(json, serde_json::json!("Infinity"));
        let back = FloatHandler.from_json(ValueKind::Float, None, &json).unwrap();
        assert_eq!(back, Value::Float(f64::INFINITY));

        let nan = FloatHandler
            .from_json(ValueKind::Float, None, &serde_json::json!("NaN"))
            .unwrap();
        match nan {
            Value::Float(x) => assert!(x.is_nan()),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_blob_json_is_byte_array() {
        let json = BlobHandler
            .to_json(ValueKind::Blob, None, &Value::Blob(vec![0, 127, 255]))
            .unwrap();
        assert_eq!(json, serde_json::json!([0, 127, 255]));
        let back = BlobHandler.from_json(ValueKind::Blob, None, &json).unwrap();
        assert_eq!(back, Value::Blob(vec![0, 127, 255]));
    }

    #[test]
    fn test_blob_json_rejects_out_of_range() {
        assert!(BlobHandler
            .from_json(ValueKind::Blob, None, &serde_json::json!([0, 300]))
            .is_err());
    }

    #[test]
    fn test_text_roundtrip() {
        let json = TextHandler
            .to_json(ValueKind::Text, None, &Value::Text("héllo".into()))
            .unwrap();
        let back = TextHandler.from_json(ValueKind::Text, None, &json).unwrap();
        assert_eq!(back, Value::Text("héllo".into()));
    }
}
