//! Element-wise handler for list fields.

use serde_json::Value as JsonValue;

use crate::error::DockError;
use crate::executor::Row;
use crate::handler::primitives::{expected, expected_json};
use crate::handler::{registry, stored, TypeHandler};
use crate::value::{ColumnType, Value, ValueKind};

/// Lists: element-wise conversion through the element kind's handler.
///
/// The JSON form is a plain array; the storage form is that array encoded
/// into a TEXT column. Element handlers resolve through the process-wide
/// [`registry`], so custom element kinds must be registered there.
pub struct ListHandler;

impl ListHandler {
    fn elem_kind(elem: Option<ValueKind>) -> Result<ValueKind, DockError> {
        elem.ok_or_else(|| {
            DockError::conversion("<value>", "list field is missing its element kind")
        })
    }
}

impl TypeHandler for ListHandler {
    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::List
    }

    fn column_type(&self) -> ColumnType {
        ColumnType::Text
    }

    fn parse_from_string(&self, kind: ValueKind, raw: &str) -> Result<Value, DockError> {
        // The string form is the storage form: a JSON array.
        let json: JsonValue = serde_json::from_str(raw)
            .map_err(|e| DockError::conversion("<value>", e.to_string()))?;
        // Without an element kind the parse cannot pick element handlers.
        self.from_json(kind, None, &json)
    }

    fn to_storage(
        &self,
        kind: ValueKind,
        elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError> {
        let json = self.to_json(kind, elem, value)?;
        let encoded = serde_json::to_string(&json)
            .map_err(|e| DockError::conversion("<value>", e.to_string()))?;
        Ok(Value::Text(encoded))
    }

    fn read_from_row(
        &self,
        kind: ValueKind,
        elem: Option<ValueKind>,
        row: &Row,
        column: &str,
    ) -> Result<Value, DockError> {
        match stored(row, column)? {
            Value::Text(s) => {
                let json: JsonValue = serde_json::from_str(s)
                    .map_err(|e| DockError::conversion(column, e.to_string()))?;
                self.from_json(kind, elem, &json)
            }
            Value::List(items) => Ok(Value::List(items.clone())),
            other => Err(expected("text-stored list", other)),
        }
    }

    fn to_json(
        &self,
        _kind: ValueKind,
        elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError> {
        let elem_kind = Self::elem_kind(elem)?;
        let handler = registry().handler_or_err(elem_kind)?;
        match value {
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(handler.to_json(elem_kind, None, item)?);
                }
                Ok(JsonValue::Array(out))
            }
            other => Err(expected("list", other)),
        }
    }

    fn from_json(
        &self,
        _kind: ValueKind,
        elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError> {
        let elem_kind = Self::elem_kind(elem)?;
        let handler = registry().handler_or_err(elem_kind)?;
        match json {
            JsonValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(handler.from_json(elem_kind, None, item)?);
                }
                Ok(Value::List(out))
            }
            other => Err(expected_json("array", other)),
        }
    }
}
