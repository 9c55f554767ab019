//! Conversions between Rust field types and [`Value`].
//!
//! `From` impls build values inside spec-table getters; `TryFrom` impls
//! extract typed values inside setters, failing with a conversion error when
//! the variant does not match the declared field type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::DockError;
use crate::value::Value;

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl Value {
    /// Build a [`Value::List`] from any iterable of convertible items.
    pub fn list<T, I>(items: I) -> Self
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Extract a typed vector from a [`Value::List`].
    ///
    /// Fails when the value is not a list or when any element does not match
    /// the requested type.
    pub fn try_into_vec<T>(self) -> Result<Vec<T>, DockError>
    where
        T: TryFrom<Value, Error = DockError>,
    {
        match self {
            Value::List(items) => items.into_iter().map(T::try_from).collect(),
            other => Err(mismatch("list", &other)),
        }
    }
}

fn mismatch(expected: &str, actual: &Value) -> DockError {
    DockError::conversion(
        "<value>",
        format!("expected {}, got {:?}", expected, actual.kind()),
    )
}

impl TryFrom<Value> for i64 {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(v) => i32::try_from(v)
                .map_err(|_| DockError::conversion("<value>", format!("{} out of i32 range", v))),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl TryFrom<Value> for i16 {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(v) => i16::try_from(v)
                .map_err(|_| DockError::conversion("<value>", format!("{} out of i16 range", v))),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(v) => Ok(v),
            // Integer column values widen losslessly enough for mapped floats.
            Value::Int(v) => Ok(v as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        f64::try_from(value).map(|v| v as f32)
    }
}

impl TryFrom<Value> for String {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Blob(v) => Ok(v),
            other => Err(mismatch("blob", &other)),
        }
    }
}

impl TryFrom<Value> for Uuid {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Uuid(v) => Ok(v),
            other => Err(mismatch("uuid", &other)),
        }
    }
}

impl TryFrom<Value> for DateTime<Utc> {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::DateTime(v) => Ok(v),
            other => Err(mismatch("datetime", &other)),
        }
    }
}

impl TryFrom<Value> for Decimal {
    type Error = DockError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Decimal(v) => Ok(v),
            other => Err(mismatch("decimal", &other)),
        }
    }
}
