//! Value type system shared by the persistence and JSON paths.
//!
//! A [`Value`] is the semantic runtime form of one mapped field. Handlers
//! convert between this form, the column storage form, and the JSON form.
//! A "null" field is modeled as `Option<Value>::None` at the access seam,
//! not as a `Value` variant.

pub mod convert;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Semantic runtime value of a mapped field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Decimal(Decimal),
    List(Vec<Value>),
}

/// Type token identifying which handler a value resolves to.
///
/// Registry lookups are keyed by this token; registration order decides
/// ties (see `TypeHandlerRegistry::register`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Blob,
    Uuid,
    DateTime,
    Decimal,
    List,
}

impl ValueKind {
    /// Every kind token, in declaration order. Used by the registry to probe
    /// `can_handle` claims at registration time.
    pub const ALL: [ValueKind; 9] = [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::Text,
        ValueKind::Blob,
        ValueKind::Uuid,
        ValueKind::DateTime,
        ValueKind::Decimal,
        ValueKind::List,
    ];
}

/// Column type affinity a handler assigns to its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Blob,
}

impl ColumnType {
    /// SQL spelling used in DDL.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Blob => "BLOB",
        }
    }
}

impl Value {
    /// The kind token this value resolves handlers through.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Blob(_) => ValueKind::Blob,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::List(_) => ValueKind::List,
        }
    }

    /// Storage-string form used for bound where-arguments.
    ///
    /// Booleans bind as `1`/`0` and datetimes as unix milliseconds, matching
    /// their column storage form. Blobs and lists have no single-argument
    /// string form; using one as a bound argument is a conversion failure,
    /// surfaced when the selection is rendered.
    pub fn to_arg_string(&self) -> Result<String, crate::error::DockError> {
        match self {
            Value::Bool(b) => Ok(if *b { "1".to_string() } else { "0".to_string() }),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(x) => Ok(x.to_string()),
            Value::Text(s) => Ok(s.clone()),
            Value::Uuid(u) => Ok(u.to_string()),
            Value::DateTime(dt) => Ok(dt.timestamp_millis().to_string()),
            Value::Decimal(d) => Ok(d.to_string()),
            Value::Blob(_) => Err(crate::error::DockError::conversion(
                "<where-arg>",
                "blob values cannot be bound as a selection argument",
            )),
            Value::List(_) => Err(crate::error::DockError::conversion(
                "<where-arg>",
                "list values must be expanded through an IN predicate",
            )),
        }
    }
}
