//! Storage collaborator contracts.
//!
//! Provides the [`StorageExecutor`] trait that abstracts the relational
//! engine behind the mapping core, together with the data carriers passed
//! across that seam: [`ColumnValues`] payloads, result [`Row`]s, and the
//! [`QuerySpec`] assembled by the select builder.
//!
//! The engine itself (connections, transactions, SQL dialect) lives entirely
//! on the other side of this trait.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

/// Failure reported by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        StorageError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

/// Ordered column-to-value payload for insert/update statements.
///
/// A `None` entry writes an explicit SQL NULL. Values are expected in their
/// storage form (post handler conversion). Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    entries: Vec<(String, Option<Value>)>,
}

impl ColumnValues {
    #[must_use]
    pub fn new() -> Self {
        ColumnValues::default()
    }

    /// Add a column value, replacing any earlier entry for the same column.
    pub fn put(&mut self, column: impl Into<String>, value: Value) {
        self.put_opt(column, Some(value));
    }

    /// Add an explicit NULL for a column.
    pub fn put_null(&mut self, column: impl Into<String>) {
        self.put_opt(column, None);
    }

    fn put_opt(&mut self, column: impl Into<String>, value: Option<Value>) {
        let column = column.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Option<Value>> {
        self.entries.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One result row, keyed by column name.
///
/// Columns that were NULL in storage are simply absent; the persistence path
/// leaves the corresponding field at its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Row::default()
    }

    pub fn put(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Builder-style variant of [`Row::put`] for test fixtures.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.put(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Query shape assembled by the select builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub distinct: bool,
    pub columns: Vec<String>,
    pub where_clause: String,
    pub where_args: Vec<String>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Trait abstracting the relational storage engine.
///
/// Implementations translate these calls to their engine (an embedded
/// SQLite-style database, an in-memory table store, a test fake). All
/// failures surface as [`StorageError`]; the mapping core converts them to
/// `DockError::Storage` and never interprets engine-specific detail.
pub trait StorageExecutor {
    /// Insert one row, returning the engine-assigned row id.
    fn insert(&self, table: &str, values: &ColumnValues) -> Result<i64, StorageError>;

    /// Update rows matching the selection, returning the affected-row count.
    fn update(
        &self,
        table: &str,
        values: &ColumnValues,
        where_clause: &str,
        where_args: &[String],
    ) -> Result<u64, StorageError>;

    /// Delete rows matching the selection, returning the affected-row count.
    fn delete(
        &self,
        table: &str,
        where_clause: &str,
        where_args: &[String],
    ) -> Result<u64, StorageError>;

    /// Run a query and return the matching rows.
    fn query(&self, table: &str, spec: &QuerySpec) -> Result<Vec<Row>, StorageError>;

    /// Execute a raw statement (DDL); no result rows.
    fn execute_raw(&self, sql: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_values_replace_on_same_column() {
        let mut cv = ColumnValues::new();
        cv.put("name", Value::Text("a".into()));
        cv.put("name", Value::Text("b".into()));
        assert_eq!(cv.len(), 1);
        assert_eq!(cv.get("name"), Some(&Some(Value::Text("b".into()))));
    }

    #[test]
    fn test_column_values_null_entry() {
        let mut cv = ColumnValues::new();
        cv.put_null("deleted_at");
        assert_eq!(cv.get("deleted_at"), Some(&None));
        assert!(!cv.is_empty());
    }

    #[test]
    fn test_column_values_preserves_order() {
        let mut cv = ColumnValues::new();
        cv.put("b", Value::Int(1));
        cv.put("a", Value::Int(2));
        let names: Vec<&str> = cv.iter().map(|(c, _)| c).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_row_lookup() {
        let row = Row::new().with("id", Value::Int(3));
        assert_eq!(row.get("id"), Some(&Value::Int(3)));
        assert!(row.get("missing").is_none());
        assert!(row.contains("id"));
    }
}
