//! # Dockhand
//!
//! Lightweight entity-to-row and entity-to-JSON mapping layer.
//!
//! Plain structs are mapped through per-field spec tables (registered once
//! per model type) instead of hand-written conversion code:
//!
//! - the [`stmt`] builder family composes WHERE predicates into
//!   parameterized selections and executes them against a storage
//!   collaborator;
//! - the [`json`] serializer converts models to/from nested JSON objects;
//! - both paths share the [`handler`] registry for actual value conversion.
//!
//! The relational engine, the JSON parser, and DDL generation stay behind
//! the narrow collaborator traits in [`executor`] and [`persist::schema`].

pub mod config;
pub mod error;
pub mod executor;
pub mod handler;
pub mod json;
pub mod model;
pub mod persist;
pub mod stmt;
pub mod value;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(test)]
mod tests_cfg;

#[doc(inline)]
pub use config::DatabaseConfig;
#[doc(inline)]
pub use error::DockError;
#[doc(inline)]
pub use executor::{ColumnValues, QuerySpec, Row, StorageError, StorageExecutor};
#[doc(inline)]
pub use handler::{registry, TypeHandler, TypeHandlerRegistry};
#[doc(inline)]
pub use json::{FieldIssue, JsonSerializer, KEY_SEPARATOR};
#[doc(inline)]
pub use model::{Entity, FieldAttr, FieldSpec, JsonMapped, TableMapped, ID_COLUMN};
#[doc(inline)]
pub use persist::schema::{ColumnDdl, DdlProvider, SchemaHelper};
#[doc(inline)]
pub use persist::EntityManager;
#[doc(inline)]
pub use stmt::{
    DeleteBuilder, InsertBuilder, Is, SelectBuilder, Selection, StatementBuilder, UpdateBuilder,
};
#[doc(inline)]
pub use value::{ColumnType, Value, ValueKind};
