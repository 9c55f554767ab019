//! Mapped-model traits and per-field spec tables.
//!
//! Instead of runtime reflection, every mapped struct exposes an ordered
//! `'static` table of [`FieldSpec`]s built once per model type: declarative
//! metadata plus typed get/set function pointers. The JSON path reads
//! [`JsonMapped::key_specs`], the persistence path reads
//! [`TableMapped::column_specs`].
//!
//! # Example
//!
//! ```
//! use dockhand::{FieldAttr, FieldSpec, JsonMapped, Value, ValueKind};
//!
//! #[derive(Default)]
//! struct Account {
//!     name: String,
//!     points: i64,
//! }
//!
//! impl JsonMapped for Account {
//!     fn key_specs() -> &'static [FieldSpec<Self>] {
//!         static SPECS: [FieldSpec<Account>; 2] = [
//!             FieldSpec {
//!                 attr: FieldAttr { name: "name", required: true },
//!                 kind: ValueKind::Text,
//!                 elem: None,
//!                 get: |m| Some(Value::Text(m.name.clone())),
//!                 set: |m, v| {
//!                     m.name = v.try_into()?;
//!                     Ok(())
//!                 },
//!             },
//!             FieldSpec {
//!                 attr: FieldAttr { name: "points", required: false },
//!                 kind: ValueKind::Int,
//!                 elem: None,
//!                 get: |m| Some(Value::Int(m.points)),
//!                 set: |m, v| {
//!                     m.points = v.try_into()?;
//!                     Ok(())
//!                 },
//!             },
//!         ];
//!         &SPECS
//!     }
//! }
//! ```

use crate::error::DockError;
use crate::value::{Value, ValueKind};

/// Name of the identity column every entity table carries.
pub const ID_COLUMN: &str = "id";

/// Declarative metadata attached to one mapped field.
///
/// `name` is the DB column name in a column-spec table and the JSON key
/// (possibly nested, `"->"`-separated) in a key-spec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAttr {
    pub name: &'static str,
    pub required: bool,
}

/// One mapped field: metadata plus typed accessors.
///
/// The getter returns `None` for a null field (an unset `Option`); the
/// setter receives a semantic [`Value`] and fails with a conversion error
/// when the variant does not match the field type.
pub struct FieldSpec<M> {
    pub attr: FieldAttr,
    pub kind: ValueKind,
    /// Element kind for list fields, `None` otherwise.
    pub elem: Option<ValueKind>,
    pub get: fn(&M) -> Option<Value>,
    pub set: fn(&mut M, Value) -> Result<(), DockError>,
}

/// A model convertible to/from a JSON object through its key-spec table.
pub trait JsonMapped: Default {
    /// Ordered key specs; stable for the process lifetime.
    fn key_specs() -> &'static [FieldSpec<Self>]
    where
        Self: Sized;
}

/// A model convertible to/from a table row through its column-spec table.
///
/// The identity column is not part of the spec table; it is handled through
/// the [`Entity`] accessors.
pub trait TableMapped: Default {
    fn table_name() -> &'static str;

    /// Ordered column specs; stable for the process lifetime.
    fn column_specs() -> &'static [FieldSpec<Self>]
    where
        Self: Sized;
}

/// A table-mapped model with an integer identity.
pub trait Entity: TableMapped {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}
