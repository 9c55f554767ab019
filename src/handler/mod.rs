//! Type handlers and the handler registry.
//!
//! A [`TypeHandler`] is a stateless strategy converting one semantic value
//! kind between its runtime form ([`Value`]), its column storage form, and
//! its JSON form. The [`TypeHandlerRegistry`] resolves a [`ValueKind`] token
//! to the one handler claiming it.
//!
//! # Registration order
//!
//! Claims are resolved at registration time: `register` probes `can_handle`
//! against every kind token and assigns each still-unclaimed kind to the new
//! handler. **First-registered wins** — a later handler claiming an already
//! claimed kind is ignored for that kind. The default set registers in a
//! fixed, documented order: Bool, Int, Float, Text, Blob, Uuid, DateTime,
//! Decimal, List.
//!
//! The process-wide default registry behind [`registry`] is built lazily on
//! first use and never mutated afterwards (initialize-then-freeze); it is
//! safe for concurrent reads.

mod extended;
mod list;
mod primitives;

pub use extended::{DateTimeHandler, DecimalHandler, UuidHandler};
pub use list::ListHandler;
pub use primitives::{BlobHandler, BoolHandler, FloatHandler, IntHandler, TextHandler};

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;

use crate::error::DockError;
use crate::executor::Row;
use crate::value::{ColumnType, Value, ValueKind};

/// Strategy converting one value kind between runtime, storage, and JSON
/// forms.
///
/// Handlers are stateless and shared; every method receives the declared
/// field kind and, for list fields, the element kind, so one handler can
/// serve related kinds and perform element-wise conversion.
pub trait TypeHandler: Send + Sync {
    /// Whether this handler claims the given kind token.
    fn can_handle(&self, kind: ValueKind) -> bool;

    /// Column affinity for DDL derived from this kind.
    fn column_type(&self) -> ColumnType;

    /// Parse a value of this kind from its plain string form.
    fn parse_from_string(&self, kind: ValueKind, raw: &str) -> Result<Value, DockError>;

    /// Convert a semantic value to its column storage form.
    fn to_storage(
        &self,
        kind: ValueKind,
        elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<Value, DockError>;

    /// Extract a semantic value from a result row column.
    fn read_from_row(
        &self,
        kind: ValueKind,
        elem: Option<ValueKind>,
        row: &Row,
        column: &str,
    ) -> Result<Value, DockError>;

    /// Convert a semantic value to its JSON form.
    fn to_json(
        &self,
        kind: ValueKind,
        elem: Option<ValueKind>,
        value: &Value,
    ) -> Result<JsonValue, DockError>;

    /// Convert a JSON value back to the semantic form.
    fn from_json(
        &self,
        kind: ValueKind,
        elem: Option<ValueKind>,
        json: &JsonValue,
    ) -> Result<Value, DockError>;
}

/// Registry resolving kind tokens to handlers.
#[derive(Default)]
pub struct TypeHandlerRegistry {
    handlers: Vec<Box<dyn TypeHandler>>,
    by_kind: HashMap<ValueKind, usize>,
}

impl TypeHandlerRegistry {
    /// Empty registry; resolve nothing until handlers are registered.
    #[must_use]
    pub fn new() -> Self {
        TypeHandlerRegistry::default()
    }

    /// Registry pre-loaded with the built-in handlers in their documented
    /// order.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = TypeHandlerRegistry::new();
        registry.register(Box::new(BoolHandler));
        registry.register(Box::new(IntHandler));
        registry.register(Box::new(FloatHandler));
        registry.register(Box::new(TextHandler));
        registry.register(Box::new(BlobHandler));
        registry.register(Box::new(UuidHandler));
        registry.register(Box::new(DateTimeHandler));
        registry.register(Box::new(DecimalHandler));
        registry.register(Box::new(ListHandler));
        registry
    }

    /// Register a handler, claiming every kind it can handle that no earlier
    /// handler already claimed. First-registered wins.
    pub fn register(&mut self, handler: Box<dyn TypeHandler>) {
        let index = self.handlers.len();
        for kind in ValueKind::ALL {
            if handler.can_handle(kind) && !self.by_kind.contains_key(&kind) {
                self.by_kind.insert(kind, index);
            }
        }
        self.handlers.push(handler);
    }

    /// Resolve the handler claiming a kind, or fail with a lookup error.
    ///
    /// Lookup failures are always fatal to the operation in progress; callers
    /// must not skip them, even for optional fields.
    pub fn handler_or_err(&self, kind: ValueKind) -> Result<&dyn TypeHandler, DockError> {
        self.by_kind
            .get(&kind)
            .map(|&i| self.handlers[i].as_ref())
            .ok_or(DockError::NoHandler(kind))
    }
}

static REGISTRY: Lazy<TypeHandlerRegistry> = Lazy::new(TypeHandlerRegistry::with_defaults);

/// Process-wide default registry.
pub fn registry() -> &'static TypeHandlerRegistry {
    &REGISTRY
}

/// Fetch the stored value for a column, failing when the column is absent.
fn stored<'a>(row: &'a Row, column: &str) -> Result<&'a Value, DockError> {
    row.get(column).ok_or_else(|| {
        DockError::conversion(column, "column not present in row")
    })
}
