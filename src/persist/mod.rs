//! Entity persistence over the statement builder family.
//!
//! [`EntityManager`] converts entities to column payloads and back through
//! the handler registry, and layers CRUD convenience over the builders.
//! Schema orchestration lives in [`schema`].

pub mod schema;

use std::marker::PhantomData;

use crate::error::DockError;
use crate::executor::{ColumnValues, Row, StorageExecutor};
use crate::handler::registry;
use crate::model::{Entity, FieldSpec, ID_COLUMN};
use crate::stmt::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
use crate::value::Value;

/// Converts entities to/from storage form and runs CRUD statements.
pub struct EntityManager<'a, E: Entity> {
    executor: &'a dyn StorageExecutor,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity + 'static> EntityManager<'a, E> {
    #[must_use]
    pub fn new(executor: &'a dyn StorageExecutor) -> Self {
        EntityManager {
            executor,
            _entity: PhantomData,
        }
    }

    /// Insert the entity and write the engine-assigned id back into it.
    pub fn create(&self, item: &mut E) -> Result<i64, DockError> {
        let values = self.to_column_values(item)?;
        let id = InsertBuilder::<E>::new(self.executor)
            .content(values)
            .execute()?;
        item.set_id(id);
        Ok(id)
    }

    /// Fetch one entity by id; `Ok(None)` when no row matches.
    pub fn read(&self, id: i64) -> Result<Option<E>, DockError> {
        let rows = SelectBuilder::<E>::new(self.executor)
            .where_id(id, &[])
            .limit(1)
            .execute()?;
        rows.first().map(|row| self.from_row(row)).transpose()
    }

    /// Update the row matching the entity's id, returning the affected-row
    /// count (`Ok(0)` when no row matches).
    pub fn update(&self, item: &E) -> Result<u64, DockError> {
        let values = self.to_column_values(item)?;
        UpdateBuilder::<E>::new(self.executor)
            .where_id(item.id(), &[])
            .content(values)
            .execute()
    }

    /// Delete by id, returning the affected-row count.
    pub fn delete(&self, id: i64) -> Result<u64, DockError> {
        DeleteBuilder::<E>::new(self.executor)
            .where_id(id, &[])
            .execute()
    }

    /// Start a select against this entity's table.
    #[must_use]
    pub fn select(&self) -> SelectBuilder<'a, E> {
        SelectBuilder::new(self.executor)
    }

    /// Run a select and map every row back to an entity.
    pub fn read_all(&self, select: SelectBuilder<'a, E>) -> Result<Vec<E>, DockError> {
        select
            .execute()?
            .iter()
            .map(|row| self.from_row(row))
            .collect()
    }

    /// Handler-converted storage payload for the entity.
    ///
    /// Null field values become explicit NULL columns; a zero id is omitted
    /// so the engine assigns one.
    pub fn to_column_values(&self, item: &E) -> Result<ColumnValues, DockError> {
        let mut values = ColumnValues::new();
        if item.id() > 0 {
            values.put(ID_COLUMN, Value::Int(item.id()));
        }
        for spec in E::column_specs() {
            match (spec.get)(item) {
                None => values.put_null(spec.attr.name),
                Some(value) => {
                    let handler = registry().handler_or_err(spec.kind)?;
                    let stored = handler
                        .to_storage(spec.kind, spec.elem, &value)
                        .map_err(|e| rekey(spec, e))?;
                    values.put(spec.attr.name, stored);
                }
            }
        }
        Ok(values)
    }

    /// Map a result row back to an entity. Columns absent from the row
    /// (NULL in storage, or not selected) keep their default.
    pub fn from_row(&self, row: &Row) -> Result<E, DockError> {
        let mut item = E::default();
        if let Some(Value::Int(id)) = row.get(ID_COLUMN) {
            item.set_id(*id);
        }
        for spec in E::column_specs() {
            if !row.contains(spec.attr.name) {
                continue;
            }
            let handler = registry().handler_or_err(spec.kind)?;
            let value = handler
                .read_from_row(spec.kind, spec.elem, row, spec.attr.name)
                .map_err(|e| rekey(spec, e))?;
            (spec.set)(&mut item, value).map_err(|e| rekey(spec, e))?;
        }
        Ok(item)
    }
}

/// Re-attribute a conversion failure to the column name.
fn rekey<M>(spec: &FieldSpec<M>, err: DockError) -> DockError {
    match err {
        DockError::Conversion { message, .. } => DockError::Conversion {
            key: spec.attr.name.to_string(),
            message,
        },
        other => other,
    }
}
