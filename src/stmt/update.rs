//! UPDATE builder.

use std::marker::PhantomData;

use crate::error::DockError;
use crate::executor::{ColumnValues, StorageExecutor};
use crate::model::Entity;
use crate::stmt::{Is, StatementBuilder};
use crate::value::Value;

/// Builds and executes an UPDATE against the entity's table.
///
/// `Ok(0)` means no rows matched the selection; storage failures are logged
/// and propagated as `DockError::Storage`, never folded into the count.
pub struct UpdateBuilder<'a, E: Entity> {
    executor: &'a dyn StorageExecutor,
    stmt: StatementBuilder,
    values: Option<ColumnValues>,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> UpdateBuilder<'a, E> {
    #[must_use]
    pub fn new(executor: &'a dyn StorageExecutor) -> Self {
        UpdateBuilder {
            executor,
            stmt: StatementBuilder::new(),
            values: None,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn where_id(mut self, id: i64, more_ids: &[i64]) -> Self {
        self.stmt.where_id(id, more_ids);
        self
    }

    #[must_use]
    pub fn where_col(mut self, column: &str, op: Is, values: Vec<Value>) -> Self {
        self.stmt.where_col(column, op, values);
        self
    }

    #[must_use]
    pub fn where_raw(mut self, clause: &str, args: Vec<Value>) -> Self {
        self.stmt.where_raw(clause, args);
        self
    }

    /// Column payload to write; values are expected in storage form.
    #[must_use]
    pub fn content(mut self, values: ColumnValues) -> Self {
        self.values = Some(values);
        self
    }

    /// Execute the update, returning the affected-row count.
    pub fn execute(mut self) -> Result<u64, DockError> {
        let selection = self.stmt.selection()?;
        let values = self.values.unwrap_or_default();
        log::debug!(
            "UPDATE on '{}', values: {:?}, selection: '{}', args: {:?}",
            E::table_name(),
            values,
            selection.clause,
            selection.args
        );
        self.executor
            .update(E::table_name(), &values, &selection.clause, &selection.args)
            .map_err(|err| {
                log::error!("UPDATE on '{}' failed: {}", E::table_name(), err);
                DockError::Storage(err)
            })
    }
}
