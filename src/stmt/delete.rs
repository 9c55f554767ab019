//! DELETE builder.

use std::marker::PhantomData;

use crate::error::DockError;
use crate::executor::StorageExecutor;
use crate::model::Entity;
use crate::stmt::{Is, StatementBuilder};
use crate::value::Value;

/// Builds and executes a DELETE against the entity's table.
///
/// An empty selection deletes every row, mirroring the storage engine's
/// own contract.
pub struct DeleteBuilder<'a, E: Entity> {
    executor: &'a dyn StorageExecutor,
    stmt: StatementBuilder,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> DeleteBuilder<'a, E> {
    #[must_use]
    pub fn new(executor: &'a dyn StorageExecutor) -> Self {
        DeleteBuilder {
            executor,
            stmt: StatementBuilder::new(),
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

    /// Execute the delete, returning the affected-row count.
    pub fn execute(mut self) -> Result<u64, DockError> {
        let selection = self.stmt.selection()?;
        log::debug!(
            "DELETE on '{}', selection: '{}', args: {:?}",
            E::table_name(),
            selection.clause,
            selection.args
        );
        self.executor
            .delete(E::table_name(), &selection.clause, &selection.args)
            .map_err(|err| {
                log::error!("DELETE on '{}' failed: {}", E::table_name(), err);
                DockError::Storage(err)
            })
    }
}
