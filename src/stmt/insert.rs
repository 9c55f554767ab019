//! INSERT builder.

use std::marker::PhantomData;

use crate::error::DockError;
use crate::executor::{ColumnValues, StorageExecutor};
use crate::model::Entity;

/// Builds and executes an INSERT, returning the engine-assigned row id.
pub struct InsertBuilder<'a, E: Entity> {
    executor: &'a dyn StorageExecutor,
    values: Option<ColumnValues>,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> InsertBuilder<'a, E> {
    #[must_use]
    pub fn new(executor: &'a dyn StorageExecutor) -> Self {
        InsertBuilder {
            executor,
            values: None,
            _entity: PhantomData,
        }
    }

    /// Column payload to insert; values are expected in storage form.
    #[must_use]
    pub fn content(mut self, values: ColumnValues) -> Self {
        self.values = Some(values);
        self
    }

    pub fn execute(self) -> Result<i64, DockError> {
        let values = self.values.unwrap_or_default();
        log::debug!("INSERT on '{}', values: {:?}", E::table_name(), values);
        self.executor
            .insert(E::table_name(), &values)
            .map_err(|err| {
                log::error!("INSERT on '{}' failed: {}", E::table_name(), err);
                DockError::Storage(err)
            })
    }
}
