//! Fake storage executor for tests.
//!
//! [`FakeStorage`] records every call, hands back scripted results, and can
//! be told to fail the next call — enough to drive the builder family and
//! the entity manager without a real engine. Single-threaded by design.

use std::cell::{Cell, RefCell};

use crate::executor::{ColumnValues, QuerySpec, Row, StorageError, StorageExecutor};

/// One recorded executor call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert {
        table: String,
        values: ColumnValues,
    },
    Update {
        table: String,
        values: ColumnValues,
        clause: String,
        args: Vec<String>,
    },
    Delete {
        table: String,
        clause: String,
        args: Vec<String>,
    },
    Query {
        table: String,
        spec: QuerySpec,
    },
    Raw {
        sql: String,
    },
}

/// Recording fake with scripted results.
#[derive(Default)]
pub struct FakeStorage {
    next_id: Cell<i64>,
    update_result: Cell<u64>,
    delete_result: Cell<u64>,
    queued_rows: RefCell<Vec<Vec<Row>>>,
    fail_next: RefCell<Option<String>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeStorage {
    #[must_use]
    pub fn new() -> Self {
        let storage = FakeStorage::default();
        storage.next_id.set(1);
        storage
    }

    /// Queue the result rows for the next query, FIFO across queries.
    pub fn queue_rows(&self, rows: Vec<Row>) {
        self.queued_rows.borrow_mut().push(rows);
    }

    /// Affected-row count returned by subsequent updates.
    pub fn set_update_result(&self, count: u64) {
        self.update_result.set(count);
    }

    /// Affected-row count returned by subsequent deletes.
    pub fn set_delete_result(&self, count: u64) {
        self.delete_result.set(count);
    }

    /// Fail the next call with the given message.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.borrow_mut() = Some(message.to_string());
    }

    /// Every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn take_failure(&self) -> Result<(), StorageError> {
        match self.fail_next.borrow_mut().take() {
            Some(message) => Err(StorageError::new(message)),
            None => Ok(()),
        }
    }
}

impl StorageExecutor for FakeStorage {
    fn insert(&self, table: &str, values: &ColumnValues) -> Result<i64, StorageError> {
        self.calls.borrow_mut().push(Call::Insert {
            table: table.to_string(),
            values: values.clone(),
        });
        self.take_failure()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(id)
    }

    fn update(
        &self,
        table: &str,
        values: &ColumnValues,
        where_clause: &str,
        where_args: &[String],
    ) -> Result<u64, StorageError> {
        self.calls.borrow_mut().push(Call::Update {
            table: table.to_string(),
            values: values.clone(),
            clause: where_clause.to_string(),
            args: where_args.to_vec(),
        });
        self.take_failure()?;
        Ok(self.update_result.get())
    }

    fn delete(
        &self,
        table: &str,
        where_clause: &str,
        where_args: &[String],
    ) -> Result<u64, StorageError> {
        self.calls.borrow_mut().push(Call::Delete {
            table: table.to_string(),
            clause: where_clause.to_string(),
            args: where_args.to_vec(),
        });
        self.take_failure()?;
        Ok(self.delete_result.get())
    }

    fn query(&self, table: &str, spec: &QuerySpec) -> Result<Vec<Row>, StorageError> {
        self.calls.borrow_mut().push(Call::Query {
            table: table.to_string(),
            spec: spec.clone(),
        });
        self.take_failure()?;
        let mut queued = self.queued_rows.borrow_mut();
        if queued.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(queued.remove(0))
        }
    }

    fn execute_raw(&self, sql: &str) -> Result<(), StorageError> {
        self.calls.borrow_mut().push(Call::Raw {
            sql: sql.to_string(),
        });
        self.take_failure()
    }
}
