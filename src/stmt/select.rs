//! SELECT builder.

use std::marker::PhantomData;

use crate::error::DockError;
use crate::executor::{QuerySpec, Row, StorageExecutor};
use crate::model::{Entity, TableMapped, ID_COLUMN};
use crate::stmt::{Is, StatementBuilder};
use crate::value::Value;

/// Builds and executes a query against the entity's table.
///
/// Columns default to the identity column plus the entity's column specs;
/// `columns` narrows the projection.
pub struct SelectBuilder<'a, E: Entity> {
    executor: &'a dyn StorageExecutor,
    stmt: StatementBuilder,
    distinct: bool,
    columns: Option<Vec<String>>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity + 'static> SelectBuilder<'a, E> {
    #[must_use]
    pub fn new(executor: &'a dyn StorageExecutor) -> Self {
        SelectBuilder {
            executor,
            stmt: StatementBuilder::new(),
            distinct: false,
            columns: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
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

    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| (*c).to_string()).collect());
        self
    }

    /// Append an ordering term; terms apply in the order they were added.
    #[must_use]
    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "ASC" } else { "DESC" };
        self.order_by.push(format!("{} {}", column, direction));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render the query and fetch the matching rows.
    pub fn execute(mut self) -> Result<Vec<Row>, DockError> {
        let selection = self.stmt.selection()?;
        let columns = self.columns.take().unwrap_or_else(default_columns::<E>);
        let spec = QuerySpec {
            distinct: self.distinct,
            columns,
            where_clause: selection.clause,
            where_args: selection.args,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
        };
        log::debug!("SELECT on '{}', spec: {:?}", E::table_name(), spec);
        self.executor
            .query(E::table_name(), &spec)
            .map_err(|err| {
                log::error!("SELECT on '{}' failed: {}", E::table_name(), err);
                DockError::Storage(err)
            })
    }
}

fn default_columns<E: Entity + 'static>() -> Vec<String> {
    let mut columns = Vec::with_capacity(E::column_specs().len() + 1);
    columns.push(ID_COLUMN.to_string());
    columns.extend(
        <E as TableMapped>::column_specs()
            .iter()
            .map(|spec| spec.attr.name.to_string()),
    );
    columns
}
