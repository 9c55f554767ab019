//! Schema orchestration: table creation, indexing, drops.
//!
//! The `CREATE TABLE` statement itself comes from the collaborator
//! [`DdlProvider`]; this module only derives the per-column descriptors from
//! an entity's specs and sequences the calls. Index and drop statements are
//! simple enough to build inline.

use crate::error::DockError;
use crate::executor::StorageExecutor;
use crate::handler::registry;
use crate::model::Entity;
use crate::value::ColumnType;

/// Non-generic per-column descriptor handed to the DDL collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDdl {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub required: bool,
}

/// Collaborator producing `CREATE TABLE` statements.
pub trait DdlProvider {
    fn create_table_sql(&self, table: &str, columns: &[ColumnDdl]) -> String;
}

/// Derive the column descriptors for an entity from its specs, taking each
/// column's affinity from the registered handler.
pub fn column_ddl<E: Entity + 'static>() -> Result<Vec<ColumnDdl>, DockError> {
    E::column_specs()
        .iter()
        .map(|spec| {
            let handler = registry().handler_or_err(spec.kind)?;
            Ok(ColumnDdl {
                name: spec.attr.name,
                column_type: handler.column_type(),
                required: spec.attr.required,
            })
        })
        .collect()
}

/// Sequences schema statements against the storage collaborator.
pub struct SchemaHelper<'a> {
    executor: &'a dyn StorageExecutor,
    ddl: &'a dyn DdlProvider,
}

impl<'a> SchemaHelper<'a> {
    #[must_use]
    pub fn new(executor: &'a dyn StorageExecutor, ddl: &'a dyn DdlProvider) -> Self {
        SchemaHelper { executor, ddl }
    }

    /// Create the entity's table from collaborator-supplied DDL.
    pub fn create_table<E: Entity + 'static>(&self) -> Result<(), DockError> {
        let columns = column_ddl::<E>()?;
        let sql = self.ddl.create_table_sql(E::table_name(), &columns);
        self.run(&sql)
    }

    /// Create an index over the given columns.
    pub fn create_index<E: Entity>(
        &self,
        unique: bool,
        columns: &[&str],
    ) -> Result<(), DockError> {
        let name = format!("idx_{}_{}", E::table_name(), columns.join("_"));
        let sql = format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {}({})",
            if unique { "UNIQUE " } else { "" },
            name,
            E::table_name(),
            columns.join(", ")
        );
        self.run(&sql)
    }

    /// Drop the entity's table if it exists.
    pub fn drop_table<E: Entity>(&self) -> Result<(), DockError> {
        let sql = format!("DROP TABLE IF EXISTS {}", E::table_name());
        self.run(&sql)
    }

    fn run(&self, sql: &str) -> Result<(), DockError> {
        log::debug!("DDL: {}", sql);
        self.executor.execute_raw(sql).map_err(|err| {
            log::error!("DDL failed: {}", err);
            DockError::Storage(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{Call, FakeStorage};
    use crate::tests_cfg::Task;

    struct StubDdl;

    impl DdlProvider for StubDdl {
        fn create_table_sql(&self, table: &str, columns: &[ColumnDdl]) -> String {
            let cols: Vec<String> = columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.column_type.as_sql()))
                .collect();
            format!("CREATE TABLE {} ({})", table, cols.join(", "))
        }
    }

    #[test]
    fn test_column_ddl_uses_handler_affinities() {
        let columns = column_ddl::<Task>().unwrap();
        let pairs: Vec<(&str, ColumnType)> =
            columns.iter().map(|c| (c.name, c.column_type)).collect();
        assert_eq!(
            pairs,
            vec![
                ("title", ColumnType::Text),
                ("done", ColumnType::Integer),
                ("due", ColumnType::Integer),
                ("tags", ColumnType::Text),
            ]
        );
    }

    #[test]
    fn test_create_table_executes_provider_sql() {
        let storage = FakeStorage::new();
        let helper = SchemaHelper::new(&storage, &StubDdl);
        helper.create_table::<Task>().unwrap();
        assert_eq!(
            storage.calls(),
            vec![Call::Raw {
                sql: "CREATE TABLE tasks (title TEXT, done INTEGER, due INTEGER, tags TEXT)"
                    .to_string()
            }]
        );
    }

    #[test]
    fn test_create_index_statement_shape() {
        let storage = FakeStorage::new();
        let helper = SchemaHelper::new(&storage, &StubDdl);
        helper.create_index::<Task>(true, &["title", "done"]).unwrap();
        assert_eq!(
            storage.calls(),
            vec![Call::Raw {
                sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_title_done ON tasks(title, done)"
                    .to_string()
            }]
        );
    }

    #[test]
    fn test_drop_table_statement_shape() {
        let storage = FakeStorage::new();
        let helper = SchemaHelper::new(&storage, &StubDdl);
        helper.drop_table::<Task>().unwrap();
        assert_eq!(
            storage.calls(),
            vec![Call::Raw {
                sql: "DROP TABLE IF EXISTS tasks".to_string()
            }]
        );
    }

    #[test]
    fn test_ddl_failure_propagates() {
        let storage = FakeStorage::new();
        storage.fail_next("locked");
        let helper = SchemaHelper::new(&storage, &StubDdl);
        assert!(matches!(
            helper.drop_table::<Task>(),
            Err(DockError::Storage(_))
        ));
    }
}
