//! Integration tests for the builder family and entity manager.
//!
//! These tests drive the public API against a small recording fake storage
//! executor defined below; no real engine is involved.

use std::cell::{Cell, RefCell};

use dockhand::{
    ColumnValues, DockError, Entity, EntityManager, FieldAttr, FieldSpec, Is, QuerySpec, Row,
    StorageError, StorageExecutor, TableMapped, UpdateBuilder, Value, ValueKind,
};

// Test entity: a library book.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub available: bool,
    pub rating: Option<f64>,
}

impl TableMapped for Book {
    fn table_name() -> &'static str {
        "books"
    }

    fn column_specs() -> &'static [FieldSpec<Self>] {
        static SPECS: [FieldSpec<Book>; 3] = [
            FieldSpec {
                attr: FieldAttr {
                    name: "title",
                    required: true,
                },
                kind: ValueKind::Text,
                elem: None,
                get: |m| Some(Value::Text(m.title.clone())),
                set: |m, v| {
                    m.title = v.try_into()?;
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "available",
                    required: true,
                },
                kind: ValueKind::Bool,
                elem: None,
                get: |m| Some(Value::Bool(m.available)),
                set: |m, v| {
                    m.available = v.try_into()?;
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "rating",
                    required: false,
                },
                kind: ValueKind::Float,
                elem: None,
                get: |m| m.rating.map(Value::Float),
                set: |m, v| {
                    m.rating = Some(v.try_into()?);
                    Ok(())
                },
            },
        ];
        &SPECS
    }
}

impl Entity for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// Recording fake storage.
#[derive(Default)]
struct FakeStore {
    next_id: Cell<i64>,
    update_result: Cell<u64>,
    fail_next: RefCell<Option<String>>,
    rows: RefCell<Vec<Row>>,
    last_update: RefCell<Option<(String, Vec<String>)>>,
    last_query: RefCell<Option<QuerySpec>>,
}

impl FakeStore {
    fn new() -> Self {
        let store = FakeStore::default();
        store.next_id.set(1);
        store
    }

    fn check_failure(&self) -> Result<(), StorageError> {
        match self.fail_next.borrow_mut().take() {
            Some(msg) => Err(StorageError::new(msg)),
            None => Ok(()),
        }
    }
}

impl StorageExecutor for FakeStore {
    fn insert(&self, _table: &str, _values: &ColumnValues) -> Result<i64, StorageError> {
        self.check_failure()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(id)
    }

    fn update(
        &self,
        _table: &str,
        _values: &ColumnValues,
        where_clause: &str,
        where_args: &[String],
    ) -> Result<u64, StorageError> {
        *self.last_update.borrow_mut() =
            Some((where_clause.to_string(), where_args.to_vec()));
        self.check_failure()?;
        Ok(self.update_result.get())
    }

    fn delete(
        &self,
        _table: &str,
        _where_clause: &str,
        _where_args: &[String],
    ) -> Result<u64, StorageError> {
        self.check_failure()?;
        Ok(self.update_result.get())
    }

    fn query(&self, _table: &str, spec: &QuerySpec) -> Result<Vec<Row>, StorageError> {
        *self.last_query.borrow_mut() = Some(spec.clone());
        self.check_failure()?;
        Ok(self.rows.borrow_mut().drain(..).collect())
    }

    fn execute_raw(&self, _sql: &str) -> Result<(), StorageError> {
        self.check_failure()
    }
}

#[test]
fn test_create_read_roundtrip() {
    let store = FakeStore::new();
    let manager = EntityManager::<Book>::new(&store);

    let mut book = Book {
        id: 0,
        title: "Sailing Alone".to_string(),
        available: true,
        rating: Some(4.5),
    };
    let id = manager.create(&mut book).expect("create failed");
    assert_eq!(id, 1);
    assert_eq!(book.id, 1);

    store.rows.borrow_mut().push(
        Row::new()
            .with("id", Value::Int(1))
            .with("title", Value::Text("Sailing Alone".into()))
            .with("available", Value::Int(1))
            .with("rating", Value::Float(4.5)),
    );
    let back = manager.read(1).expect("read failed").expect("no row");
    assert_eq!(back, book);
}

#[test]
fn test_select_builder_spec_shape() {
    let store = FakeStore::new();
    let manager = EntityManager::<Book>::new(&store);

    let select = manager
        .select()
        .where_col("available", Is::Equal, vec![Value::Bool(true)])
        .where_col("rating", Is::GreaterOrEqual, vec![Value::Float(4.0)])
        .order_by("title", true)
        .limit(10)
        .offset(20);
    let books = manager.read_all(select).expect("select failed");
    assert!(books.is_empty());

    let spec = store.last_query.borrow().clone().expect("no query ran");
    assert_eq!(spec.where_clause, "available = ? AND rating >= ?");
    assert_eq!(spec.where_args, vec!["1".to_string(), "4".to_string()]);
    assert_eq!(
        spec.columns,
        vec![
            "id".to_string(),
            "title".to_string(),
            "available".to_string(),
            "rating".to_string()
        ]
    );
    assert_eq!(spec.order_by, vec!["title ASC".to_string()]);
    assert_eq!(spec.limit, Some(10));
    assert_eq!(spec.offset, Some(20));
}

#[test]
fn test_update_builder_where_id_list() {
    let store = FakeStore::new();
    store.update_result.set(3);

    let mut values = ColumnValues::new();
    values.put("available", Value::Int(0));
    let count = UpdateBuilder::<Book>::new(&store)
        .where_id(5, &[6, 7])
        .content(values)
        .execute()
        .expect("update failed");
    assert_eq!(count, 3);

    let (clause, args) = store.last_update.borrow().clone().expect("no update ran");
    assert_eq!(clause, "id IN (?,?,?)");
    assert_eq!(
        args,
        vec!["5".to_string(), "6".to_string(), "7".to_string()]
    );
}

#[test]
fn test_zero_match_and_failure_are_distinct() {
    let store = FakeStore::new();
    let manager = EntityManager::<Book>::new(&store);
    let book = Book {
        id: 9,
        title: "Ghost".to_string(),
        available: false,
        rating: None,
    };

    // Selection matching nothing: a plain zero count.
    assert_eq!(manager.update(&book).expect("update failed"), 0);

    // Instrumented failure: an error, not a zero count.
    store.fail_next.borrow_mut().replace("io error".to_string());
    match manager.update(&book) {
        Err(DockError::Storage(e)) => assert_eq!(e.message(), "io error"),
        other => panic!("expected storage error, got {:?}", other),
    }
}

#[test]
fn test_delete_by_id() {
    let store = FakeStore::new();
    store.update_result.set(1);
    let manager = EntityManager::<Book>::new(&store);
    assert_eq!(manager.delete(4).expect("delete failed"), 1);
}

#[test]
fn test_null_field_round_trips_through_absent_column() {
    let store = FakeStore::new();
    let manager = EntityManager::<Book>::new(&store);
    let book = Book {
        id: 2,
        title: "No Rating".to_string(),
        available: true,
        rating: None,
    };

    let values = manager.to_column_values(&book).expect("conversion failed");
    assert_eq!(values.get("rating"), Some(&None));

    // An engine returns NULL columns as absent.
    let row = Row::new()
        .with("id", Value::Int(2))
        .with("title", Value::Text("No Rating".into()))
        .with("available", Value::Int(1));
    let back = manager.from_row(&row).expect("from_row failed");
    assert_eq!(back, book);
}
