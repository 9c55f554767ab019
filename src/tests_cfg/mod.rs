//! Shared test models with hand-registered spec tables.

use chrono::{DateTime, Utc};

use crate::model::{Entity, FieldAttr, FieldSpec, JsonMapped, TableMapped};
use crate::value::{Value, ValueKind};

/// Minimal JSON-mapped model.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Note {
    pub title: String,
    pub done: bool,
}

impl JsonMapped for Note {
    fn key_specs() -> &'static [FieldSpec<Self>] {
        static SPECS: [FieldSpec<Note>; 2] = [
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
                    name: "done",
                    required: false,
                },
                kind: ValueKind::Bool,
                elem: None,
                get: |m| Some(Value::Bool(m.done)),
                set: |m, v| {
                    m.done = v.try_into()?;
                    Ok(())
                },
            },
        ];
        &SPECS
    }
}

/// JSON-mapped model exercising nested keys, optional fields, and lists.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub nickname: Option<String>,
    pub age: i64,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub tags: Vec<String>,
}

impl JsonMapped for Profile {
    fn key_specs() -> &'static [FieldSpec<Self>] {
        static SPECS: [FieldSpec<Profile>; 6] = [
            FieldSpec {
                attr: FieldAttr {
                    name: "name",
                    required: true,
                },
                kind: ValueKind::Text,
                elem: None,
                get: |m| Some(Value::Text(m.name.clone())),
                set: |m, v| {
                    m.name = v.try_into()?;
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "nickname",
                    required: false,
                },
                kind: ValueKind::Text,
                elem: None,
                get: |m| m.nickname.clone().map(Value::Text),
                set: |m, v| {
                    m.nickname = Some(v.try_into()?);
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "age",
                    required: true,
                },
                kind: ValueKind::Int,
                elem: None,
                get: |m| Some(Value::Int(m.age)),
                set: |m, v| {
                    m.age = v.try_into()?;
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "address->city",
                    required: false,
                },
                kind: ValueKind::Text,
                elem: None,
                get: |m| m.city.clone().map(Value::Text),
                set: |m, v| {
                    m.city = Some(v.try_into()?);
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "address->zip",
                    required: true,
                },
                kind: ValueKind::Text,
                elem: None,
                get: |m| m.zip.clone().map(Value::Text),
                set: |m, v| {
                    m.zip = Some(v.try_into()?);
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "tags",
                    required: false,
                },
                kind: ValueKind::List,
                elem: Some(ValueKind::Text),
                get: |m| Some(Value::list(m.tags.iter().cloned())),
                set: |m, v| {
                    m.tags = v.try_into_vec()?;
                    Ok(())
                },
            },
        ];
        &SPECS
    }
}

/// Table-mapped entity exercising the persistence path.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub done: bool,
    pub due: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TableMapped for Task {
    fn table_name() -> &'static str {
        "tasks"
    }

    fn column_specs() -> &'static [FieldSpec<Self>] {
        static SPECS: [FieldSpec<Task>; 4] = [
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
                    name: "done",
                    required: true,
                },
                kind: ValueKind::Bool,
                elem: None,
                get: |m| Some(Value::Bool(m.done)),
                set: |m, v| {
                    m.done = v.try_into()?;
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "due",
                    required: false,
                },
                kind: ValueKind::DateTime,
                elem: None,
                get: |m| m.due.map(Value::DateTime),
                set: |m, v| {
                    m.due = Some(v.try_into()?);
                    Ok(())
                },
            },
            FieldSpec {
                attr: FieldAttr {
                    name: "tags",
                    required: false,
                },
                kind: ValueKind::List,
                elem: Some(ValueKind::Text),
                get: |m| Some(Value::list(m.tags.iter().cloned())),
                set: |m, v| {
                    m.tags = v.try_into_vec()?;
                    Ok(())
                },
            },
        ];
        &SPECS
    }
}

impl Entity for Task {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
