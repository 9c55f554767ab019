//! Statement builder family.
//!
//! [`StatementBuilder`] accumulates WHERE predicates and renders them into a
//! parameterized [`Selection`] — clause text with `?` placeholders, values
//! bound through the argument array, never inlined. The concrete builders
//! ([`SelectBuilder`], [`UpdateBuilder`], [`InsertBuilder`],
//! [`DeleteBuilder`]) compose this core and execute against the storage
//! collaborator.
//!
//! Builders are single-statement, single-use, and not meant to be shared
//! across concurrent operations.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;

use crate::error::DockError;
use crate::model::ID_COLUMN;
use crate::value::Value;

/// WHERE-clause operator.
///
/// The symbol embeds the `?` placeholder for operators taking exactly one
/// value; `In`/`NotIn` render their own parenthesized placeholder list and
/// `Null`/`NotNull` take none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Is {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Like,
    In,
    NotIn,
    Null,
    NotNull,
}

impl Is {
    fn symbol(self) -> &'static str {
        match self {
            Is::Equal => " = ?",
            Is::NotEqual => " <> ?",
            Is::Less => " < ?",
            Is::LessOrEqual => " <= ?",
            Is::Greater => " > ?",
            Is::GreaterOrEqual => " >= ?",
            Is::Like => " LIKE ?",
            Is::In => " IN ",
            Is::NotIn => " NOT IN ",
            Is::Null => " IS NULL",
            Is::NotNull => " IS NOT NULL",
        }
    }
}

/// Rendered selection: clause text plus positional argument values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<String>,
}

struct Predicate {
    column: String,
    op: Is,
    values: Vec<Value>,
}

/// Accumulates filter conditions and renders them deterministically.
///
/// Structured predicates and a raw fragment are mutually exclusive modes:
/// setting a raw fragment short-circuits the accumulated predicates, and
/// appending a structured predicate discards a previously set raw fragment.
/// The rendered selection is cached until either mutation invalidates it.
#[derive(Default)]
pub struct StatementBuilder {
    where_list: Vec<Predicate>,
    raw: Option<(String, Vec<Value>)>,
    rendered: Option<Selection>,
}

impl StatementBuilder {
    #[must_use]
    pub fn new() -> Self {
        StatementBuilder::default()
    }

    /// Filter on the identity column: one id is an equality predicate, more
    /// become an `IN` over the concatenated list (original id first).
    pub fn where_id(&mut self, id: i64, more_ids: &[i64]) {
        if more_ids.is_empty() {
            self.where_col(ID_COLUMN, Is::Equal, vec![Value::Int(id)]);
        } else {
            let mut values = Vec::with_capacity(more_ids.len() + 1);
            values.push(Value::Int(id));
            values.extend(more_ids.iter().copied().map(Value::Int));
            self.where_col(ID_COLUMN, Is::In, values);
        }
    }

    /// Append a structured predicate. Never fails; malformed values surface
    /// when the selection is rendered.
    pub fn where_col(&mut self, column: impl Into<String>, op: Is, values: Vec<Value>) {
        self.raw = None;
        self.rendered = None;
        self.where_list.push(Predicate {
            column: column.into(),
            op,
            values,
        });
    }

    /// Escape hatch: use a raw selection fragment and its arguments directly,
    /// bypassing structured accumulation.
    pub fn where_raw(&mut self, clause: impl Into<String>, args: Vec<Value>) {
        self.rendered = None;
        self.raw = Some((clause.into(), args));
    }

    /// Render the selection, building it on first call and reusing the cached
    /// result until a new predicate or fragment invalidates it.
    pub fn selection(&mut self) -> Result<Selection, DockError> {
        if let Some(sel) = &self.rendered {
            return Ok(sel.clone());
        }
        let sel = match &self.raw {
            Some((clause, args)) => Selection {
                clause: clause.clone(),
                args: args
                    .iter()
                    .map(|v| arg_string("<raw>", v))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            None => render(&self.where_list)?,
        };
        self.rendered = Some(sel.clone());
        Ok(sel)
    }
}

fn render(where_list: &[Predicate]) -> Result<Selection, DockError> {
    let mut clause = String::new();
    let mut args = Vec::new();
    for (i, p) in where_list.iter().enumerate() {
        if i > 0 {
            clause.push_str(" AND ");
        }
        clause.push_str(&p.column);
        clause.push_str(p.op.symbol());
        match p.op {
            Is::Null | Is::NotNull => {}
            Is::In | Is::NotIn => {
                clause.push('(');
                clause.push_str(&build_placeholders(p.values.len()));
                clause.push(')');
                for value in &p.values {
                    args.push(arg_string(&p.column, value)?);
                }
            }
            _ => {
                let value = p.values.first().ok_or_else(|| {
                    DockError::conversion(&p.column, "operator requires a value")
                })?;
                args.push(arg_string(&p.column, value)?);
            }
        }
    }
    Ok(Selection { clause, args })
}

fn build_placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// Stringify a bound argument, attributing failures to the column.
fn arg_string(column: &str, value: &Value) -> Result<String, DockError> {
    value.to_arg_string().map_err(|err| match err {
        DockError::Conversion { message, .. } => DockError::Conversion {
            key: column.to_string(),
            message,
        },
        other => other,
    })
}
