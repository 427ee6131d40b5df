//! Condition expressions for filtered operations
//!
//! A [`Filter`] is an opaque condition tree describing which rows an
//! operation applies to, analogous to a SQL WHERE clause. Callers build
//! one with [`Filter::cmp`] and chain further clauses with `and`/`or`;
//! the storage layer renders it to a parameterized fragment at dispatch
//! time and never inspects it otherwise.
//!
//! ```ignore
//! let adults = Filter::cmp("age", Op::Ge, 18)
//!     .and("name", Op::Like, "a%")
//!     .or("vip", Op::Eq, true);
//! ```

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use crate::record::quote_ident;

/// A dynamically typed parameter value
///
/// Owned counterpart of the SQLite storage classes. Filter clauses and
/// row bindings carry these so a statement can be rendered and bound in
/// one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(v as i64)
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Comparison operator for a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl Op {
    fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Like => "LIKE",
        }
    }
}

/// How a clause combines with the one before it
#[derive(Debug, Clone, Copy)]
enum Conj {
    And,
    Or,
}

impl Conj {
    fn as_sql(self) -> &'static str {
        match self {
            Conj::And => " AND ",
            Conj::Or => " OR ",
        }
    }
}

#[derive(Debug, Clone)]
enum Clause {
    Cmp {
        column: String,
        op: Op,
        value: Value,
    },
    OneOf {
        column: String,
        values: Vec<Value>,
    },
    Null {
        column: String,
        negated: bool,
    },
    Group(Filter),
}

impl Clause {
    fn render(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            // `= NULL` never matches in SQL; rewrite to the IS form the
            // caller almost certainly meant.
            Clause::Cmp {
                column,
                op,
                value: Value::Null,
            } if *op == Op::Eq || *op == Op::Ne => {
                sql.push_str(&quote_ident(column));
                sql.push_str(if *op == Op::Eq {
                    " IS NULL"
                } else {
                    " IS NOT NULL"
                });
            }
            Clause::Cmp { column, op, value } => {
                sql.push_str(&quote_ident(column));
                sql.push(' ');
                sql.push_str(op.as_sql());
                sql.push_str(" ?");
                params.push(value.clone());
            }
            Clause::OneOf { column, values } => {
                if values.is_empty() {
                    // An empty list matches no row.
                    sql.push('0');
                    return;
                }
                sql.push_str(&quote_ident(column));
                sql.push_str(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    sql.push('?');
                    params.push(value.clone());
                }
                sql.push(')');
            }
            Clause::Null { column, negated } => {
                sql.push_str(&quote_ident(column));
                sql.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Clause::Group(filter) => {
                sql.push('(');
                let (inner_sql, inner_params) = filter.to_sql();
                sql.push_str(&inner_sql);
                params.extend(inner_params);
                sql.push(')');
            }
        }
    }
}

/// An opaque row-selection predicate
///
/// Clauses are combined left to right in the order they were added,
/// exactly as written; grouped sub-filters are parenthesized.
#[derive(Debug, Clone)]
pub struct Filter {
    clauses: Vec<(Conj, Clause)>,
}

impl Filter {
    /// Start a filter with a single comparison clause
    pub fn cmp(column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self::start(Clause::Cmp {
            column: column.into(),
            op,
            value: value.into(),
        })
    }

    /// Start a filter matching rows whose column is NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::start(Clause::Null {
            column: column.into(),
            negated: false,
        })
    }

    /// Start a filter matching rows whose column is not NULL
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::start(Clause::Null {
            column: column.into(),
            negated: true,
        })
    }

    /// Start a filter matching rows whose column equals any listed value
    pub fn one_of<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::start(Clause::OneOf {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Add a comparison clause joined with AND
    pub fn and(mut self, column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.clauses.push((
            Conj::And,
            Clause::Cmp {
                column: column.into(),
                op,
                value: value.into(),
            },
        ));
        self
    }

    /// Add a comparison clause joined with OR
    pub fn or(mut self, column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.clauses.push((
            Conj::Or,
            Clause::Cmp {
                column: column.into(),
                op,
                value: value.into(),
            },
        ));
        self
    }

    /// Add a parenthesized sub-filter joined with AND
    pub fn and_group(mut self, other: Filter) -> Self {
        self.clauses.push((Conj::And, Clause::Group(other)));
        self
    }

    /// Add a parenthesized sub-filter joined with OR
    pub fn or_group(mut self, other: Filter) -> Self {
        self.clauses.push((Conj::Or, Clause::Group(other)));
        self
    }

    fn start(clause: Clause) -> Self {
        Self {
            clauses: vec![(Conj::And, clause)],
        }
    }

    /// Render to a parameterized SQL fragment and its bound values
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        for (i, (conj, clause)) in self.clauses.iter().enumerate() {
            if i > 0 {
                sql.push_str(conj.as_sql());
            }
            clause.render(&mut sql, &mut params);
        }
        (sql, params)
    }
}
