//! Entity-to-row binding
//!
//! A type becomes storable by implementing [`Record`]: a static
//! [`TableDef`] naming its table and columns, plus conversions between
//! the value and a database row. The storage layer derives everything
//! else from the definition: DDL for lazy table creation, the select
//! list, and the primary-key lookup used by updates.
//!
//! ```ignore
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! static USER_TABLE: TableDef = TableDef {
//!     name: "users",
//!     columns: &[
//!         ColumnDef::primary_key("id", SqlType::Integer),
//!         ColumnDef::new("name", SqlType::Text).not_null(),
//!     ],
//! };
//!
//! impl Record for User {
//!     fn table() -> &'static TableDef {
//!         &USER_TABLE
//!     }
//!
//!     fn to_row(&self) -> Vec<(&'static str, Value)> {
//!         vec![("id", self.id.into()), ("name", self.name.as_str().into())]
//!     }
//!
//!     fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
//!         Ok(Self { id: row.get(0)?, name: row.get(1)? })
//!     }
//! }
//! ```

use rusqlite::Row;

use crate::filter::Value;

/// SQLite storage class for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
    Blob,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
        }
    }
}

/// A single column in a table definition
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    pub not_null: bool,
}

impl ColumnDef {
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            not_null: false,
        }
    }

    pub const fn primary_key(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            primary_key: true,
            not_null: false,
        }
    }

    pub const fn not_null(self) -> Self {
        Self {
            not_null: true,
            ..self
        }
    }
}

/// Static table binding for a record type
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// The primary-key column, if the definition declares one
    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// DDL creating the table if it does not exist yet
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut sql = format!("{} {}", quote_ident(c.name), c.sql_type.as_sql());
                if c.primary_key {
                    sql.push_str(" PRIMARY KEY");
                }
                if c.not_null {
                    sql.push_str(" NOT NULL");
                }
                sql
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(self.name),
            columns.join(", ")
        )
    }

    /// Quoted column list in definition order, for SELECT statements
    pub(crate) fn select_list(&self) -> String {
        let names: Vec<String> = self.columns.iter().map(|c| quote_ident(c.name)).collect();
        names.join(", ")
    }
}

/// A value that maps to a table row
///
/// `to_row` must yield the same column set, in the same order, for every
/// value of the type; batch inserts prepare one statement from the first
/// row and bind the rest through it. `from_row` receives columns in
/// definition order.
pub trait Record: Sized {
    /// Static table binding for this type
    fn table() -> &'static TableDef;

    /// Column-value pairs for the full row, including the primary key
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Rebuild a value from a database row
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Quote an identifier for direct inclusion in a statement
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
