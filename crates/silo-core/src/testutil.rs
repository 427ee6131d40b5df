//! Shared test fixtures
//!
//! Small record types used across the storage and store test suites.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use crate::filter::Value;
use crate::record::{ColumnDef, Record, SqlType, TableDef};

/// A user row with a numeric primary key
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub vip: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            vip: false,
            created_at: Utc::now(),
        }
    }
}

static USER_TABLE: TableDef = TableDef {
    name: "users",
    columns: &[
        ColumnDef::primary_key("id", SqlType::Integer),
        ColumnDef::new("name", SqlType::Text).not_null(),
        ColumnDef::new("age", SqlType::Integer).not_null(),
        ColumnDef::new("vip", SqlType::Integer).not_null(),
        ColumnDef::new("created_at", SqlType::Integer).not_null(),
    ],
};

impl Record for User {
    fn table() -> &'static TableDef {
        &USER_TABLE
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.as_str().into()),
            ("age", self.age.into()),
            ("vip", self.vip.into()),
            ("created_at", self.created_at.timestamp_millis().into()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            vip: row.get::<_, i64>(3)? != 0,
            created_at: DateTime::from_timestamp_millis(row.get(4)?).unwrap_or_else(Utc::now),
        })
    }
}

/// A session row keyed by a generated token
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
        }
    }
}

static SESSION_TABLE: TableDef = TableDef {
    name: "sessions",
    columns: &[
        ColumnDef::primary_key("token", SqlType::Text),
        ColumnDef::new("user_id", SqlType::Integer).not_null(),
    ],
};

impl Record for Session {
    fn table() -> &'static TableDef {
        &SESSION_TABLE
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("token", self.token.as_str().into()),
            ("user_id", self.user_id.into()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            token: row.get(0)?,
            user_id: row.get(1)?,
        })
    }
}

/// A table with no primary key, for the update error paths
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub label: String,
    pub hits: i64,
}

static COUNTER_TABLE: TableDef = TableDef {
    name: "counters",
    columns: &[
        ColumnDef::new("label", SqlType::Text).not_null(),
        ColumnDef::new("hits", SqlType::Integer).not_null(),
    ],
};

impl Record for Counter {
    fn table() -> &'static TableDef {
        &COUNTER_TABLE
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("label", self.label.as_str().into()),
            ("hits", self.hits.into()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            label: row.get(0)?,
            hits: row.get(1)?,
        })
    }
}
