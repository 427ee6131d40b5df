//! Silo Core Library
//!
//! This crate provides the core functionality for silo, an embedded
//! storage facade over SQLite: typed records, filtered CRUD, and
//! versioned schemas with configurable migration.
//!
//! # Architecture
//!
//! - **store**: the facade applications talk to; one connection, full
//!   CRUD surface, failures contained
//! - **storage**: the SQLite engine underneath, with schema-version
//!   checking on open
//!
//! Records describe their own table; tables are created lazily on first
//! access, and a version bump triggers the configured upgrade policy
//! (destroy-and-recreate by default).
//!
//! # Quick Start
//!
//! ```ignore
//! silo_core::setup(Some(&data_dir), "app_db", 1, false)?;
//!
//! let store = silo_core::store()?;
//! store.insert(&User::new(1, "ada", 36));
//!
//! let adults = store.query_all_where::<User>(Filter::cmp("age", Op::Ge, 18));
//! ```
//!
//! # Modules
//!
//! - `store`: CRUD dispatch facade and process-wide entry points
//! - `record`: entity-to-row binding (`Record`, `TableDef`)
//! - `filter`: condition expressions for filtered operations
//! - `storage`: engine, schema versioning, query builder, errors
//! - `config`: application configuration

pub mod config;
pub mod filter;
pub mod record;
pub mod storage;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::Config;
pub use filter::{Filter, Op, Value};
pub use record::{ColumnDef, Record, SqlType, TableDef};
pub use storage::{Engine, EngineConfig, Selector, StorageError, StorageResult, UpgradePolicy};
pub use store::{setup, store, Store, StoreCell};
