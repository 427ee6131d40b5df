//! Storage error handling
//!
//! Typed errors for the storage layer. The facade in `store` contains
//! these; nothing below it swallows an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("Failed to open database at '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to create the directory holding the database file
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The operation needs a primary key the table definition lacks
    #[error("Table '{table}' has no primary key column")]
    NoPrimaryKey { table: &'static str },

    /// An update resolved to an empty column set
    #[error("No columns to update for table '{table}'")]
    EmptyUpdate { table: &'static str },

    /// SQLite-level error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
