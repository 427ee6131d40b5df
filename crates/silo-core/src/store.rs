//! CRUD dispatch facade
//!
//! `Store` is the single entry point for structured storage access. It
//! owns one engine (one connection) behind a lock and dispatches every
//! operation to it. The default surface contains every failure: the
//! operation is logged and a neutral value comes back (`None` for
//! single-record queries, an empty `Vec` for list queries, nothing for
//! mutations), so storage trouble never interrupts caller control flow.
//! Callers that need to tell "no data" from "query failed" use the
//! `try_` variants, which return the underlying result.
//!
//! ## Process-wide use
//!
//! Applications normally call [`setup`] once at startup and [`store`]
//! everywhere else. If `setup` is skipped, the first `store` call opens
//! a database with the fallback configuration (`def_db`, version 1).
//!
//! ```ignore
//! silo_core::setup(Some(&data_dir), "app_db", 2, false)?;
//!
//! let store = silo_core::store()?;
//! store.insert(&user);
//! let admins = store.query_all_where::<User>(Filter::cmp("role", Op::Eq, "admin"));
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::Config;
use crate::filter::{Filter, Value};
use crate::record::Record;
use crate::storage::engine::{Engine, EngineConfig};

/// Unified storage facade
///
/// Cheap to clone; clones share the same engine and connection.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    /// The storage engine; one physical connection for the process
    engine: Mutex<Engine>,
    /// Configuration the store was opened with
    config: Config,
}

impl Store {
    /// Open the store using the loaded application configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let path = config.sqlite_path();
        let engine = Engine::open(Self::engine_config(&config), Some(&path))
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        Ok(Self::from_parts(engine, config))
    }

    /// Open an in-memory store (mostly for testing)
    pub fn open_in_memory(config: Config) -> Result<Self> {
        let engine = Engine::open_in_memory(Self::engine_config(&config))
            .context("Failed to open in-memory database")?;
        Ok(Self::from_parts(engine, config))
    }

    fn engine_config(config: &Config) -> EngineConfig {
        EngineConfig::new(&config.db_name, config.db_version)
            .allow_transaction(true)
            .debug(config.debug)
    }

    fn from_parts(engine: Engine, config: Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine: Mutex::new(engine),
                config,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get direct access to the storage engine
    ///
    /// The guard holds the connection lock; keep it short-lived.
    pub fn engine(&self) -> MutexGuard<'_, Engine> {
        self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Engine> {
        // A panic while holding the lock must not wedge every later call
        self.inner.engine.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ==================== Write Operations ====================

    /// Insert a record, containing any failure
    pub fn insert<T: Record>(&self, entity: &T) {
        contained("insert", self.try_insert(entity));
    }

    pub fn try_insert<T: Record>(&self, entity: &T) -> Result<()> {
        self.lock().save(entity).context("Failed to insert record")
    }

    /// Insert a batch of records, containing any failure
    pub fn insert_all<T: Record>(&self, entities: &[T]) {
        contained("insert_all", self.try_insert_all(entities));
    }

    pub fn try_insert_all<T: Record>(&self, entities: &[T]) -> Result<()> {
        self.lock()
            .save_all(entities)
            .context("Failed to insert records")
    }

    /// Insert a record, first deleting whatever the filter matches
    ///
    /// With a filter this is delete-then-insert: the delete is observable
    /// before the insert, and the two steps are NOT wrapped in a
    /// transaction even when transactions are enabled. A failure after
    /// the delete leaves the matched rows gone and the new record absent.
    /// Without a filter it is a plain insert.
    pub fn replace<T: Record>(&self, entity: &T, filter: Option<Filter>) {
        contained("replace", self.try_replace(entity, filter));
    }

    pub fn try_replace<T: Record>(&self, entity: &T, filter: Option<Filter>) -> Result<()> {
        let engine = self.lock();
        if let Some(filter) = filter {
            engine
                .delete_where::<T>(&filter)
                .context("Failed to delete rows being replaced")?;
        }
        engine
            .save(entity)
            .context("Failed to insert replacement record")
    }

    /// Update every non-key field of a record, containing any failure
    pub fn update<T: Record>(&self, entity: &T) {
        contained("update", self.try_update(entity));
    }

    pub fn try_update<T: Record>(&self, entity: &T) -> Result<usize> {
        self.lock().update(entity).context("Failed to update record")
    }

    /// Update only the named columns of a record, containing any failure
    pub fn update_columns<T: Record>(&self, entity: &T, columns: &[&str]) {
        contained("update_columns", self.try_update_columns(entity, columns));
    }

    pub fn try_update_columns<T: Record>(&self, entity: &T, columns: &[&str]) -> Result<usize> {
        self.lock()
            .update_columns(entity, columns)
            .context("Failed to update record columns")
    }

    /// Apply column assignments to every row matching the filter,
    /// containing any failure
    pub fn update_where<T: Record>(&self, filter: Filter, assignments: &[(&str, Value)]) {
        contained("update_where", self.try_update_where::<T>(filter, assignments));
    }

    pub fn try_update_where<T: Record>(
        &self,
        filter: Filter,
        assignments: &[(&str, Value)],
    ) -> Result<usize> {
        self.lock()
            .update_where::<T>(&filter, assignments)
            .context("Failed to update records by filter")
    }

    /// Delete every record of a type, containing any failure
    pub fn delete_all<T: Record>(&self) {
        contained("delete_all", self.try_delete_all::<T>());
    }

    pub fn try_delete_all<T: Record>(&self) -> Result<usize> {
        self.lock()
            .delete_all::<T>()
            .context("Failed to delete records")
    }

    /// Delete every record matching the filter, containing any failure
    pub fn delete_where<T: Record>(&self, filter: Filter) {
        contained("delete_where", self.try_delete_where::<T>(filter));
    }

    pub fn try_delete_where<T: Record>(&self, filter: Filter) -> Result<usize> {
        self.lock()
            .delete_where::<T>(&filter)
            .context("Failed to delete records by filter")
    }

    // ==================== Query Operations ====================

    /// Get the first record of a type; `None` on failure
    pub fn query_first<T: Record>(&self) -> Option<T> {
        contained("query_first", self.try_query_first()).flatten()
    }

    pub fn try_query_first<T: Record>(&self) -> Result<Option<T>> {
        self.lock()
            .find_first()
            .context("Failed to query first record")
    }

    /// Get the first record matching the filter; `None` on failure
    pub fn query_first_where<T: Record>(&self, filter: Filter) -> Option<T> {
        contained("query_first_where", self.try_query_first_where(filter)).flatten()
    }

    pub fn try_query_first_where<T: Record>(&self, filter: Filter) -> Result<Option<T>> {
        self.lock()
            .select::<T>()
            .filter(filter)
            .find_first()
            .context("Failed to query first record by filter")
    }

    /// Get the first matching record, ordered ascending by the column;
    /// `None` on failure
    pub fn query_first_ordered<T: Record>(&self, filter: Filter, column: &str) -> Option<T> {
        contained(
            "query_first_ordered",
            self.try_query_first_ordered(filter, column),
        )
        .flatten()
    }

    pub fn try_query_first_ordered<T: Record>(
        &self,
        filter: Filter,
        column: &str,
    ) -> Result<Option<T>> {
        self.lock()
            .select::<T>()
            .filter(filter)
            .order_by(column, false)
            .find_first()
            .context("Failed to query first ordered record")
    }

    /// Get every record of a type; empty on failure
    pub fn query_all<T: Record>(&self) -> Vec<T> {
        contained("query_all", self.try_query_all()).unwrap_or_default()
    }

    pub fn try_query_all<T: Record>(&self) -> Result<Vec<T>> {
        self.lock()
            .select::<T>()
            .find_all()
            .context("Failed to query records")
    }

    /// Get every record matching the filter; empty on failure
    pub fn query_all_where<T: Record>(&self, filter: Filter) -> Vec<T> {
        contained("query_all_where", self.try_query_all_where(filter)).unwrap_or_default()
    }

    pub fn try_query_all_where<T: Record>(&self, filter: Filter) -> Result<Vec<T>> {
        self.lock()
            .select::<T>()
            .filter(filter)
            .find_all()
            .context("Failed to query records by filter")
    }

    /// Get matching records ordered by a column, capped at `limit` rows;
    /// empty on failure
    ///
    /// The column name and direction are forwarded as-is; a column the
    /// table does not have is a storage failure like any other.
    pub fn query_all_ordered<T: Record>(
        &self,
        filter: Filter,
        column: &str,
        desc: bool,
        limit: u32,
    ) -> Vec<T> {
        contained(
            "query_all_ordered",
            self.try_query_all_ordered(filter, column, desc, limit),
        )
        .unwrap_or_default()
    }

    pub fn try_query_all_ordered<T: Record>(
        &self,
        filter: Filter,
        column: &str,
        desc: bool,
        limit: u32,
    ) -> Result<Vec<T>> {
        self.lock()
            .select::<T>()
            .filter(filter)
            .order_by(column, desc)
            .limit(limit)
            .find_all()
            .context("Failed to query ordered records")
    }
}

/// Log a contained failure and surface only the success value
fn contained<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} failed: {:#}", operation, e);
            None
        }
    }
}

// ==================== Process-wide store ====================

/// Lazily initialized store slot
///
/// Guards first use: at most one store is opened even when many threads
/// race, and every caller observes the same handle afterwards.
pub struct StoreCell {
    slot: RwLock<Option<Store>>,
}

impl StoreCell {
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Get the held store, if one was opened
    pub fn get(&self) -> Option<Store> {
        self.read().clone()
    }

    /// Get the held store, opening one with `open` on first use
    ///
    /// `open` runs at most once process-wide; concurrent callers block
    /// until the winner has finished and then observe its store.
    pub fn get_or_open(&self, open: impl FnOnce() -> Result<Store>) -> Result<Store> {
        if let Some(store) = &*self.read() {
            return Ok(store.clone());
        }

        let mut slot = self.write();
        // Double-check: another thread may have won the race
        if let Some(store) = &*slot {
            return Ok(store.clone());
        }
        let store = open()?;
        *slot = Some(store.clone());
        Ok(store)
    }

    /// Replace the held store; last writer wins
    pub fn replace(&self, store: Store) {
        *self.write() = Some(store);
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Store>> {
        self.slot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Store>> {
        self.slot.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for StoreCell {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: StoreCell = StoreCell::new();

/// Explicit setup entry point; call once at application startup
///
/// When `data_dir` is `None` the call is a no-op and any previously
/// opened store is left untouched, guarding against misconfigured
/// startup. Otherwise the new store replaces whatever the process held:
/// last writer wins. Toggling configurations mid-run is not the intended
/// use; call this once.
pub fn setup(data_dir: Option<&Path>, db_name: &str, db_version: i32, debug: bool) -> Result<()> {
    let Some(data_dir) = data_dir else {
        return Ok(());
    };

    let config = Config {
        data_dir: data_dir.to_path_buf(),
        db_name: db_name.to_string(),
        db_version,
        debug,
    };
    let store = Store::open_with_config(config)?;
    GLOBAL.replace(store);
    Ok(())
}

/// The process-wide store
///
/// Opened on first use with the fallback configuration if [`setup`] was
/// never called.
pub fn store() -> Result<Store> {
    GLOBAL.get_or_open(|| {
        let config = Config::load().unwrap_or_default();
        Store::open_with_config(config)
    })
}
