//! Storage engine
//!
//! [`Engine`] wraps a single SQLite connection and provides the
//! row-level primitives the facade dispatches to: save, update, delete,
//! find, and the [`Selector`] entry point. Tables are created lazily on
//! first access from each record's table definition, so a schema
//! dropped by migration is rebuilt on the next operation that touches
//! it.
//!
//! The engine is configured once, before open, through [`EngineConfig`]:
//! schema name and version, transaction use for batch writes, statement
//! tracing, an optional table-creation hook, and the [`UpgradePolicy`]
//! that runs when the persisted schema version is older than the
//! configured one.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rusqlite::{params_from_iter, Connection};
use tracing::{debug, warn};

use crate::filter::{Filter, Value};
use crate::record::{quote_ident, Record, TableDef};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema;
use crate::storage::selector::Selector;

/// Hook invoked right after the engine creates a table for the first time
pub type TableCreatedHook = Arc<dyn Fn(&Connection, &TableDef) + Send + Sync>;

/// What to do when the persisted schema version is older than the
/// configured one
///
/// The engine invokes the policy during open; callers never do. A
/// failing run is logged and not propagated, which can leave a
/// half-dropped schema behind. That is the accepted risk of destructive
/// migration.
#[derive(Clone, Default)]
pub enum UpgradePolicy {
    /// Drop every user table; tables are recreated on next access
    #[default]
    DropAndRecreate,
    /// Leave the schema untouched
    Keep,
    /// Caller-supplied migration steps
    Custom(Arc<dyn Fn(&Connection, i32, i32) -> StorageResult<()> + Send + Sync>),
}

impl UpgradePolicy {
    /// Run the policy for an observed version pair
    ///
    /// `DropAndRecreate` destroys the schema only when `new_version` is
    /// strictly greater than `old_version`; equal or lower versions must
    /// never trigger destructive action.
    pub fn run(&self, conn: &Connection, old_version: i32, new_version: i32) {
        match self {
            UpgradePolicy::DropAndRecreate => {
                if new_version <= old_version {
                    return;
                }
                if let Err(e) = schema::drop_all_tables(conn) {
                    warn!(
                        "schema drop for upgrade {} -> {} failed: {}",
                        old_version, new_version, e
                    );
                }
            }
            UpgradePolicy::Keep => {}
            UpgradePolicy::Custom(migrate) => {
                if let Err(e) = migrate(conn, old_version, new_version) {
                    warn!(
                        "custom migration {} -> {} failed: {}",
                        old_version, new_version, e
                    );
                }
            }
        }
    }
}

impl fmt::Debug for UpgradePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradePolicy::DropAndRecreate => write!(f, "DropAndRecreate"),
            UpgradePolicy::Keep => write!(f, "Keep"),
            UpgradePolicy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Immutable engine configuration
///
/// Assembled once with chainable setters, then handed to
/// [`Engine::open`]. Construction cannot fail; inputs are taken as-is.
#[derive(Clone)]
pub struct EngineConfig {
    name: String,
    version: i32,
    allow_transaction: bool,
    debug: bool,
    on_table_created: Option<TableCreatedHook>,
    upgrade_policy: UpgradePolicy,
}

impl EngineConfig {
    pub fn new(name: impl Into<String>, version: i32) -> Self {
        Self {
            name: name.into(),
            version,
            allow_transaction: false,
            debug: false,
            on_table_created: None,
            upgrade_policy: UpgradePolicy::default(),
        }
    }

    /// Wrap batch inserts in a transaction
    pub fn allow_transaction(mut self, allow: bool) -> Self {
        self.allow_transaction = allow;
        self
    }

    /// Trace every statement at debug level
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Register a hook fired when the engine creates a table
    pub fn on_table_created(
        mut self,
        hook: impl Fn(&Connection, &TableDef) + Send + Sync + 'static,
    ) -> Self {
        self.on_table_created = Some(Arc::new(hook));
        self
    }

    /// Select the migration strategy for version upgrades
    pub fn upgrade_policy(mut self, policy: UpgradePolicy) -> Self {
        self.upgrade_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> i32 {
        self.version
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("allow_transaction", &self.allow_transaction)
            .field("debug", &self.debug)
            .field("on_table_created", &self.on_table_created.is_some())
            .field("upgrade_policy", &self.upgrade_policy)
            .finish()
    }
}

/// SQLite-backed storage engine
///
/// Owns the connection for its whole lifetime; there is no explicit
/// teardown beyond drop.
pub struct Engine {
    conn: Connection,
    config: EngineConfig,
    /// Tables verified to exist on this connection
    created_tables: RefCell<HashSet<&'static str>>,
}

impl Engine {
    /// Open a database at the given path, or in memory when `path` is
    /// `None`
    ///
    /// Opening checks the persisted schema version against the
    /// configured one and runs the upgrade policy when the database is
    /// older.
    pub fn open(config: EngineConfig, path: Option<&Path>) -> StorageResult<Self> {
        let conn = match path {
            Some(p) => {
                if let Some(parent) = p.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StorageError::CreateDirectory {
                            path: parent.to_path_buf(),
                            source: e,
                        }
                    })?;
                }
                Connection::open(p).map_err(|e| StorageError::Open {
                    path: p.to_path_buf(),
                    source: e,
                })?
            }
            None => Connection::open_in_memory().map_err(|e| StorageError::Open {
                path: ":memory:".into(),
                source: e,
            })?,
        };

        let engine = Engine {
            conn,
            config,
            created_tables: RefCell::new(HashSet::new()),
        };
        engine.configure(path.is_some())?;
        engine.check_version()?;
        Ok(engine)
    }

    /// Open an in-memory database (mostly for testing)
    pub fn open_in_memory(config: EngineConfig) -> StorageResult<Self> {
        Self::open(config, None)
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn configure(&self, file_backed: bool) -> StorageResult<()> {
        // WAL only applies to file-backed databases
        if file_backed {
            let _: String = self
                .conn
                .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        }
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// Compare the persisted schema version with the configured one and
    /// migrate if the database is older
    fn check_version(&self) -> StorageResult<()> {
        schema::init_version_table(&self.conn)?;
        let configured = self.config.version;

        match schema::read_version(&self.conn)? {
            None => schema::write_version(&self.conn, configured)?,
            Some(stored) if stored < configured => {
                debug!(
                    "upgrading schema of '{}' from version {} to {}",
                    self.config.name, stored, configured
                );
                self.config
                    .upgrade_policy
                    .run(&self.conn, stored, configured);
                // DropAndRecreate removes the bookkeeping table as well
                schema::init_version_table(&self.conn)?;
                schema::write_version(&self.conn, configured)?;
            }
            Some(stored) if stored > configured => {
                warn!(
                    "database '{}' has schema version {}, newer than configured {}; leaving it untouched",
                    self.config.name, stored, configured
                );
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Create the record's table if this connection has not seen it yet
    pub(crate) fn ensure_table(&self, table: &'static TableDef) -> StorageResult<()> {
        if self.created_tables.borrow().contains(table.name) {
            return Ok(());
        }

        if !schema::table_exists(&self.conn, table.name)? {
            let sql = table.create_sql();
            self.trace(&sql);
            self.conn.execute_batch(&sql)?;
            if let Some(hook) = &self.config.on_table_created {
                hook(&self.conn, table);
            }
        }

        self.created_tables.borrow_mut().insert(table.name);
        Ok(())
    }

    pub(crate) fn trace(&self, sql: &str) {
        if self.config.debug {
            debug!("sql: {}", sql);
        }
    }

    // ==================== Write Primitives ====================

    /// Insert one record
    pub fn save<T: Record>(&self, entity: &T) -> StorageResult<()> {
        let table = T::table();
        self.ensure_table(table)?;

        let row = entity.to_row();
        let sql = insert_sql(table.name, &row);
        self.trace(&sql);
        self.conn
            .execute(&sql, params_from_iter(row.iter().map(|(_, v)| v)))?;
        Ok(())
    }

    /// Insert a batch of records
    ///
    /// Runs inside a single transaction when the configuration allows
    /// transactions; otherwise each row is its own statement.
    pub fn save_all<T: Record>(&self, entities: &[T]) -> StorageResult<()> {
        let Some(first) = entities.first() else {
            return Ok(());
        };
        let table = T::table();
        self.ensure_table(table)?;

        let sql = insert_sql(table.name, &first.to_row());
        self.trace(&sql);

        if self.config.allow_transaction {
            let tx = self.conn.unchecked_transaction()?;
            {
                let mut stmt = tx.prepare_cached(&sql)?;
                for entity in entities {
                    let row = entity.to_row();
                    stmt.execute(params_from_iter(row.iter().map(|(_, v)| v)))?;
                }
            }
            tx.commit()?;
        } else {
            let mut stmt = self.conn.prepare_cached(&sql)?;
            for entity in entities {
                let row = entity.to_row();
                stmt.execute(params_from_iter(row.iter().map(|(_, v)| v)))?;
            }
        }
        Ok(())
    }

    /// Update every non-key column of a record, matched by primary key
    pub fn update<T: Record>(&self, entity: &T) -> StorageResult<usize> {
        self.update_row(entity, None)
    }

    /// Update only the named columns of a record, matched by primary key
    ///
    /// Columns not present on the record are ignored.
    pub fn update_columns<T: Record>(&self, entity: &T, columns: &[&str]) -> StorageResult<usize> {
        self.update_row(entity, Some(columns))
    }

    fn update_row<T: Record>(&self, entity: &T, columns: Option<&[&str]>) -> StorageResult<usize> {
        let table = T::table();
        self.ensure_table(table)?;

        let key = table.primary_key().ok_or(StorageError::NoPrimaryKey {
            table: table.name,
        })?;

        let row = entity.to_row();
        let key_value = row
            .iter()
            .find(|(name, _)| *name == key.name)
            .map(|(_, v)| v.clone())
            .ok_or(StorageError::NoPrimaryKey { table: table.name })?;

        let mut assignments = Vec::new();
        let mut params = Vec::new();
        for (name, value) in row {
            if name == key.name {
                continue;
            }
            if let Some(selected) = columns {
                if !selected.contains(&name) {
                    continue;
                }
            }
            assignments.push(format!("{} = ?", quote_ident(name)));
            params.push(value);
        }
        if assignments.is_empty() {
            return Err(StorageError::EmptyUpdate { table: table.name });
        }
        params.push(key_value);

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_ident(table.name),
            assignments.join(", "),
            quote_ident(key.name)
        );
        self.trace(&sql);
        let changed = self.conn.execute(&sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }

    /// Apply column assignments to every row matching the filter
    pub fn update_where<T: Record>(
        &self,
        filter: &Filter,
        assignments: &[(&str, Value)],
    ) -> StorageResult<usize> {
        let table = T::table();
        self.ensure_table(table)?;

        if assignments.is_empty() {
            return Err(StorageError::EmptyUpdate { table: table.name });
        }

        let set_list: Vec<String> = assignments
            .iter()
            .map(|(name, _)| format!("{} = ?", quote_ident(name)))
            .collect();
        let (where_sql, where_params) = filter.to_sql();

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            quote_ident(table.name),
            set_list.join(", "),
            where_sql
        );
        self.trace(&sql);
        let params = assignments
            .iter()
            .map(|(_, v)| v)
            .chain(where_params.iter());
        let changed = self.conn.execute(&sql, params_from_iter(params))?;
        Ok(changed)
    }

    /// Delete every row of the record's table
    pub fn delete_all<T: Record>(&self) -> StorageResult<usize> {
        let table = T::table();
        self.ensure_table(table)?;

        let sql = format!("DELETE FROM {}", quote_ident(table.name));
        self.trace(&sql);
        let changed = self.conn.execute(&sql, [])?;
        Ok(changed)
    }

    /// Delete every row matching the filter
    pub fn delete_where<T: Record>(&self, filter: &Filter) -> StorageResult<usize> {
        let table = T::table();
        self.ensure_table(table)?;

        let (where_sql, where_params) = filter.to_sql();
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            quote_ident(table.name),
            where_sql
        );
        self.trace(&sql);
        let changed = self
            .conn
            .execute(&sql, params_from_iter(where_params.iter()))?;
        Ok(changed)
    }

    /// Drop every user table
    ///
    /// Version bookkeeping is re-stamped with the configured version;
    /// record tables are recreated lazily on next access.
    pub fn drop_schema(&self) -> StorageResult<()> {
        schema::drop_all_tables(&self.conn)?;
        self.created_tables.borrow_mut().clear();
        schema::init_version_table(&self.conn)?;
        schema::write_version(&self.conn, self.config.version)?;
        Ok(())
    }

    // ==================== Read Primitives ====================

    /// Get the first row of the record's table, if any
    pub fn find_first<T: Record>(&self) -> StorageResult<Option<T>> {
        self.select::<T>().find_first()
    }

    /// Start a query against the record's table
    pub fn select<T: Record>(&self) -> Selector<'_, T> {
        Selector::new(self)
    }
}

fn insert_sql(table: &str, row: &[(&'static str, Value)]) -> String {
    let columns: Vec<String> = row.iter().map(|(name, _)| quote_ident(name)).collect();
    let placeholders: Vec<&str> = row.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Op;
    use crate::testutil::{Counter, Session, User};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn memory_engine() -> Engine {
        Engine::open_in_memory(EngineConfig::new("test_db", 1)).unwrap()
    }

    #[test]
    fn test_fresh_database_stamps_version() {
        let engine = Engine::open_in_memory(EngineConfig::new("test_db", 7)).unwrap();
        assert_eq!(
            schema::read_version(engine.connection()).unwrap(),
            Some(7)
        );
    }

    #[test]
    fn test_save_and_find_first() {
        let engine = memory_engine();

        assert!(engine.find_first::<User>().unwrap().is_none());

        engine.save(&User::new(1, "ada", 36)).unwrap();
        let found = engine.find_first::<User>().unwrap().unwrap();
        assert_eq!(found.id, 1);
        assert_eq!(found.name, "ada");
    }

    #[test]
    fn test_save_all_batch() {
        let engine = Engine::open_in_memory(
            EngineConfig::new("test_db", 1).allow_transaction(true),
        )
        .unwrap();

        let users: Vec<User> = (0..100).map(|i| User::new(i, format!("u{}", i), 20)).collect();
        engine.save_all(&users).unwrap();

        assert_eq!(engine.select::<User>().find_all().unwrap().len(), 100);
    }

    #[test]
    fn test_save_all_without_transactions() {
        let engine = memory_engine();
        engine
            .save_all(&[User::new(1, "a", 1), User::new(2, "b", 2)])
            .unwrap();
        assert_eq!(engine.select::<User>().find_all().unwrap().len(), 2);
    }

    #[test]
    fn test_save_all_empty_is_noop() {
        let engine = memory_engine();
        engine.save_all::<User>(&[]).unwrap();
    }

    #[test]
    fn test_update_all_fields() {
        let engine = memory_engine();
        let mut user = User::new(1, "ada", 36);
        engine.save(&user).unwrap();

        user.name = "lovelace".to_string();
        user.age = 37;
        let changed = engine.update(&user).unwrap();
        assert_eq!(changed, 1);

        let found = engine.find_first::<User>().unwrap().unwrap();
        assert_eq!(found.name, "lovelace");
        assert_eq!(found.age, 37);
    }

    #[test]
    fn test_update_selected_columns() {
        let engine = memory_engine();
        let mut user = User::new(1, "ada", 36);
        engine.save(&user).unwrap();

        user.name = "ignored".to_string();
        user.age = 99;
        engine.update_columns(&user, &["age"]).unwrap();

        let found = engine.find_first::<User>().unwrap().unwrap();
        assert_eq!(found.name, "ada");
        assert_eq!(found.age, 99);
    }

    #[test]
    fn test_update_without_primary_key_fails() {
        let engine = memory_engine();
        let err = engine
            .update(&Counter {
                label: "hits".to_string(),
                hits: 1,
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::NoPrimaryKey { table: "counters" }));
    }

    #[test]
    fn test_update_with_empty_column_set_fails() {
        let engine = memory_engine();
        let user = User::new(1, "ada", 36);
        engine.save(&user).unwrap();

        let err = engine.update_columns(&user, &["nonexistent"]).unwrap_err();
        assert!(matches!(err, StorageError::EmptyUpdate { .. }));
    }

    #[test]
    fn test_update_where() {
        let engine = memory_engine();
        engine.save(&User::new(1, "ada", 36)).unwrap();
        engine.save(&User::new(2, "grace", 45)).unwrap();

        let changed = engine
            .update_where::<User>(
                &Filter::cmp("age", Op::Gt, 40),
                &[("vip", Value::from(true))],
            )
            .unwrap();
        assert_eq!(changed, 1);

        let vips = engine
            .select::<User>()
            .filter(Filter::cmp("vip", Op::Eq, true))
            .find_all()
            .unwrap();
        assert_eq!(vips.len(), 1);
        assert_eq!(vips[0].name, "grace");
    }

    #[test]
    fn test_delete_all_and_delete_where() {
        let engine = memory_engine();
        for i in 0..5 {
            engine.save(&User::new(i, format!("u{}", i), 20 + i)).unwrap();
        }

        let deleted = engine
            .delete_where::<User>(&Filter::cmp("age", Op::Ge, 23))
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(engine.select::<User>().find_all().unwrap().len(), 3);

        let deleted = engine.delete_all::<User>().unwrap();
        assert_eq!(deleted, 3);
        assert!(engine.find_first::<User>().unwrap().is_none());
    }

    #[test]
    fn test_table_created_hook_fires_once() {
        static CREATED: AtomicUsize = AtomicUsize::new(0);
        CREATED.store(0, Ordering::SeqCst);

        let engine = Engine::open_in_memory(
            EngineConfig::new("test_db", 1)
                .on_table_created(|_, table| {
                    assert_eq!(table.name, "users");
                    CREATED.fetch_add(1, Ordering::SeqCst);
                }),
        )
        .unwrap();

        engine.save(&User::new(1, "a", 1)).unwrap();
        engine.save(&User::new(2, "b", 2)).unwrap();
        assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_schema_recreates_on_next_access() {
        let engine = memory_engine();
        engine.save(&User::new(1, "ada", 36)).unwrap();
        engine.save(&Session::new(1)).unwrap();

        engine.drop_schema().unwrap();
        assert!(!schema::table_exists(engine.connection(), "users").unwrap());
        assert_eq!(
            schema::read_version(engine.connection()).unwrap(),
            Some(1)
        );

        // Next access rebuilds the table, empty
        assert!(engine.find_first::<User>().unwrap().is_none());
        assert!(schema::table_exists(engine.connection(), "users").unwrap());
    }

    #[test]
    fn test_upgrade_policy_drops_only_on_version_increase() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE items (id INTEGER PRIMARY KEY)")
            .unwrap();

        // Equal and lower versions must not destroy anything
        UpgradePolicy::DropAndRecreate.run(&conn, 2, 2);
        assert!(schema::table_exists(&conn, "items").unwrap());
        UpgradePolicy::DropAndRecreate.run(&conn, 2, 1);
        assert!(schema::table_exists(&conn, "items").unwrap());

        // A real upgrade destroys the schema
        UpgradePolicy::DropAndRecreate.run(&conn, 1, 2);
        assert!(!schema::table_exists(&conn, "items").unwrap());
    }

    #[test]
    fn test_keep_policy_never_drops() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE items (id INTEGER PRIMARY KEY)")
            .unwrap();

        UpgradePolicy::Keep.run(&conn, 1, 2);
        assert!(schema::table_exists(&conn, "items").unwrap());
    }

    #[test]
    fn test_custom_policy_receives_version_pair() {
        static SEEN: AtomicUsize = AtomicUsize::new(0);
        SEEN.store(0, Ordering::SeqCst);

        let policy = UpgradePolicy::Custom(Arc::new(|_conn: &Connection, old, new| {
            assert_eq!((old, new), (1, 3));
            SEEN.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        let conn = Connection::open_in_memory().unwrap();
        policy.run(&conn, 1, 3);
        assert_eq!(SEEN.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reopen_with_higher_version_migrates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.db");

        {
            let engine = Engine::open(EngineConfig::new("app", 1), Some(&path)).unwrap();
            engine.save(&User::new(1, "ada", 36)).unwrap();
        }

        // Reopen one version up: default policy drops the old data
        {
            let engine = Engine::open(EngineConfig::new("app", 2), Some(&path)).unwrap();
            assert!(engine.find_first::<User>().unwrap().is_none());
            assert_eq!(
                schema::read_version(engine.connection()).unwrap(),
                Some(2)
            );
        }
    }

    #[test]
    fn test_reopen_with_keep_policy_preserves_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.db");

        {
            let engine = Engine::open(EngineConfig::new("app", 1), Some(&path)).unwrap();
            engine.save(&User::new(1, "ada", 36)).unwrap();
        }

        {
            let engine = Engine::open(
                EngineConfig::new("app", 2).upgrade_policy(UpgradePolicy::Keep),
                Some(&path),
            )
            .unwrap();
            assert!(engine.find_first::<User>().unwrap().is_some());
            assert_eq!(
                schema::read_version(engine.connection()).unwrap(),
                Some(2)
            );
        }
    }

    #[test]
    fn test_reopen_with_lower_version_is_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.db");

        {
            let engine = Engine::open(EngineConfig::new("app", 5), Some(&path)).unwrap();
            engine.save(&User::new(1, "ada", 36)).unwrap();
        }

        // Downgrade: no destruction, stored version stays
        {
            let engine = Engine::open(EngineConfig::new("app", 3), Some(&path)).unwrap();
            assert!(engine.find_first::<User>().unwrap().is_some());
            assert_eq!(
                schema::read_version(engine.connection()).unwrap(),
                Some(5)
            );
        }
    }

    #[test]
    fn test_reopen_same_version_preserves_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.db");

        {
            let engine = Engine::open(EngineConfig::new("app", 1), Some(&path)).unwrap();
            engine.save(&User::new(1, "ada", 36)).unwrap();
        }

        {
            let engine = Engine::open(EngineConfig::new("app", 1), Some(&path)).unwrap();
            assert!(engine.find_first::<User>().unwrap().is_some());
        }
    }

    #[test]
    fn test_duplicate_primary_key_is_an_error() {
        let engine = memory_engine();
        engine.save(&User::new(1, "ada", 36)).unwrap();
        assert!(engine.save(&User::new(1, "again", 1)).is_err());
    }
}
