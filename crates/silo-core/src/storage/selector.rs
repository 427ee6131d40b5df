//! Read-side query builder
//!
//! A [`Selector`] accumulates an optional filter, an ordering column and
//! a row limit, then renders a single SELECT when a terminal operation
//! runs. Parameters are forwarded as given; a column name the table does
//! not have surfaces as a database error from the terminal call.

use std::marker::PhantomData;

use rusqlite::params_from_iter;

use crate::filter::{Filter, Value};
use crate::record::{quote_ident, Record};
use crate::storage::engine::Engine;
use crate::storage::error::StorageResult;

/// A pending query against one record table
pub struct Selector<'a, T: Record> {
    engine: &'a Engine,
    filter: Option<Filter>,
    order: Option<(String, bool)>,
    limit: Option<u32>,
    _record: PhantomData<T>,
}

impl<'a, T: Record> Selector<'a, T> {
    pub(crate) fn new(engine: &'a Engine) -> Self {
        Self {
            engine,
            filter: None,
            order: None,
            limit: None,
            _record: PhantomData,
        }
    }

    /// Restrict the result set to rows matching the filter
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Order by a column, descending when `desc` is set
    pub fn order_by(mut self, column: &str, desc: bool) -> Self {
        self.order = Some((column.to_string(), desc));
        self
    }

    /// Cap the number of returned rows
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the query and return the first row, if any
    pub fn find_first(mut self) -> StorageResult<Option<T>> {
        self.limit = Some(1);
        Ok(self.run()?.into_iter().next())
    }

    /// Run the query and return every matching row
    pub fn find_all(self) -> StorageResult<Vec<T>> {
        self.run()
    }

    fn build(&self) -> (String, Vec<Value>) {
        let table = T::table();
        let mut sql = format!(
            "SELECT {} FROM {}",
            table.select_list(),
            quote_ident(table.name)
        );
        let mut params = Vec::new();

        if let Some(filter) = &self.filter {
            let (where_sql, where_params) = filter.to_sql();
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
            params = where_params;
        }
        if let Some((column, desc)) = &self.order {
            sql.push_str(" ORDER BY ");
            sql.push_str(&quote_ident(column));
            if *desc {
                sql.push_str(" DESC");
            }
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, params)
    }

    fn run(&self) -> StorageResult<Vec<T>> {
        self.engine.ensure_table(T::table())?;

        let (sql, params) = self.build();
        self.engine.trace(&sql);

        let mut stmt = self.engine.connection().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| T::from_row(row))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
