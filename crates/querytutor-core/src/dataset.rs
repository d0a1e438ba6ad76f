//! In-memory datasets: tables, document collections, and the store
//! that owns them.

use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::HashMap;

/// A document in a collection. Documents have no fixed schema and may
/// nest arbitrarily, so they are plain JSON values.
pub type Document = serde_json::Value;

/// A tabular dataset: an ordered set of column names and a sequence of
/// rows aligned with that order.
///
/// Every row holds exactly one value per declared column
/// ([`Table::push_row`] enforces the arity). `numeric_columns` is
/// derived data: empty on a freshly loaded table, populated by
/// [`Table::with_inferred_types`](crate::infer).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name, used in generated query text
    pub name: String,
    /// Declared column names, in order
    pub columns: Vec<String>,
    /// Rows, each aligned with `columns`
    pub rows: Vec<Vec<Value>>,
    /// Columns whose values are all numeric, in declared order
    pub numeric_columns: Vec<String>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<S: Into<String>>(name: S, columns: Vec<String>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows: Vec::new(),
            numeric_columns: Vec::new(),
        }
    }

    /// Appends a row, checking it against the declared column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::SchemaMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Index of a column by name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// The cell at `row` for `column`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// All cells of one column, in row order.
    pub fn column_values(&self, column: &str) -> Vec<&Value> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().filter_map(|r| r.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An ordered sequence of schema-less documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Collection name, used in generated query text
    pub name: String,
    /// Documents, in load order
    pub docs: Vec<Document>,
}

impl Collection {
    /// Creates a collection from already-parsed documents.
    pub fn new<S: Into<String>>(name: S, docs: Vec<Document>) -> Self {
        Collection {
            name: name.into(),
            docs,
        }
    }
}

/// Owns every loaded dataset, keyed by name.
///
/// The store is plain owned state: callers create one per session (or
/// per test) and pass it by reference into the generators, which only
/// ever read from it.
#[derive(Debug, Default)]
pub struct Store {
    tables: HashMap<String, Table>,
    collections: HashMap<String, Collection>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, replacing any previous table with the same name.
    pub fn insert_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Registers a collection, replacing any previous one with the same name.
    pub fn insert_collection(&mut self, collection: Collection) {
        self.collections.insert(collection.name.clone(), collection);
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Looks up a collection by name.
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Names of all registered tables.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Names of all registered collections.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }
}
