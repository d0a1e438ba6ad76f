//! # QueryTutor
//!
//! Learn SQL and MongoDB query constructs from your own datasets.
//! QueryTutor loads a CSV table or a JSON document collection into
//! memory, then generates realistic example queries against it, each
//! paired with a natural-language description and the result a real
//! engine would return, simulated directly over the loaded data.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use querytutor::Session;
//!
//! fn main() -> querytutor::Result<()> {
//!     let mut session = Session::new();
//!     let name = session.load("books.csv")?;
//!
//!     // Schema and sample records
//!     if let Some(summary) = session.explore(&name) {
//!         println!("{}", summary);
//!     }
//!
//!     // Example queries with simulated results
//!     for result in session.sample_queries(&name) {
//!         println!("\n{}", result.description);
//!         println!("Query: {}", result.query);
//!         if let Some(output) = &result.output {
//!             println!("Output: {}", output);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Construct mode
//!
//! Asking for a single construct always yields exactly one entry. When
//! the dataset cannot support it (say, `HAVING` on a table with no
//! numeric column), the entry explains why and shows the generalized
//! query shape instead of a concrete instance:
//!
//! ```rust,no_run
//! # let mut session = querytutor::Session::new();
//! # let name = String::from("books");
//! for result in session.queries_by_construct(&name, "having")? {
//!     println!("{}", result.query);
//! }
//! # Ok::<(), querytutor::Error>(())
//! ```

use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

/// Logging configuration
pub mod logging;

// Re-export core types
pub use querytutor_core::generate::{document, relational};
pub use querytutor_core::{
    Collection, Document, DocumentConstruct, Error, Mode, QueryResult, RelationalConstruct,
    Result, Store, Table, Value,
};
pub use querytutor_loader::{load_collection, load_table};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A tutoring session: a dataset store plus the random source that
/// drives parameter selection.
///
/// Each session owns its store, so separate sessions (and separate
/// tests) never share state. The default random source is unseeded;
/// [`Session::with_seed`] makes a session fully reproducible.
pub struct Session {
    store: Store,
    rng: Box<dyn RngCore>,
}

impl Session {
    /// Creates a session with an unseeded random source.
    pub fn new() -> Self {
        Session {
            store: Store::new(),
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Creates a reproducible session: the same seed over the same
    /// datasets generates the same queries.
    pub fn with_seed(seed: u64) -> Self {
        Session {
            store: Store::new(),
            rng: Box::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Loads a dataset, dispatching on the file extension: `.csv`
    /// registers a table, `.json` a collection. Returns the registered
    /// name (the file stem).
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("csv") => self.load_csv(path),
            Some("json") => self.load_json(path),
            other => Err(Error::UnsupportedFormat(
                other.unwrap_or("<no extension>").to_string(),
            )),
        }
    }

    /// Loads a CSV file as a table.
    pub fn load_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let table = querytutor_loader::load_table(path)?;
        let name = table.name.clone();
        self.store.insert_table(table);
        info!(table = %name, "registered table");
        Ok(name)
    }

    /// Loads a JSON file as a document collection.
    pub fn load_json<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let collection = querytutor_loader::load_collection(path)?;
        let name = collection.name.clone();
        self.store.insert_collection(collection);
        info!(collection = %name, "registered collection");
        Ok(name)
    }

    /// Registers an already-built table (useful for in-memory data).
    pub fn register_table(&mut self, table: Table) {
        self.store.insert_table(table);
    }

    /// Registers an already-built collection.
    pub fn register_collection(&mut self, collection: Collection) {
        self.store.insert_collection(collection);
    }

    /// Read access to the dataset store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Renders the schema and up to five sample records of a loaded
    /// dataset, or `None` when nothing is registered under `name`.
    pub fn explore(&self, name: &str) -> Option<String> {
        if let Some(table) = self.store.table(name) {
            Some(render_table(table))
        } else {
            self.store.collection(name).map(render_collection)
        }
    }

    /// Generates a sample-mode batch for the dataset: every construct
    /// the data supports, each with a concrete simulated output.
    pub fn sample_queries(&mut self, name: &str) -> Vec<QueryResult> {
        if self.store.table(name).is_some() {
            relational::generate(&self.store, name, None, Mode::Sample, &mut *self.rng)
        } else if self.store.collection(name).is_some() {
            document::generate(&self.store, name, None, Mode::Sample, &mut *self.rng)
        } else {
            vec![missing_dataset(name)]
        }
    }

    /// Generates a construct-mode batch: exactly one entry for the
    /// named construct, concrete when possible and explanatory when
    /// not. The construct text is parsed against whichever backend the
    /// dataset belongs to.
    pub fn queries_by_construct(&mut self, name: &str, construct: &str) -> Result<Vec<QueryResult>> {
        if self.store.table(name).is_some() {
            let parsed: RelationalConstruct = construct.parse()?;
            Ok(relational::generate(
                &self.store,
                name,
                Some(parsed),
                Mode::Construct,
                &mut *self.rng,
            ))
        } else if self.store.collection(name).is_some() {
            let parsed: DocumentConstruct = construct.parse()?;
            Ok(document::generate(
                &self.store,
                name,
                Some(parsed),
                Mode::Construct,
                &mut *self.rng,
            ))
        } else {
            Ok(vec![missing_dataset(name)])
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_dataset(name: &str) -> QueryResult {
    QueryResult {
        query: format!("Error: no table or collection named '{}' is loaded.", name),
        description: format!("The dataset '{}' has not been loaded.", name),
        output: None,
    }
}

fn render_table(table: &Table) -> String {
    let mut out = format!(
        "Exploring table: {}\nColumns: {}\n\nSample data:\n",
        table.name,
        table.columns.join(", ")
    );
    for row in table.rows.iter().take(5) {
        let record: serde_json::Map<String, serde_json::Value> = table
            .columns
            .iter()
            .zip(row.iter())
            .map(|(col, cell)| (col.clone(), cell.to_json()))
            .collect();
        out.push_str(&serde_json::Value::Object(record).to_string());
        out.push('\n');
    }
    out
}

fn render_collection(collection: &Collection) -> String {
    let mut out = format!("Exploring collection: {}\nAttributes:\n", collection.name);
    if let Some(first) = collection.docs.first() {
        for path in field_paths(first) {
            out.push_str(&path);
            out.push('\n');
        }
    }
    out.push_str("\nSample data:\n");
    for doc in collection.docs.iter().take(5) {
        out.push_str(&doc.to_string());
        out.push('\n');
    }
    out
}

/// Fully qualified field paths of a document, recursing through nested
/// objects (`specs.ram`) and arrays (`tags[0]`).
pub fn field_paths(doc: &Document) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(doc, "", &mut paths);
    paths
}

fn collect_paths(value: &Document, prefix: &str, paths: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_paths(nested, &path, paths);
            }
        }
        serde_json::Value::Array(items) => {
            for (i, nested) in items.iter().enumerate() {
                collect_paths(nested, &format!("{}[{}]", prefix, i), paths);
            }
        }
        _ => paths.push(prefix.to_string()),
    }
}
