//! # QueryTutor Core
//!
//! Data model, type inference, and query-construct generators for
//! QueryTutor. This crate is the algorithmic core: it owns no I/O and
//! no global state. Callers load datasets into a [`Store`], then ask a
//! generator for a batch of example queries:
//!
//! ```rust
//! use querytutor_core::{generate, Mode, Store, Table, Value};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut table = Table::new("books", vec!["title".into(), "price".into()]);
//! table.push_row(vec![Value::Text("Dune".into()), Value::Integer(12)])?;
//! table.push_row(vec![Value::Text("Hyperion".into()), Value::Integer(9)])?;
//!
//! let mut store = Store::new();
//! store.insert_table(table);
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! for result in generate::relational::generate(&store, "books", None, Mode::Sample, &mut rng) {
//!     println!("{}\n{}", result.description, result.query);
//! }
//! # Ok::<(), querytutor_core::Error>(())
//! ```
//!
//! Every result in sample mode carries a simulated output: the value a
//! real engine would have returned, computed directly over the
//! in-memory rows or documents.

/// Error types
pub mod error;

/// Tables, collections, and the dataset store
pub mod dataset;

/// Column type inference
pub mod infer;

/// Scalar cell values
pub mod value;

/// Query-construct generators
pub mod generate;

// Re-export main types
pub use dataset::{Collection, Document, Store, Table};
pub use error::{Error, Result};
pub use generate::{DocumentConstruct, Mode, QueryResult, RelationalConstruct};
pub use value::Value;
