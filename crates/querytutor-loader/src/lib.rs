//! # QueryTutor Loader
//!
//! Dataset acquisition: reads delimited files into [`Table`]s and JSON
//! files into [`Collection`]s, normalizing values on the way in so the
//! generators downstream never see raw text quirks.
//!
//! - CSV cells are whitespace-trimmed; empty cells and the literal
//!   `NULL` become the null sentinel; numeric-looking text becomes a
//!   number.
//! - JSON documents keep their structure, but string-encoded numbers
//!   are converted to real numbers at every nesting depth.
//!
//! The dataset name is derived from the file stem, so `books.csv`
//! registers as the table `books`.

use querytutor_core::{Collection, Document, Error, Result, Table, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Loads a headed CSV file as a table.
///
/// Rows whose arity differs from the header surface as a CSV error;
/// the table invariant (every row has exactly the declared columns)
/// holds for anything this returns.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let name = dataset_name(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Csv(e.to_string()))?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = Table::new(name, columns);
    for record in reader.records() {
        let record = record.map_err(|e| Error::Csv(e.to_string()))?;
        let row: Vec<Value> = record.iter().map(Value::from_raw).collect();
        table.push_row(row)?;
    }

    info!(table = %table.name, rows = table.len(), "loaded CSV table");
    Ok(table)
}

/// Loads a JSON file holding an array of documents as a collection.
///
/// String-encoded numbers are converted recursively: `"5"` becomes the
/// integer 5 and `"2.5"` the float 2.5, inside nested objects and
/// arrays alike. Unconvertible strings are left as they are.
pub fn load_collection<P: AsRef<Path>>(path: P) -> Result<Collection> {
    let path = path.as_ref();
    let name = dataset_name(path)?;

    let file = File::open(path)?;
    let parsed: serde_json::Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::Json(e.to_string()))?;
    let mut docs = match parsed {
        serde_json::Value::Array(docs) => docs,
        _ => {
            return Err(Error::Json(
                "expected a top-level array of documents".to_string(),
            ))
        }
    };
    for doc in &mut docs {
        coerce_numbers(doc);
    }

    info!(collection = %name, docs = docs.len(), "loaded JSON collection");
    Ok(Collection::new(name, docs))
}

fn dataset_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
}

/// Rewrites string-encoded numbers into numeric values, recursing into
/// nested objects and arrays. Scalars at the top level are untouched.
pub fn coerce_numbers(value: &mut Document) {
    match value {
        serde_json::Value::Object(map) => {
            for slot in map.values_mut() {
                coerce_slot(slot);
            }
        }
        serde_json::Value::Array(items) => {
            for slot in items {
                coerce_slot(slot);
            }
        }
        _ => {}
    }
}

fn coerce_slot(slot: &mut Document) {
    if let serde_json::Value::String(s) = slot {
        if let Some(number) = parse_number(s) {
            *slot = number;
        }
    } else {
        coerce_numbers(slot);
    }
}

fn parse_number(s: &str) -> Option<Document> {
    if s.contains('.') {
        s.parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
    } else {
        s.parse::<i64>().ok().map(serde_json::Value::from)
    }
}
