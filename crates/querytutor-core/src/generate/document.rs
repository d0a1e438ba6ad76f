//! Construct generator for document collections.
//!
//! Generates MongoDB-shell-flavored example queries over a named
//! collection. Field classification samples the first document only:
//! a deliberate approximation carried over from the system this
//! library models, not full-collection inference.

use super::{assemble, json_number, Mode, QueryResult};
use crate::dataset::{Document, Store};
use crate::error::Error;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The document query constructs, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentConstruct {
    Find,
    Projection,
    Criteria,
    Conditions,
    Match,
    GroupSum,
    SortLimit,
}

impl DocumentConstruct {
    /// Every construct, in the order a full batch evaluates them.
    pub const ALL: [DocumentConstruct; 7] = [
        DocumentConstruct::Find,
        DocumentConstruct::Projection,
        DocumentConstruct::Criteria,
        DocumentConstruct::Conditions,
        DocumentConstruct::Match,
        DocumentConstruct::GroupSum,
        DocumentConstruct::SortLimit,
    ];

    /// Display label used in placeholder descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentConstruct::Find => "FIND",
            DocumentConstruct::Projection => "PROJECTION",
            DocumentConstruct::Criteria => "CRITERIA",
            DocumentConstruct::Conditions => "CONDITIONS",
            DocumentConstruct::Match => "MATCH",
            DocumentConstruct::GroupSum => "GROUP",
            DocumentConstruct::SortLimit => "SORT/LIMIT",
        }
    }

    /// The generalized, unparameterized form shown when no concrete
    /// instance exists.
    pub fn template(&self) -> &'static str {
        match self {
            DocumentConstruct::Find => "db.collection.find({});",
            DocumentConstruct::Projection => {
                "db.collection.find({}, { field1: 1, field2: 1, _id: 0 });"
            }
            DocumentConstruct::Criteria => {
                "db.collection.find({ numeric_field: { $gt: value } });"
            }
            DocumentConstruct::Conditions => {
                "db.collection.find({ numeric_field: { $gt: value }, \
                 non_numeric_field: 'value' });"
            }
            DocumentConstruct::Match => {
                "db.collection.aggregate([ { $match: { numeric_field: \
                 { $gte: lower, $lte: upper } } } ]);"
            }
            DocumentConstruct::GroupSum => {
                "db.collection.aggregate([ { $group: { _id: '$field', \
                 total: { $sum: '$numeric_field' } } } ]);"
            }
            DocumentConstruct::SortLimit => {
                "db.collection.aggregate([ { $sort: { field: 1 } }, \
                 { $limit: number } ]);"
            }
        }
    }
}

impl fmt::Display for DocumentConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DocumentConstruct {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "find" => Ok(DocumentConstruct::Find),
            "projection" => Ok(DocumentConstruct::Projection),
            "criteria" => Ok(DocumentConstruct::Criteria),
            "conditions" => Ok(DocumentConstruct::Conditions),
            "match" => Ok(DocumentConstruct::Match),
            "group" | "sum" | "group sum" => Ok(DocumentConstruct::GroupSum),
            "sort" | "limit" | "sort limit" => Ok(DocumentConstruct::SortLimit),
            other => Err(Error::UnknownConstruct(other.to_string())),
        }
    }
}

/// Field names split by the type of their first-document value.
struct FieldInfo {
    keys: Vec<String>,
    numeric: Vec<String>,
    non_numeric: Vec<String>,
}

impl FieldInfo {
    fn from_first(docs: &[Document]) -> FieldInfo {
        let mut info = FieldInfo {
            keys: Vec::new(),
            numeric: Vec::new(),
            non_numeric: Vec::new(),
        };
        if let Some(first) = docs.first().and_then(Document::as_object) {
            for (key, value) in first {
                info.keys.push(key.clone());
                if value.is_number() {
                    info.numeric.push(key.clone());
                } else {
                    info.non_numeric.push(key.clone());
                }
            }
        }
        info
    }
}

/// Generates example queries for a registered collection.
///
/// A missing or empty collection yields a single explanatory result in
/// either mode; otherwise the behavior mirrors
/// [`relational::generate`](super::relational::generate).
pub fn generate<R: Rng + ?Sized>(
    store: &Store,
    collection_name: &str,
    construct: Option<DocumentConstruct>,
    mode: Mode,
    rng: &mut R,
) -> Vec<QueryResult> {
    let collection = match store.collection(collection_name) {
        Some(c) if !c.docs.is_empty() => c,
        _ => {
            return vec![QueryResult {
                query: "Error: Collection does not exist or is empty.".to_string(),
                description: "Collection does not exist or is empty.".to_string(),
                output: None,
            }];
        }
    };

    let docs = &collection.docs;
    let fields = FieldInfo::from_first(docs);

    let targets: Vec<DocumentConstruct> = match construct {
        Some(c) => vec![c],
        None => DocumentConstruct::ALL.to_vec(),
    };

    let mut results = Vec::with_capacity(targets.len());
    for c in targets {
        let candidate = match c {
            DocumentConstruct::Find => Ok(find(&collection.name, docs)),
            DocumentConstruct::Projection => projection(&collection.name, docs, &fields, rng),
            DocumentConstruct::Criteria => criteria(&collection.name, docs, &fields, rng),
            DocumentConstruct::Conditions => conditions(&collection.name, docs, &fields, rng),
            DocumentConstruct::Match => match_range(&collection.name, docs, &fields, rng),
            DocumentConstruct::GroupSum => group_sum(&collection.name, docs, &fields, rng),
            DocumentConstruct::SortLimit => sort_limit(&collection.name, docs, &fields, rng),
        };
        match candidate {
            Ok(result) => results.push(result),
            Err(reason) => {
                debug!(collection = %collection.name, construct = %c, %reason, "construct not applicable");
                if mode == Mode::Construct {
                    results.push(QueryResult::placeholder(c.label(), c.template(), &reason));
                }
            }
        }
    }

    assemble(mode, results)
}

fn find(name: &str, docs: &[Document]) -> QueryResult {
    let sample: Vec<Document> = docs.iter().take(5).cloned().collect();
    QueryResult::simulated(
        format!("db.{}.find({{}})", name),
        format!("Find all documents in the {} collection.", name),
        json!(sample),
    )
}

fn projection<R: Rng + ?Sized>(
    name: &str,
    docs: &[Document],
    fields: &FieldInfo,
    rng: &mut R,
) -> Result<QueryResult, String> {
    if fields.keys.is_empty() {
        return Err("there are no fields in the collection".to_string());
    }
    let count = fields.keys.len().min(2);
    let selected: Vec<&String> = fields.keys.choose_multiple(rng, count).collect();

    let output: Vec<serde_json::Value> = docs
        .iter()
        .take(5)
        .map(|doc| {
            let projected: serde_json::Map<String, serde_json::Value> = selected
                .iter()
                .map(|field| {
                    let value = doc.get(field.as_str()).cloned().unwrap_or(json!(null));
                    ((*field).clone(), value)
                })
                .collect();
            serde_json::Value::Object(projected)
        })
        .collect();

    let spec = selected
        .iter()
        .map(|f| format!("{}: 1", f))
        .collect::<Vec<_>>()
        .join(", ");
    let listing = selected
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(QueryResult::simulated(
        format!("db.{}.find({{}}, {{ {}, _id: 0 }})", name, spec),
        format!("Find all documents and display only {}.", listing),
        json!(output),
    ))
}

fn criteria<R: Rng + ?Sized>(
    name: &str,
    docs: &[Document],
    fields: &FieldInfo,
    rng: &mut R,
) -> Result<QueryResult, String> {
    let field = fields
        .numeric
        .choose(rng)
        .ok_or_else(|| "there are no numeric fields in the collection".to_string())?;
    let values = numeric_field_values(docs, field);
    if values.is_empty() {
        return Err("no numeric values exist in the field".to_string());
    }
    let (min, max) = int_bounds(&values);
    let threshold = draw_in(rng, min, max - 1);

    let output: Vec<Document> = docs
        .iter()
        .filter(|doc| {
            doc.get(field.as_str())
                .and_then(serde_json::Value::as_f64)
                .map(|v| v > threshold as f64)
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    Ok(QueryResult::simulated(
        format!("db.{}.find({{ {}: {{ $gt: {} }} }})", name, field, threshold),
        format!("Find documents where {} is greater than {}.", field, threshold),
        json!(output),
    ))
}

fn conditions<R: Rng + ?Sized>(
    name: &str,
    docs: &[Document],
    fields: &FieldInfo,
    rng: &mut R,
) -> Result<QueryResult, String> {
    if fields.numeric.is_empty() || fields.non_numeric.is_empty() {
        return Err(
            "there are no numeric and non-numeric field combinations".to_string(),
        );
    }
    let numeric_field = fields
        .numeric
        .choose(rng)
        .ok_or_else(|| "there are no numeric fields in the collection".to_string())?;
    let other_field = fields
        .non_numeric
        .choose(rng)
        .ok_or_else(|| "there are no non-numeric fields in the collection".to_string())?;

    let values = numeric_field_values(docs, numeric_field);
    let candidates = distinct_present(docs, other_field);
    if values.is_empty() || candidates.is_empty() {
        return Err("there are insufficient valid values in the fields".to_string());
    }
    let (min, max) = int_bounds(&values);
    let threshold = draw_in(rng, min, max - 1);
    let selected = (*candidates
        .choose(rng)
        .ok_or_else(|| "there are insufficient valid values in the fields".to_string())?)
    .clone();

    let output: Vec<Document> = docs
        .iter()
        .filter(|doc| {
            let above = doc
                .get(numeric_field.as_str())
                .and_then(serde_json::Value::as_f64)
                .map(|v| v > threshold as f64)
                .unwrap_or(false);
            above && doc.get(other_field.as_str()) == Some(&selected)
        })
        .cloned()
        .collect();

    let literal = literal_text(&selected);
    Ok(QueryResult::simulated(
        format!(
            "db.{}.find({{ {}: {{ $gt: {} }}, {}: '{}' }})",
            name, numeric_field, threshold, other_field, literal
        ),
        format!(
            "Find documents where {} is greater than {} and {} equals '{}'.",
            numeric_field, threshold, other_field, literal
        ),
        json!(output),
    ))
}

fn match_range<R: Rng + ?Sized>(
    name: &str,
    docs: &[Document],
    fields: &FieldInfo,
    rng: &mut R,
) -> Result<QueryResult, String> {
    let field = fields
        .numeric
        .choose(rng)
        .ok_or_else(|| "there are no numeric fields in the collection".to_string())?;
    let values = numeric_field_values(docs, field);
    if values.is_empty() {
        return Err("the numeric field has no valid range values".to_string());
    }
    let (min, max) = int_bounds(&values);
    let lower = draw_in(rng, min, max - 1);
    // A constant field collapses the span; the upper bound must stay
    // within the observed range.
    let upper = draw_in(rng, (lower + 1).min(max), max);

    let output: Vec<Document> = docs
        .iter()
        .filter(|doc| {
            doc.get(field.as_str())
                .and_then(serde_json::Value::as_f64)
                .map(|v| lower as f64 <= v && v <= upper as f64)
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "db.{}.aggregate([{{ $match: {{ {}: {{ $gte: {}, $lte: {} }} }} }}])",
            name, field, lower, upper
        ),
        format!(
            "Find documents where {} is between {} and {}.",
            field, lower, upper
        ),
        json!(output),
    ))
}

fn group_sum<R: Rng + ?Sized>(
    name: &str,
    docs: &[Document],
    fields: &FieldInfo,
    rng: &mut R,
) -> Result<QueryResult, String> {
    if fields.numeric.is_empty() || fields.non_numeric.is_empty() {
        return Err(
            "there are no numeric and non-numeric fields in the collection".to_string(),
        );
    }
    let group_field = fields
        .non_numeric
        .choose(rng)
        .ok_or_else(|| "there are no non-numeric fields in the collection".to_string())?;
    let sum_field = fields
        .numeric
        .choose(rng)
        .ok_or_else(|| "there are no numeric fields in the collection".to_string())?;

    // Accumulate in first-seen key order; a missing group key falls
    // into the "Unknown" bucket.
    let mut groups: Vec<(Document, f64)> = Vec::new();
    for doc in docs {
        let key = doc
            .get(group_field.as_str())
            .cloned()
            .unwrap_or_else(|| json!("Unknown"));
        let addend = doc
            .get(sum_field.as_str())
            .map(coerce_to_number)
            .unwrap_or(0.0);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 += addend,
            None => groups.push((key, addend)),
        }
    }
    let output: Vec<serde_json::Value> = groups
        .into_iter()
        .map(|(key, total)| json!({ "_id": key, "total": json_number(total) }))
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "db.{}.aggregate([{{ $group: {{ _id: '${}', total: {{ $sum: '${}' }} }} }}])",
            name, group_field, sum_field
        ),
        format!(
            "Group documents by {} and calculate the sum of {}.",
            group_field, sum_field
        ),
        json!(output),
    ))
}

fn sort_limit<R: Rng + ?Sized>(
    name: &str,
    docs: &[Document],
    fields: &FieldInfo,
    rng: &mut R,
) -> Result<QueryResult, String> {
    let sort_field = fields
        .keys
        .choose(rng)
        .ok_or_else(|| "there are no fields to sort or limit in the collection".to_string())?;
    let max_limit = docs.len().min(10);
    let n = rng.gen_range(1..=max_limit);

    let mut sorted: Vec<Document> = docs.to_vec();
    sorted.sort_by_key(|doc| sort_text(doc.get(sort_field.as_str())));
    sorted.truncate(n);

    Ok(QueryResult::simulated(
        format!(
            "db.{}.aggregate([{{ $sort: {{ {}: 1 }} }}, {{ $limit: {} }}])",
            name, sort_field, n
        ),
        format!(
            "Sort documents by {} in ascending order and return the top {}.",
            sort_field, n
        ),
        json!(sorted),
    ))
}

fn numeric_field_values(docs: &[Document], field: &str) -> Vec<f64> {
    docs.iter()
        .filter_map(|doc| doc.get(field).and_then(serde_json::Value::as_f64))
        .collect()
}

fn distinct_present<'a>(docs: &'a [Document], field: &str) -> Vec<&'a serde_json::Value> {
    let mut seen: Vec<&serde_json::Value> = Vec::new();
    for doc in docs {
        if let Some(value) = doc.get(field) {
            if value.is_null() {
                continue;
            }
            if matches!(value, serde_json::Value::String(s) if s.is_empty()) {
                continue;
            }
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
    }
    seen
}

/// Truncating integer bounds over the observed values, matching the
/// integer thresholds the rendered queries use.
fn int_bounds(values: &[f64]) -> (i64, i64) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    (min as i64, max as i64)
}

/// Uniform integer draw. An inverted span collapses to `low`, so a
/// constant-valued field never feeds an empty range to the generator;
/// callers keep the bounds inside the observed range themselves.
fn draw_in<R: Rng + ?Sized>(rng: &mut R, low: i64, high: i64) -> i64 {
    let high = high.max(low);
    rng.gen_range(low..=high)
}

fn coerce_to_number(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn literal_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn sort_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
