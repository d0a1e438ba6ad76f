//! Query-construct generators.
//!
//! Each backend walks its constructs in a fixed order, draws random
//! parameters from the dataset, renders a query string plus a
//! natural-language description, and simulates the result a real
//! engine would return. Unmet preconditions never raise: they are
//! omitted (sample mode) or surfaced as explanatory placeholders
//! (construct mode).

pub mod document;
pub mod relational;

pub use document::DocumentConstruct;
pub use relational::RelationalConstruct;

use serde::Serialize;

/// Generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Return only constructs with a computable result.
    Sample,
    /// Return exactly one entry per requested construct, with a
    /// generalized placeholder when no concrete instance is possible.
    Construct,
}

/// One generated query: the formal text, a natural-language
/// description, and the simulated output.
///
/// `output` is `None` exactly when the construct could not be
/// instantiated on the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Query text in the backend's flavor (illustrative, not
    /// guaranteed to be executable verbatim)
    pub query: String,
    /// What the query does, in plain language
    pub description: String,
    /// The value a real engine would return, or `None`
    pub output: Option<serde_json::Value>,
}

impl QueryResult {
    /// A fully instantiated query with a simulated output.
    pub fn simulated<Q, D>(query: Q, description: D, output: serde_json::Value) -> Self
    where
        Q: Into<String>,
        D: Into<String>,
    {
        QueryResult {
            query: query.into(),
            description: description.into(),
            output: Some(output),
        }
    }

    /// A construct-mode placeholder: the query text explains the unmet
    /// precondition and the description gives the generalized form.
    pub fn placeholder(construct: &str, template: &str, reason: &str) -> Self {
        QueryResult {
            query: format!("No query could be generated as {}.", reason),
            description: format!("Generalized {} query structure: {}", construct, template),
            output: None,
        }
    }

    /// Returns `true` when a simulated output is present.
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

/// Renders an aggregate total as a JSON number, using the integer form
/// when the value is whole.
pub(crate) fn json_number(v: f64) -> serde_json::Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        serde_json::Value::from(v as i64)
    } else {
        serde_json::Number::from_f64(v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Applies the mode's filtering policy, preserving construct order.
///
/// Sample mode drops entries without output so the caller only ever
/// sees queries with a displayable result; construct mode passes
/// everything through.
pub(crate) fn assemble(mode: Mode, results: Vec<QueryResult>) -> Vec<QueryResult> {
    match mode {
        Mode::Sample => results.into_iter().filter(QueryResult::has_output).collect(),
        Mode::Construct => results,
    }
}
