//! Construct generator for tabular datasets.
//!
//! Generates SQL-flavored example queries over a named table: one
//! candidate per construct, each with a freshly drawn random choice of
//! columns, literals, and thresholds, and a result simulated directly
//! over the rows.

use super::{assemble, json_number, Mode, QueryResult};
use crate::dataset::{Store, Table};
use crate::error::Error;
use crate::value::Value;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The relational query constructs, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalConstruct {
    GroupBy,
    Having,
    OrderBy,
    Where,
    Limit,
    Join,
    Like,
    Range,
    Sum,
}

impl RelationalConstruct {
    /// Every construct, in the order a full batch evaluates them.
    pub const ALL: [RelationalConstruct; 9] = [
        RelationalConstruct::GroupBy,
        RelationalConstruct::Having,
        RelationalConstruct::OrderBy,
        RelationalConstruct::Where,
        RelationalConstruct::Limit,
        RelationalConstruct::Join,
        RelationalConstruct::Like,
        RelationalConstruct::Range,
        RelationalConstruct::Sum,
    ];

    /// Display label used in placeholder descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            RelationalConstruct::GroupBy => "GROUP BY",
            RelationalConstruct::Having => "HAVING",
            RelationalConstruct::OrderBy => "ORDER BY",
            RelationalConstruct::Where => "WHERE",
            RelationalConstruct::Limit => "LIMIT",
            RelationalConstruct::Join => "JOIN",
            RelationalConstruct::Like => "LIKE",
            RelationalConstruct::Range => "RANGE",
            RelationalConstruct::Sum => "SUM",
        }
    }

    /// The generalized, unparameterized form shown when no concrete
    /// instance exists.
    pub fn template(&self) -> &'static str {
        match self {
            RelationalConstruct::GroupBy => {
                "SELECT column, COUNT(*) FROM table_name GROUP BY column;"
            }
            RelationalConstruct::Having => {
                "SELECT column, AVG(numeric_column) FROM table_name GROUP BY column \
                 HAVING AVG(numeric_column) > threshold;"
            }
            RelationalConstruct::OrderBy => {
                "SELECT column FROM table_name ORDER BY column DESC;"
            }
            RelationalConstruct::Where => {
                "SELECT column FROM table_name WHERE column = 'value';"
            }
            RelationalConstruct::Limit => "SELECT columns FROM table_name LIMIT number;",
            RelationalConstruct::Join => {
                "SELECT table1.column, table2.column FROM table1 JOIN table2 \
                 ON table1.column = table2.column;"
            }
            RelationalConstruct::Like => {
                "SELECT column FROM table_name WHERE column LIKE '%text%';"
            }
            RelationalConstruct::Range => {
                "SELECT numeric_column, column FROM table_name \
                 WHERE numeric_column BETWEEN lower_bound AND upper_bound;"
            }
            RelationalConstruct::Sum => {
                "SELECT column, SUM(numeric_column) FROM table_name GROUP BY column;"
            }
        }
    }
}

impl fmt::Display for RelationalConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RelationalConstruct {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "group by" | "groupby" => Ok(RelationalConstruct::GroupBy),
            "having" => Ok(RelationalConstruct::Having),
            "order by" | "orderby" => Ok(RelationalConstruct::OrderBy),
            "where" => Ok(RelationalConstruct::Where),
            "limit" => Ok(RelationalConstruct::Limit),
            "join" => Ok(RelationalConstruct::Join),
            "like" => Ok(RelationalConstruct::Like),
            "range" | "between" => Ok(RelationalConstruct::Range),
            "sum" => Ok(RelationalConstruct::Sum),
            other => Err(Error::UnknownConstruct(other.to_string())),
        }
    }
}

/// Generates example queries for a registered table.
///
/// With `construct = None` every construct in
/// [`RelationalConstruct::ALL`] is attempted in order; otherwise only
/// the named one. A missing or empty table yields a single explanatory
/// result rather than an error, so this never fails.
pub fn generate<R: Rng + ?Sized>(
    store: &Store,
    table_name: &str,
    construct: Option<RelationalConstruct>,
    mode: Mode,
    rng: &mut R,
) -> Vec<QueryResult> {
    let raw = match store.table(table_name) {
        Some(t) if !t.is_empty() => t,
        _ => {
            return vec![QueryResult {
                query: "Error: Table does not exist or is empty.".to_string(),
                description: "Table does not exist or is empty.".to_string(),
                output: None,
            }];
        }
    };

    // Inference runs per batch; the stored raw table stays untouched.
    let table = raw.with_inferred_types();

    let targets: Vec<RelationalConstruct> = match construct {
        Some(c) => vec![c],
        None => RelationalConstruct::ALL.to_vec(),
    };

    let mut results = Vec::with_capacity(targets.len());
    for c in targets {
        let candidate = match c {
            RelationalConstruct::GroupBy => group_by(&table, rng),
            RelationalConstruct::Having => having(&table, rng),
            RelationalConstruct::OrderBy => order_by(&table, rng),
            RelationalConstruct::Where => filter_equals(&table, rng),
            RelationalConstruct::Limit => limit(&table, rng),
            RelationalConstruct::Join => self_join(&table, rng),
            RelationalConstruct::Like => like(&table, rng),
            RelationalConstruct::Range => range(&table, rng),
            RelationalConstruct::Sum => sum_by_group(&table, rng),
        };
        match candidate {
            Ok(result) => results.push(result),
            Err(reason) => {
                debug!(table = %table.name, construct = %c, %reason, "construct not applicable");
                if mode == Mode::Construct {
                    results.push(QueryResult::placeholder(c.label(), c.template(), &reason));
                }
            }
        }
    }

    assemble(mode, results)
}

fn group_by<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    let column = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are no columns to group by".to_string())?;
    let idx = index_of(t, column)?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for row in &t.rows {
        if let Some(cell) = row.get(idx) {
            *counts.entry(cell.to_string()).or_insert(0) += 1;
        }
    }
    let output: serde_json::Map<String, serde_json::Value> = counts
        .into_iter()
        .map(|(k, v)| (k, json!(v)))
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "SELECT {col}, COUNT(*) FROM {table} GROUP BY {col};",
            col = column,
            table = t.name
        ),
        format!("Count the number of rows grouped by {}.", column),
        serde_json::Value::Object(output),
    ))
}

fn having<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    let numeric_col = t
        .numeric_columns
        .choose(rng)
        .ok_or_else(|| "there are no numeric columns in the dataset".to_string())?;
    let values = numeric_values(t, numeric_col);
    if values.is_empty() {
        return Err("there are no numeric values in the dataset".to_string());
    }
    let (min, max) = min_max(&values);
    let threshold = round2(rng.gen_range(min..=max));
    let group_col = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are no columns to group by".to_string())?;

    let gidx = index_of(t, group_col)?;
    let nidx = index_of(t, numeric_col)?;
    let mut acc: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for row in &t.rows {
        let (group, cell) = match (row.get(gidx), row.get(nidx)) {
            (Some(g), Some(c)) => (g, c),
            _ => continue,
        };
        if group.is_null() {
            continue;
        }
        if let Some(v) = cell.as_number() {
            let entry = acc.entry(group.to_string()).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }
    let output: serde_json::Map<String, serde_json::Value> = acc
        .into_iter()
        .filter_map(|(key, (sum, count))| {
            if count == 0 {
                return None;
            }
            let mean = sum / f64::from(count);
            if mean > threshold {
                Some((key, json!(mean)))
            } else {
                None
            }
        })
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "SELECT {group}, AVG({num}) FROM {table} GROUP BY {group} HAVING AVG({num}) > {threshold};",
            group = group_col,
            num = numeric_col,
            table = t.name,
            threshold = threshold
        ),
        format!(
            "Find rows where the average of {} is greater than {}, grouped by {}.",
            numeric_col, threshold, group_col
        ),
        serde_json::Value::Object(output),
    ))
}

fn order_by<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    let column = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are no columns to order by".to_string())?;

    let mut texts: Vec<String> = t
        .column_values(column)
        .iter()
        .map(|v| v.to_string())
        .collect();
    texts.sort_by(|a, b| b.cmp(a));

    Ok(QueryResult::simulated(
        format!(
            "SELECT {col} FROM {table} ORDER BY {col} DESC;",
            col = column,
            table = t.name
        ),
        format!("List all values of {} in descending order.", column),
        json!(texts),
    ))
}

fn filter_equals<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    let filter_col = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are no columns available".to_string())?;
    let candidates = distinct_non_null(t, filter_col);
    let selected = *candidates
        .choose(rng)
        .ok_or_else(|| format!("the column {} has no valid values", filter_col))?;

    // Any other column displays the match; a one-column table falls
    // back to the filter column itself.
    let others: Vec<&String> = t.columns.iter().filter(|c| *c != filter_col).collect();
    let output_col = others.choose(rng).copied().unwrap_or(filter_col);

    let fidx = index_of(t, filter_col)?;
    let oidx = index_of(t, output_col)?;
    let output: Vec<serde_json::Value> = t
        .rows
        .iter()
        .filter(|row| row.get(fidx) == Some(selected))
        .filter_map(|row| row.get(oidx).map(Value::to_json))
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "SELECT {out} FROM {table} WHERE {filter} = '{value}';",
            out = output_col,
            table = t.name,
            filter = filter_col,
            value = selected
        ),
        format!(
            "Find rows where {} equals '{}' and display {}.",
            filter_col, selected, output_col
        ),
        json!(output),
    ))
}

fn limit<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    if t.rows.is_empty() {
        return Err("there are no rows in the dataset".to_string());
    }
    let max_limit = t.len().min(10);
    let n = rng.gen_range(1..=max_limit);
    let count = t.columns.len().min(2);
    let selected: Vec<&String> = t.columns.choose_multiple(rng, count).collect();

    let output: Vec<serde_json::Value> = t.rows[..n]
        .iter()
        .map(|row| {
            let fields: serde_json::Map<String, serde_json::Value> = selected
                .iter()
                .filter_map(|col| {
                    let idx = t.column_index(col)?;
                    let cell = row.get(idx)?;
                    Some(((*col).clone(), cell.to_json()))
                })
                .collect();
            serde_json::Value::Object(fields)
        })
        .collect();

    let column_list = selected
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(QueryResult::simulated(
        format!(
            "SELECT {cols} FROM {table} LIMIT {n};",
            cols = column_list,
            table = t.name,
            n = n
        ),
        format!(
            "Display the first {} rows with columns {}.",
            n, column_list
        ),
        json!(output),
    ))
}

fn self_join<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    if t.columns.len() < 2 {
        return Err("there are not enough columns to perform a join".to_string());
    }
    let join_col = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are not enough columns to perform a join".to_string())?;
    let display: Vec<&String> = t.columns.choose_multiple(rng, 2).collect();
    let (first, second) = match (display.first(), display.get(1)) {
        (Some(a), Some(b)) => (*a, *b),
        _ => return Err("there are not enough columns to perform a join".to_string()),
    };
    let alias = format!("{}_alias", t.name);

    Ok(QueryResult::simulated(
        format!(
            "SELECT {table}.{first}, {alias}.{second} FROM {table} JOIN {alias} \
             ON {table}.{join} = {alias}.{join};",
            table = t.name,
            first = first,
            alias = alias,
            second = second,
            join = join_col
        ),
        format!(
            "Join the {table} table with an alias of itself ({alias}) on the column {join}, \
             and display {first} from the original table and {second} from the alias table.",
            table = t.name,
            alias = alias,
            join = join_col,
            first = first,
            second = second
        ),
        // The alias table is virtual, so the join itself cannot be
        // simulated; the output is this explanatory scalar.
        json!("Simulated output not available for JOIN queries because the alias table is virtual."),
    ))
}

fn like<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    let text_columns: Vec<&String> = t
        .columns
        .iter()
        .filter(|col| {
            let values = t.column_values(col);
            !values.is_empty() && values.iter().all(|v| v.is_text())
        })
        .collect();
    let column = *text_columns
        .choose(rng)
        .ok_or_else(|| "there are no text-based columns".to_string())?;
    let candidates = distinct_non_null(t, column);
    let selected = *candidates
        .choose(rng)
        .ok_or_else(|| format!("the column {} has no valid text values", column))?;

    let text = selected.to_string();
    let substring: String = if text.chars().count() > 3 {
        text.chars().take(3).collect()
    } else {
        text.clone()
    };
    let needle = substring.to_lowercase();

    let display_col = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are no columns available".to_string())?;

    // The projection pairs the matched column with the table's second
    // declared column (skipped on one-column tables).
    let cidx = index_of(t, column)?;
    let second = t.columns.get(1);
    let output: Vec<serde_json::Value> = t
        .rows
        .iter()
        .filter(|row| {
            row.get(cidx)
                .map(|cell| cell.to_string().to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .map(|row| {
            let mut fields = serde_json::Map::new();
            if let Some(cell) = row.get(cidx) {
                fields.insert(column.clone(), cell.to_json());
            }
            if let Some(col) = second {
                if let Some(idx) = t.column_index(col) {
                    if let Some(cell) = row.get(idx) {
                        fields.insert(col.clone(), cell.to_json());
                    }
                }
            }
            serde_json::Value::Object(fields)
        })
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "SELECT {col}, {display} FROM {table} WHERE {col} LIKE '%{sub}%';",
            col = column,
            display = display_col,
            table = t.name,
            sub = substring
        ),
        format!(
            "Find rows where {} contains the text '{}' and display {} and another column.",
            column, substring, column
        ),
        json!(output),
    ))
}

fn range<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    let numeric_col = t
        .numeric_columns
        .choose(rng)
        .ok_or_else(|| "there are no numeric columns in the dataset".to_string())?;
    let values = numeric_values(t, numeric_col);
    if values.is_empty() {
        return Err("the numeric column contains no valid range values".to_string());
    }
    let (min, max) = min_max(&values);

    // A span under one unit cannot fit the lower < upper drawing
    // scheme; clamp to the full observed range instead of panicking.
    let (lower, upper) = if max - min < 1.0 {
        (round2(min), round2(max))
    } else {
        let lower = round2(rng.gen_range(min..=max - 1.0));
        let floor = (lower + 1.0).min(max);
        (lower, round2(rng.gen_range(floor..=max)))
    };

    let display_col = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are no columns available".to_string())?;
    let nidx = index_of(t, numeric_col)?;
    let didx = index_of(t, display_col)?;

    let output: Vec<serde_json::Value> = t
        .rows
        .iter()
        .filter(|row| {
            row.get(nidx)
                .and_then(Value::as_number)
                .map(|v| lower <= v && v <= upper)
                .unwrap_or(false)
        })
        .map(|row| {
            let mut fields = serde_json::Map::new();
            if let Some(cell) = row.get(nidx) {
                fields.insert(numeric_col.clone(), cell.to_json());
            }
            if let Some(cell) = row.get(didx) {
                fields.insert(display_col.clone(), cell.to_json());
            }
            serde_json::Value::Object(fields)
        })
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "SELECT {num}, {display} FROM {table} WHERE {num} BETWEEN {lower} AND {upper};",
            num = numeric_col,
            display = display_col,
            table = t.name,
            lower = lower,
            upper = upper
        ),
        format!(
            "Find rows where {} is between {} and {} and display {}.",
            numeric_col, lower, upper, display_col
        ),
        json!(output),
    ))
}

fn sum_by_group<R: Rng + ?Sized>(t: &Table, rng: &mut R) -> Result<QueryResult, String> {
    let numeric_col = t
        .numeric_columns
        .choose(rng)
        .ok_or_else(|| "there are no numeric columns in the dataset".to_string())?;
    let group_col = t
        .columns
        .choose(rng)
        .ok_or_else(|| "there are no columns to group by".to_string())?;

    let gidx = index_of(t, group_col)?;
    let nidx = index_of(t, numeric_col)?;
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for row in &t.rows {
        let (group, cell) = match (row.get(gidx), row.get(nidx)) {
            (Some(g), Some(c)) => (g, c),
            _ => continue,
        };
        if group.is_null() {
            continue;
        }
        if let Some(v) = cell.as_number() {
            *sums.entry(group.to_string()).or_insert(0.0) += v;
        }
    }
    let output: serde_json::Map<String, serde_json::Value> = sums
        .into_iter()
        .map(|(k, v)| (k, json_number(v)))
        .collect();

    Ok(QueryResult::simulated(
        format!(
            "SELECT {group}, SUM({num}) FROM {table} GROUP BY {group};",
            group = group_col,
            num = numeric_col,
            table = t.name
        ),
        format!(
            "Calculate the total sum of {}, grouped by {}.",
            numeric_col, group_col
        ),
        serde_json::Value::Object(output),
    ))
}

fn index_of(t: &Table, column: &str) -> Result<usize, String> {
    t.column_index(column)
        .ok_or_else(|| format!("the column {} is not part of the table", column))
}

fn distinct_non_null<'a>(t: &'a Table, column: &str) -> Vec<&'a Value> {
    let mut seen: Vec<&Value> = Vec::new();
    for value in t.column_values(column) {
        if !value.is_null() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn numeric_values(t: &Table, column: &str) -> Vec<f64> {
    t.column_values(column)
        .iter()
        .filter_map(|v| v.as_number())
        .collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn store_with(table: Table) -> Store {
        let mut store = Store::new();
        store.insert_table(table);
        store
    }

    fn table(name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
        let mut t = Table::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row).unwrap();
        }
        t
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    /// Table used by several tests: a textual group column plus a
    /// numeric column stored as text, exercising inference on the way.
    fn sales() -> Table {
        table(
            "sales",
            &["region", "amount"],
            vec![
                vec![text("east"), text("10")],
                vec![text("east"), text("20")],
                vec![text("west"), text("5")],
            ],
        )
    }

    #[test]
    fn test_missing_table_is_single_explanatory_result() {
        let store = Store::new();
        let results = generate(&store, "nope", None, Mode::Sample, &mut rng());
        assert_eq!(results.len(), 1);
        assert!(results[0].output.is_none());
        assert!(results[0].query.starts_with("Error:"));
    }

    #[test]
    fn test_empty_table_is_single_explanatory_result() {
        let store = store_with(Table::new("empty", vec!["a".to_string()]));
        let results = generate(&store, "empty", None, Mode::Construct, &mut rng());
        assert_eq!(results.len(), 1);
        assert!(results[0].output.is_none());
    }

    #[test]
    fn test_group_by_counts() {
        // One column, so the grouping choice is forced.
        let store = store_with(table(
            "t",
            &["c"],
            vec![vec![text("a")], vec![text("a")], vec![text("b")]],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::GroupBy),
            Mode::Construct,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        let output = results[0].output.as_ref().unwrap();
        assert_eq!(output["a"], 2);
        assert_eq!(output["b"], 1);
    }

    #[test]
    fn test_having_keeps_only_groups_above_threshold() {
        let store = store_with(table(
            "t",
            &["g", "n"],
            vec![
                vec![text("x"), text("10")],
                vec![text("x"), text("20")],
                vec![text("y"), text("5")],
            ],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::Having),
            Mode::Construct,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        let result = &results[0];
        let output = result.output.as_ref().unwrap().as_object().unwrap();

        // Recover the drawn threshold from the rendered query.
        let threshold: f64 = result
            .query
            .rsplit("> ")
            .next()
            .unwrap()
            .trim_end_matches(';')
            .parse()
            .unwrap();
        assert!((5.0..=20.0).contains(&threshold));

        // Means are x: 15, y: 5; only groups strictly above the
        // threshold may appear.
        assert_eq!(output.contains_key("x"), 15.0 > threshold);
        assert_eq!(output.contains_key("y"), 5.0 > threshold);
    }

    #[test]
    fn test_order_by_descending_text_order() {
        let store = store_with(table(
            "t",
            &["c"],
            vec![vec![text("apple")], vec![text("cherry")], vec![text("banana")]],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::OrderBy),
            Mode::Sample,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].output,
            Some(serde_json::json!(["cherry", "banana", "apple"]))
        );
    }

    #[test]
    fn test_where_falls_back_on_single_column() {
        let store = store_with(table(
            "t",
            &["c"],
            vec![vec![text("a")], vec![text("a")]],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::Where),
            Mode::Sample,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].output, Some(serde_json::json!(["a", "a"])));
        assert!(results[0].query.contains("WHERE c = 'a'"));
    }

    #[test]
    fn test_limit_projects_chosen_columns() {
        let store = store_with(table(
            "t",
            &["a", "b"],
            vec![vec![text("x"), text("y")]],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::Limit),
            Mode::Sample,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        let output = results[0].output.as_ref().unwrap().as_array().unwrap();
        assert_eq!(output.len(), 1); // one row, so LIMIT is forced to 1
        let row = output[0].as_object().unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row["a"], "x");
        assert_eq!(row["b"], "y");
    }

    #[test]
    fn test_join_survives_sample_mode_with_explanatory_output() {
        let store = store_with(sales());
        let results = generate(
            &store,
            "sales",
            Some(RelationalConstruct::Join),
            Mode::Sample,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        let output = results[0].output.as_ref().unwrap();
        assert!(output.as_str().unwrap().contains("alias table is virtual"));
        assert!(results[0].query.contains("JOIN sales_alias"));
    }

    #[test]
    fn test_join_needs_two_columns() {
        let store = store_with(table("t", &["only"], vec![vec![text("v")]]));
        let sample = generate(
            &store,
            "t",
            Some(RelationalConstruct::Join),
            Mode::Sample,
            &mut rng(),
        );
        assert!(sample.is_empty());

        let construct = generate(
            &store,
            "t",
            Some(RelationalConstruct::Join),
            Mode::Construct,
            &mut rng(),
        );
        assert_eq!(construct.len(), 1);
        assert!(construct[0].output.is_none());
        assert!(construct[0].description.starts_with("Generalized JOIN"));
    }

    #[test]
    fn test_like_matches_case_insensitively() {
        let store = store_with(table(
            "t",
            &["name", "size"],
            vec![
                vec![text("Apple"), text("1")],
                vec![text("applesauce"), text("2")],
                vec![text("pear"), text("3")],
            ],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::Like),
            Mode::Sample,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        let output = results[0].output.as_ref().unwrap().as_array().unwrap();
        // Both apple variants share their first three letters, so
        // whichever value is drawn both rows match; "pear" never does.
        if results[0].query.contains("'%pea") || results[0].query.contains("'%pear") {
            assert_eq!(output.len(), 1);
        } else {
            assert_eq!(output.len(), 2);
        }
        for row in output {
            let row = row.as_object().unwrap();
            assert!(row.contains_key("name"));
            assert!(row.contains_key("size"));
        }
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        // Constant column: the degenerate span clamps to [5, 5] and
        // rows sitting exactly on the bounds must be kept.
        let store = store_with(table(
            "t",
            &["n"],
            vec![vec![text("5")], vec![text("5")]],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::Range),
            Mode::Sample,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        let output = results[0].output.as_ref().unwrap().as_array().unwrap();
        assert_eq!(output.len(), 2);
        assert!(results[0].query.contains("BETWEEN 5 AND 5"));
    }

    #[test]
    fn test_sum_by_group() {
        let store = store_with(table(
            "t",
            &["n"],
            vec![vec![text("2")], vec![text("2")], vec![text("3")]],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::Sum),
            Mode::Sample,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        let output = results[0].output.as_ref().unwrap();
        assert_eq!(output["2"], 4);
        assert_eq!(output["3"], 3);
    }

    #[test]
    fn test_sample_mode_only_returns_present_outputs() {
        let store = store_with(sales());
        let results = generate(&store, "sales", None, Mode::Sample, &mut rng());
        assert!(!results.is_empty());
        assert!(results.iter().all(QueryResult::has_output));
    }

    #[test]
    fn test_construct_mode_returns_exactly_one_result() {
        // All-text table: HAVING cannot be instantiated.
        let store = store_with(table(
            "t",
            &["a"],
            vec![vec![text("x")], vec![text("y")]],
        ));
        let results = generate(
            &store,
            "t",
            Some(RelationalConstruct::Having),
            Mode::Construct,
            &mut rng(),
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].output.is_none());
        assert!(results[0]
            .query
            .contains("there are no numeric columns in the dataset"));
        assert!(results[0].description.starts_with("Generalized HAVING"));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let store = store_with(sales());
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first = generate(&store, "sales", None, Mode::Sample, &mut a);
        let second = generate(&store, "sales", None, Mode::Sample, &mut b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_construct_parsing() {
        assert_eq!(
            "group by".parse::<RelationalConstruct>().unwrap(),
            RelationalConstruct::GroupBy
        );
        assert_eq!(
            " ORDER BY ".parse::<RelationalConstruct>().unwrap(),
            RelationalConstruct::OrderBy
        );
        assert!("truncate".parse::<RelationalConstruct>().is_err());
    }
}
