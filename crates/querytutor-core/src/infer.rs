//! Column type inference for tabular datasets.
//!
//! A column is numeric only when every row's value for it reads as a
//! number; a single non-castable value anywhere (including a null)
//! forces the whole column to textual. Inference is a pure transform:
//! the raw loaded table stays untouched and the typed copy carries the
//! coerced cells plus the derived `numeric_columns` list.

use crate::dataset::Table;
use crate::value::Value;
use tracing::debug;

impl Table {
    /// Returns a typed copy of this table.
    ///
    /// Cells of numeric columns are rewritten into their canonical
    /// numeric forms: textual digits with a decimal point become
    /// [`Value::Float`], without one become [`Value::Integer`], and
    /// already-numeric cells pass through unchanged. Non-numeric
    /// columns are copied verbatim; a failed cast is a classification
    /// outcome, not an error.
    ///
    /// The transform is idempotent; generators call it at the start of
    /// every batch rather than caching the result across reloads.
    pub fn with_inferred_types(&self) -> Table {
        let numeric_columns: Vec<String> = self
            .columns
            .iter()
            .filter(|col| self.column_is_numeric(col))
            .cloned()
            .collect();

        let numeric_indexes: Vec<usize> = numeric_columns
            .iter()
            .filter_map(|col| self.column_index(col))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, cell)| {
                        if numeric_indexes.contains(&idx) {
                            coerce_numeric(cell)
                        } else {
                            cell.clone()
                        }
                    })
                    .collect()
            })
            .collect();

        debug!(
            table = %self.name,
            numeric = numeric_columns.len(),
            total = self.columns.len(),
            "inferred column types"
        );

        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
            numeric_columns,
        }
    }

    fn column_is_numeric(&self, column: &str) -> bool {
        let values = self.column_values(column);
        !values.is_empty() && values.iter().all(|v| v.as_number().is_some())
    }
}

fn coerce_numeric(cell: &Value) -> Value {
    match cell {
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.contains('.') {
                match trimmed.parse::<f64>() {
                    Ok(f) => Value::Float(f),
                    Err(_) => cell.clone(),
                }
            } else {
                match trimmed.parse::<i64>() {
                    Ok(i) => Value::Integer(i),
                    Err(_) => match trimmed.parse::<f64>() {
                        Ok(f) => Value::Float(f),
                        Err(_) => cell.clone(),
                    },
                }
            }
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table(rows: Vec<Vec<Value>>) -> Table {
        let mut t = Table::new(
            "stock",
            vec!["item".to_string(), "qty".to_string()],
        );
        for row in rows {
            t.push_row(row).unwrap();
        }
        t
    }

    #[test]
    fn test_all_castable_column_is_numeric() {
        let t = raw_table(vec![
            vec![Value::Text("bolt".to_string()), Value::Text("10".to_string())],
            vec![Value::Text("nut".to_string()), Value::Text("2.5".to_string())],
        ]);
        let typed = t.with_inferred_types();
        assert_eq!(typed.numeric_columns, vec!["qty".to_string()]);
        assert_eq!(typed.value(0, "qty"), Some(&Value::Integer(10)));
        assert_eq!(typed.value(1, "qty"), Some(&Value::Float(2.5)));
        // Raw table untouched
        assert_eq!(t.value(0, "qty"), Some(&Value::Text("10".to_string())));
    }

    #[test]
    fn test_single_text_row_forces_textual() {
        let t = raw_table(vec![
            vec![Value::Null, Value::Text("1".to_string())],
            vec![Value::Null, Value::Text("2".to_string())],
            vec![Value::Null, Value::Text("unknown".to_string())],
        ]);
        let typed = t.with_inferred_types();
        assert!(typed.numeric_columns.is_empty());
        assert_eq!(typed.value(0, "qty"), Some(&Value::Text("1".to_string())));
    }

    #[test]
    fn test_null_forces_textual() {
        let t = raw_table(vec![
            vec![Value::Null, Value::Integer(1)],
            vec![Value::Null, Value::Null],
        ]);
        let typed = t.with_inferred_types();
        assert!(typed.numeric_columns.is_empty());
    }

    #[test]
    fn test_inference_is_idempotent() {
        let t = raw_table(vec![
            vec![Value::Text("a".to_string()), Value::Text("3".to_string())],
            vec![Value::Text("b".to_string()), Value::Text("4.5".to_string())],
        ]);
        let once = t.with_inferred_types();
        let twice = once.with_inferred_types();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_column_is_not_numeric() {
        let t = Table::new("empty", vec!["a".to_string()]);
        let typed = t.with_inferred_types();
        assert!(typed.numeric_columns.is_empty());
    }
}
