//! Tabular input: a header row plus ordered data rows of string cells.
//!
//! The goal-tracking export is read from JSON in one of two shapes:
//!
//! ```json
//! { "headers": ["Id", "Title", ...], "rows": [["\"link\" \"1\"", "Theme 1", ...]] }
//! ```
//!
//! or a bare array of arrays whose first element is the header row, which is
//! what a worksheet dump produces.

use std::path::Path;

use bizplan_types::{BizPlanError, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct KeyedTable {
    headers: Vec<Value>,
    rows: Vec<Vec<Value>>,
}

/// Render a cell as display text. Empty cells arrive as `null`.
fn cell_text(value: Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(BizPlanError::Other(format!(
            "unsupported cell value: {other}"
        ))),
    }
}

fn row_text(row: Vec<Value>) -> Result<Vec<String>> {
    row.into_iter().map(cell_text).collect()
}

impl GoalTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(data)?;
        let (headers, rows) = if raw.is_object() {
            let keyed: KeyedTable = serde_json::from_value(raw)?;
            (keyed.headers, keyed.rows)
        } else {
            let mut sheet: Vec<Vec<Value>> = serde_json::from_value(raw)?;
            if sheet.is_empty() {
                return Ok(GoalTable::default());
            }
            let headers = sheet.remove(0);
            (headers, sheet)
        };

        Ok(GoalTable {
            headers: row_text(headers)?,
            rows: rows.into_iter().map(row_text).collect::<Result<_>>()?,
        })
    }

    /// Read a table from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&data)?;
        tracing::debug!(
            path = %path.display(),
            columns = table.headers.len(),
            rows = table.rows.len(),
            "Goal table loaded"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_shape() {
        let table = GoalTable::from_json_str(
            r#"{ "headers": ["Id", "Title"], "rows": [["\"l\" \"1\"", "Theme 1"]] }"#,
        )
        .unwrap();
        assert_eq!(table.headers, vec!["Id", "Title"]);
        assert_eq!(table.rows, vec![vec![r#""l" "1""#.to_string(), "Theme 1".into()]]);
    }

    #[test]
    fn sheet_shape_uses_first_row_as_header() {
        let table = GoalTable::from_json_str(r#"[["Id", "Title"], ["a", "b"], ["c", "d"]]"#).unwrap();
        assert_eq!(table.headers, vec!["Id", "Title"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["c", "d"]);
    }

    #[test]
    fn empty_sheet_is_empty_table() {
        let table = GoalTable::from_json_str("[]").unwrap();
        assert_eq!(table, GoalTable::default());
    }

    #[test]
    fn scalar_cells_are_stringified() {
        let table =
            GoalTable::from_json_str(r#"[["Target", "Done", "Note"], [100, true, null]]"#).unwrap();
        assert_eq!(table.rows[0], vec!["100", "true", ""]);
    }

    #[test]
    fn nested_cell_is_rejected() {
        let err = GoalTable::from_json_str(r#"[["Id"], [["nested"]]]"#).unwrap_err();
        assert!(matches!(err, BizPlanError::Other(_)));
    }

    #[test]
    fn invalid_json_is_json_error() {
        let err = GoalTable::from_json_str("not json").unwrap_err();
        assert!(matches!(err, BizPlanError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goals.json");
        std::fs::write(&path, r#"[["Id"], ["x"]]"#).unwrap();
        let table = GoalTable::load(&path).unwrap();
        assert_eq!(table.rows, vec![vec!["x".to_string()]]);
    }
}
