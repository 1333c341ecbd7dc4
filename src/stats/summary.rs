//! Generic tabular model for statistics output.
//!
//! A [`StatSummary`] is a named collection of tables; each row maps column
//! names to typed cell values. Ordered maps keep table, column, and row
//! iteration deterministic, so identical match sets render to identical
//! artifacts.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Text cell
    Text(String),
    /// Integer cell
    Int(i64),
    /// Floating-point cell
    Float(f64),
}

impl CellValue {
    /// Render the cell for CSV/markdown output. Floats use four decimal
    /// places, matching the published reports.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:.4}"),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One row: ordered column name -> cell value.
pub type Row = IndexMap<String, CellValue>;

/// A named-column table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names in display order
    pub columns: Vec<String>,
    /// Rows in display order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; values follow the column order.
    pub fn push_row(&mut self, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.columns.len());
        let row = self
            .columns
            .iter()
            .cloned()
            .zip(values)
            .collect::<Row>();
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Named collection of statistics tables derived from one match set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    tables: IndexMap<String, Table>,
}

impl StatSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table under the given name.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }

    /// Table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Iterate tables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Table)> {
        self.tables.iter()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the summary has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rendering() {
        assert_eq!(CellValue::from("qft").render(), "qft");
        assert_eq!(CellValue::from(42usize).render(), "42");
        assert_eq!(CellValue::from(0.95f64).render(), "0.9500");
    }

    #[test]
    fn rows_keep_column_order() {
        let mut table = Table::new(&["pattern", "count"]);
        table.push_row(vec!["Basis Change".into(), 3usize.into()]);

        let row = &table.rows[0];
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, vec!["pattern", "count"]);
        assert_eq!(row["count"], CellValue::Int(3));
    }

    #[test]
    fn summary_preserves_insertion_order() {
        let mut summary = StatSummary::new();
        summary.insert("b_table", Table::new(&["x"]));
        summary.insert("a_table", Table::new(&["y"]));

        let names: Vec<&String> = summary.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b_table", "a_table"]);
    }
}
