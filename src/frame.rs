//! In-memory tabular query results.

use std::fmt;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::{Error, Result};
use crate::sqlite::Value;

/// Rows and column names produced by one query. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    source: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    pub fn new(source: &str, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            source: source.to_string(),
            columns,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| Error::MissingColumn {
                query: self.source.clone(),
                column: column.to_string(),
            })
    }

    pub fn text_column(&self, column: &str) -> Result<Vec<String>> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .get(idx)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| Error::ColumnType {
                        column: column.to_string(),
                        expected: "text",
                        row,
                    })
            })
            .collect()
    }

    pub fn real_column(&self, column: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .get(idx)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| Error::ColumnType {
                        column: column.to_string(),
                        expected: "numeric",
                        row,
                    })
            })
            .collect()
    }

    /// First value of `column`, for single-row aggregate results.
    pub fn scalar_real(&self, column: &str) -> Result<f64> {
        self.real_column(column)?
            .first()
            .copied()
            .ok_or_else(|| Error::EmptyResult(self.source.clone()))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(
            std::iter::once(String::new()).chain(self.columns.iter().cloned()),
        );
        for (idx, row) in self.rows.iter().enumerate() {
            builder.push_record(
                std::iter::once(idx.to_string()).chain(row.iter().map(Value::to_string)),
            );
        }
        let mut table = builder.build();
        table.with(Style::psql());
        write!(f, "{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> Frame {
        Frame::new(
            "total_spent",
            vec!["customer_name".into(), "total_spent".into()],
            vec![
                vec![Value::Text("Alice".into()), Value::Real(210.4)],
                vec![Value::Text("Bob".into()), Value::Integer(155)],
            ],
        )
    }

    #[test]
    fn columns_by_name() {
        let frame = totals();
        assert_eq!(frame.text_column("customer_name").unwrap(), vec!["Alice", "Bob"]);
        assert_eq!(frame.real_column("total_spent").unwrap(), vec![210.4, 155.0]);
        assert_eq!(frame.scalar_real("total_spent").unwrap(), 210.4);
    }

    #[test]
    fn wrong_column_is_an_error() {
        let frame = totals();
        assert!(matches!(
            frame.real_column("avg_spent"),
            Err(Error::MissingColumn { .. })
        ));
        assert!(matches!(
            frame.real_column("customer_name"),
            Err(Error::ColumnType { row: 0, .. })
        ));
    }

    #[test]
    fn short_row_is_a_type_error() {
        let frame = Frame::new(
            "total_spent",
            vec!["customer_name".into(), "total_spent".into()],
            vec![
                vec![Value::Text("Alice".into()), Value::Real(210.4)],
                vec![Value::Text("Bob".into())],
            ],
        );
        assert!(matches!(
            frame.real_column("total_spent"),
            Err(Error::ColumnType { row: 1, .. })
        ));
        let ragged = Frame::new("names", vec!["customer_name".into()], vec![Vec::new()]);
        assert!(matches!(
            ragged.text_column("customer_name"),
            Err(Error::ColumnType { row: 0, .. })
        ));
    }

    #[test]
    fn empty_scalar_is_an_error() {
        let frame = Frame::new("total_revenue", vec!["total_revenue".into()], Vec::new());
        assert!(matches!(
            frame.scalar_real("total_revenue"),
            Err(Error::EmptyResult(q)) if q == "total_revenue"
        ));
    }

    #[test]
    fn display_has_index_and_header() {
        let rendered = totals().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("customer_name"));
        assert!(rendered.contains("Alice"));
        assert!(rendered.contains("210.4"));
        assert!(!rendered.contains("210.40"));
        assert!(rendered.contains("155"));
    }
}
