use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::frame::Frame;

/// Core value types for SQLite result cells
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Numeric view of the cell; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Value::Blob(v.to_vec()),
        }
    }
}

/// Shortest decimal form up to six places, keeping one digit after the point:
/// `210.4`, `155.0`, `1145.4`.
fn format_real(value: f64) -> String {
    let mut text = format!("{:.6}", value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    }
    text
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", format_real(*v)),
            Value::Text(v) => write!(f, "{}", v),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// Named SQL statement with no bound parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqlQuery {
    pub name: &'static str,
    pub statement: &'static str,
}

impl SqlQuery {
    pub const fn new(name: &'static str, statement: &'static str) -> Self {
        Self { name, statement }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// DDL for this table. Safe to run against a store that already has it.
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDefinition::to_sql).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            columns.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataType {
    Integer,
    Text,
    Real,
}

impl DataType {
    fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    AutoIncrement,
}

impl ColumnConstraint {
    fn as_sql(self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::AutoIncrement => "AUTOINCREMENT",
        }
    }
}

/// The single open handle to the report database.
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Open the store at `path`, creating the file if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening sqlite store");
        Ok(Self {
            connection: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            connection: Connection::open_in_memory()?,
        })
    }

    pub fn initialize_schema(&self, tables: &[TableDefinition]) -> Result<()> {
        for table in tables {
            let sql = table.create_sql();
            debug!(table = %table.name, %sql, "ensuring table");
            self.connection.execute(&sql, [])?;
        }
        Ok(())
    }

    /// Run `query` and collect every row, keeping the column names.
    pub fn execute_sql(&self, query: &SqlQuery) -> Result<Frame> {
        let mut stmt = self.connection.prepare(query.statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                cells.push(Value::from(row.get_ref(idx)?));
            }
            result.push(cells);
        }
        debug!(query = query.name, rows = result.len(), "query finished");
        Ok(Frame::new(query.name, columns, result))
    }

    pub fn row_count(&self, table: &str) -> Result<usize> {
        let count: i64 = self.connection.query_row(
            &format!("SELECT COUNT(*) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<()> {
        self.connection.close().map_err(|(_, err)| Error::Sqlite(err))?;
        info!("sqlite store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> TableDefinition {
        TableDefinition::new("people")
            .add_column(
                ColumnDefinition::new("id", DataType::Integer)
                    .with_constraint(ColumnConstraint::PrimaryKey)
                    .with_constraint(ColumnConstraint::AutoIncrement),
            )
            .add_column(ColumnDefinition::new("name", DataType::Text))
            .add_column(ColumnDefinition::new("score", DataType::Real))
    }

    #[test]
    fn create_sql_is_idempotent_ddl() {
        assert_eq!(
            people().create_sql(),
            "CREATE TABLE IF NOT EXISTS people (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, score REAL)"
        );
    }

    #[test]
    fn execute_sql_keeps_columns_and_types() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;
        store.initialize_schema(&[people()])?;
        store.initialize_schema(&[people()])?;
        store
            .connection
            .execute("INSERT INTO people (name, score) VALUES ('ada', 1.5), ('bo', NULL)", [])?;

        let frame = store.execute_sql(&SqlQuery::new("people", "SELECT id, name, score FROM people ORDER BY id"))?;
        assert_eq!(frame.columns(), ["id", "name", "score"]);
        assert_eq!(
            frame.rows()[0],
            vec![Value::Integer(1), Value::Text("ada".into()), Value::Real(1.5)]
        );
        assert_eq!(frame.rows()[1][2], Value::Null);
        assert_eq!(store.row_count("people")?, 2);
        store.close()
    }

    #[test]
    fn real_display_drops_trailing_zeros() {
        assert_eq!(Value::Real(210.4).to_string(), "210.4");
        assert_eq!(Value::Real(77.5).to_string(), "77.5");
        assert_eq!(Value::Real(155.0).to_string(), "155.0");
        assert_eq!(Value::Real(120.5 + 89.9).to_string(), "210.4");
        assert_eq!(Value::Real(105.2).to_string(), "105.2");
    }

    #[test]
    fn value_numeric_view() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Real(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Text("x".into()).as_f64(), None);
        assert_eq!(Value::Null.as_str(), None);
    }
}
