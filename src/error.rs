use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid date '{value}': {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("column '{column}' not found in result of {query}")]
    MissingColumn { query: String, column: String },

    #[error("column '{column}' holds a non-{expected} value in row {row}")]
    ColumnType {
        column: String,
        expected: &'static str,
        row: usize,
    },

    #[error("query {0} returned no rows")]
    EmptyResult(String),

    #[error("chart error: {0}")]
    Chart(String),
}

pub type Result<T> = std::result::Result<T, Error>;
