//! Customer spending reports backed by a local SQLite store.
//!
//! # Intention
//!
//! - Seed a file-backed SQLite store with the fixed sample transactions.
//! - Run the fixed aggregate queries and print them as labeled tables.
//! - Render the bar, pie and line charts for those results to disk.
//!
//! # Architectural Boundaries
//!
//! - [`sqlite`] and [`frame`] know about SQLite and tabular results, nothing else.
//! - [`transactions`] and [`queries`] own the data set and the SQL.
//! - [`report`] and [`charts`] only consume [`frame::Frame`]s.
//! - [`pipeline`] sequences the stages; it holds the only open connection.

pub mod charts;
pub mod config;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod queries;
pub mod report;
pub mod sqlite;
pub mod transactions;

pub use error::{Error, Result};
