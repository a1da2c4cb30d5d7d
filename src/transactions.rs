//! Transaction records and the store initializer.

use rusqlite::params;
use tracing::{info, warn};

use crate::error::Result;
use crate::sqlite::{ColumnConstraint, ColumnDefinition, DataType, SqliteStore, TableDefinition};

pub const TABLE: &str = "transactions";

/// One customer purchase. The store assigns the id on insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionRecord {
    pub customer_name: &'static str,
    pub amount_spent: f64,
    /// ISO-8601 calendar date, stored as text.
    pub transaction_date: &'static str,
}

const fn record(
    customer_name: &'static str,
    amount_spent: f64,
    transaction_date: &'static str,
) -> TransactionRecord {
    TransactionRecord {
        customer_name,
        amount_spent,
        transaction_date,
    }
}

pub const SAMPLE_TRANSACTIONS: [TransactionRecord; 9] = [
    record("Alice", 120.50, "2024-12-01"),
    record("Bob", 95.00, "2024-12-03"),
    record("Alice", 89.90, "2025-01-10"),
    record("Charlie", 150.00, "2025-02-14"),
    record("Bob", 60.00, "2025-03-01"),
    record("Diana", 200.00, "2025-03-05"),
    record("Charlie", 130.00, "2025-04-01"),
    record("Eve", 220.00, "2025-04-10"),
    record("Eve", 80.00, "2025-04-15"),
];

/// How seeding treats a table that already holds rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Insert the sample rows on every run; re-runs accumulate duplicates.
    #[default]
    Append,
    /// Insert only when the table is empty.
    SkipIfPopulated,
}

pub fn transactions_table() -> TableDefinition {
    TableDefinition::new(TABLE)
        .add_column(
            ColumnDefinition::new("id", DataType::Integer)
                .with_constraint(ColumnConstraint::PrimaryKey)
                .with_constraint(ColumnConstraint::AutoIncrement),
        )
        .add_column(ColumnDefinition::new("customer_name", DataType::Text))
        .add_column(ColumnDefinition::new("amount_spent", DataType::Real))
        .add_column(ColumnDefinition::new("transaction_date", DataType::Text))
}

/// Insert `records` in one transaction. Returns the number of rows inserted.
pub fn seed(store: &mut SqliteStore, records: &[TransactionRecord], policy: SeedPolicy) -> Result<usize> {
    if policy == SeedPolicy::SkipIfPopulated {
        let existing = store.row_count(TABLE)?;
        if existing > 0 {
            info!(existing, "table already populated, skipping seed");
            return Ok(0);
        }
    }

    let tx = store.connection_mut().transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions (customer_name, amount_spent, transaction_date) VALUES (?1, ?2, ?3)",
        )?;
        for r in records {
            stmt.execute(params![r.customer_name, r.amount_spent, r.transaction_date])?;
        }
    }
    tx.commit()?;
    Ok(records.len())
}

/// Ensure the transactions table exists and seed it with the sample rows.
pub fn initialize(store: &mut SqliteStore, policy: SeedPolicy) -> Result<usize> {
    store.initialize_schema(&[transactions_table()])?;
    let inserted = seed(store, &SAMPLE_TRANSACTIONS, policy)?;
    let total = store.row_count(TABLE)?;
    if policy == SeedPolicy::Append && total > inserted {
        warn!(total, inserted, "sample rows appended to an existing data set");
    }
    info!(inserted, total, "store initialized");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_is_fixed() {
        let total: f64 = SAMPLE_TRANSACTIONS.iter().map(|r| r.amount_spent).sum();
        assert!((total - 1145.40).abs() < 1e-9);
        assert!(SAMPLE_TRANSACTIONS
            .iter()
            .all(|r| chrono::NaiveDate::parse_from_str(r.transaction_date, "%Y-%m-%d").is_ok()));
    }

    #[test]
    fn skip_policy_guards_reseed() -> Result<()> {
        let mut store = SqliteStore::open_in_memory()?;
        assert_eq!(initialize(&mut store, SeedPolicy::SkipIfPopulated)?, 9);
        assert_eq!(initialize(&mut store, SeedPolicy::SkipIfPopulated)?, 0);
        assert_eq!(store.row_count(TABLE)?, 9);
        Ok(())
    }

    #[test]
    fn append_policy_accumulates() -> Result<()> {
        let mut store = SqliteStore::open_in_memory()?;
        initialize(&mut store, SeedPolicy::Append)?;
        initialize(&mut store, SeedPolicy::Append)?;
        assert_eq!(store.row_count(TABLE)?, 18);
        Ok(())
    }
}
