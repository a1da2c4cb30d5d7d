//! The fixed aggregate queries over the transactions table.

use tracing::info;

use crate::error::Result;
use crate::frame::Frame;
use crate::sqlite::{SqlQuery, SqliteStore};

pub const TOTAL_SPENT: SqlQuery = SqlQuery::new(
    "total_spent",
    "SELECT customer_name, SUM(amount_spent) AS total_spent FROM transactions GROUP BY customer_name",
);

pub const AVERAGE_SPENT: SqlQuery = SqlQuery::new(
    "avg_spent",
    "SELECT customer_name, AVG(amount_spent) AS avg_spent FROM transactions GROUP BY customer_name",
);

pub const LAST_TRANSACTION: SqlQuery = SqlQuery::new(
    "last_transaction",
    "SELECT customer_name, MAX(transaction_date) AS last_transaction FROM transactions GROUP BY customer_name",
);

pub const TOTAL_REVENUE: SqlQuery = SqlQuery::new(
    "total_revenue",
    "SELECT SUM(amount_spent) AS total_revenue FROM transactions",
);

pub const DAILY_TOTAL: SqlQuery = SqlQuery::new(
    "daily_total",
    "SELECT transaction_date, SUM(amount_spent) AS daily_total FROM transactions \
     GROUP BY transaction_date ORDER BY transaction_date",
);

/// The five query results of one run.
#[derive(Debug, Clone)]
pub struct QueryResults {
    pub totals: Frame,
    pub averages: Frame,
    pub last_dates: Frame,
    pub grand_total: Frame,
    pub daily_totals: Frame,
}

impl QueryResults {
    pub fn grand_total_value(&self) -> Result<f64> {
        self.grand_total.scalar_real(TOTAL_REVENUE.name)
    }
}

pub fn run_all(store: &SqliteStore) -> Result<QueryResults> {
    let results = QueryResults {
        totals: store.execute_sql(&TOTAL_SPENT)?,
        averages: store.execute_sql(&AVERAGE_SPENT)?,
        last_dates: store.execute_sql(&LAST_TRANSACTION)?,
        grand_total: store.execute_sql(&TOTAL_REVENUE)?,
        daily_totals: store.execute_sql(&DAILY_TOTAL)?,
    };
    info!(
        customers = results.totals.len(),
        days = results.daily_totals.len(),
        "queries complete"
    );
    Ok(results)
}
