use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::charts::{self, Chart, ChartKind, ChartRenderer};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::queries;
use crate::report;
use crate::sqlite::SqliteStore;
use crate::transactions::{self, TABLE};

/// What one run left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rows_in_store: usize,
    pub grand_total: f64,
    pub charts: Vec<PathBuf>,
}

/// Seed the store, print the four reports to `out`, render the four charts
/// and close the store, in that order.
pub fn run(config: &ReportConfig, out: &mut impl Write) -> Result<RunSummary> {
    let mut store = SqliteStore::open(&config.db_path)?;
    transactions::initialize(&mut store, config.seed_policy)?;

    let results = queries::run_all(&store)?;
    report::print_reports(out, &results)?;

    let renderer = ChartRenderer::new(config.output_dir.clone(), config.chart_format);
    let jobs = [
        (
            ChartKind::CustomerTotals,
            Chart::Bar(charts::customer_totals_bar(&results.totals)?),
            config.bar_size,
        ),
        (
            ChartKind::CustomerAverages,
            Chart::Bar(charts::customer_averages_bar(&results.averages)?),
            config.bar_size,
        ),
        (
            ChartKind::SpendingDistribution,
            Chart::Pie(charts::spending_pie(&results.totals)?),
            config.pie_size,
        ),
        (
            ChartKind::DailySpending,
            Chart::Line(charts::daily_spending_line(&results.daily_totals)?),
            config.line_size,
        ),
    ];
    let mut written = Vec::with_capacity(jobs.len());
    for (kind, chart, size) in &jobs {
        written.push(renderer.render(*kind, chart, *size)?);
    }

    let summary = RunSummary {
        rows_in_store: store.row_count(TABLE)?,
        grand_total: results.grand_total_value()?,
        charts: written,
    };
    store.close()?;

    info!(
        rows = summary.rows_in_store,
        grand_total = summary.grand_total,
        charts = summary.charts.len(),
        "report complete"
    );
    Ok(summary)
}
