use std::io::Write;

use crate::error::Result;
use crate::frame::Frame;
use crate::queries::QueryResults;

pub const TOTALS_LABEL: &str = "💳 Total Spent by Customer:";
pub const AVERAGES_LABEL: &str = "📈 Average Spending per Transaction:";
pub const LAST_DATES_LABEL: &str = "🕒 Last Transaction Date per Customer:";
pub const GRAND_TOTAL_LABEL: &str = "🧾 Total Revenue from All Customers:";

fn print_frame(out: &mut impl Write, label: &str, frame: &Frame) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", label)?;
    writeln!(out, "{}", frame)?;
    Ok(())
}

/// Print the first four results, each under its fixed label.
pub fn print_reports(out: &mut impl Write, results: &QueryResults) -> Result<()> {
    print_frame(out, TOTALS_LABEL, &results.totals)?;
    print_frame(out, AVERAGES_LABEL, &results.averages)?;
    print_frame(out, LAST_DATES_LABEL, &results.last_dates)?;
    print_frame(out, GRAND_TOTAL_LABEL, &results.grand_total)?;
    out.flush()?;
    Ok(())
}
