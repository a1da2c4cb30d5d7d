//! Run configuration. The defaults reproduce the fixed report; there is no
//! CLI or file surface.

use std::path::PathBuf;

use tracing_subscriber::{fmt, EnvFilter};

use crate::charts::ChartFormat;
use crate::transactions::SeedPolicy;

pub const DEFAULT_DB_PATH: &str = "customer_data.db";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// SQLite file; created when missing.
    pub db_path: PathBuf,
    /// Directory the chart files are written to.
    pub output_dir: PathBuf,
    pub chart_format: ChartFormat,
    pub seed_policy: SeedPolicy,
    pub bar_size: (u32, u32),
    pub pie_size: (u32, u32),
    pub line_size: (u32, u32),
    pub logging: LoggingConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            output_dir: PathBuf::from("."),
            chart_format: ChartFormat::default(),
            seed_policy: SeedPolicy::Append,
            bar_size: (640, 480),
            pie_size: (600, 600),
            line_size: (800, 400),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    /// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
    /// Logs go to stderr so stdout carries only the report.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}
