use anyhow::Context;
use spend_report::config::ReportConfig;
use spend_report::pipeline;

fn main() -> anyhow::Result<()> {
    let config = ReportConfig::default();
    config.logging.init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pipeline::run(&config, &mut out)
        .with_context(|| format!("report run against {} failed", config.db_path.display()))?;
    Ok(())
}
