//! plot-charts: aggregate the campaign table and render the dashboard.
//!
//! Usage:
//!   plot-charts
//!   plot-charts --input data/ecommerce_campaign_data.csv --output-dir dashboards

use anyhow::{Context, Result};
use campaign_core::{
    charts,
    config::DashboardConfig,
    dataset,
    report::DashboardReport,
};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = DashboardConfig::default();
    if let Some(input) = flag_value(&args, "--input") {
        config.input_path = PathBuf::from(input);
    }
    if let Some(dir) = flag_value(&args, "--output-dir") {
        config.output_dir = PathBuf::from(dir);
    }

    let records = dataset::read_records(&config.input_path)
        .with_context(|| format!("reading {}", config.input_path.display()))?;
    let report = DashboardReport::build(&records, config.moving_average_window)
        .context("aggregating campaign data")?;

    let written = charts::render_dashboard(&report, &config.output_dir)
        .context("rendering charts")?;
    let summary = report.write_summary(&config.output_dir)?;

    for path in &written {
        println!("  {}", path.display());
    }
    println!("  {}", summary.display());
    println!();
    print_channel_summary(&report);
    Ok(())
}

fn print_channel_summary(report: &DashboardReport) {
    println!("=== CHANNEL SUMMARY ({} rows) ===", report.row_count);
    for c in &report.channels {
        println!(
            "  {:<13} | Spend: ${:>10.2} | Revenue: ${:>11.2} | ROI: {} | CTR: {}",
            c.channel.label(),
            c.spend,
            c.revenue,
            fmt_ratio(c.metrics.roi),
            fmt_ratio(c.metrics.ctr),
        );
    }
}

fn fmt_ratio(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_else(|| "n/a".into())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
