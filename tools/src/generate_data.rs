//! generate-data: write the synthetic campaign table.
//!
//! Usage:
//!   generate-data
//!   generate-data --seed 7 --start 2024-01-01 --end 2024-03-31 --output data/q1.csv
//!   generate-data --config sim.json

use anyhow::{Context, Result};
use campaign_core::{config::SimConfig, simulator};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = match flag_value(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed)?;
    config.start_date = parse_arg(&args, "--start", config.start_date)?;
    config.end_date = parse_arg(&args, "--end", config.end_date)?;
    if let Some(output) = flag_value(&args, "--output") {
        config.output_path = PathBuf::from(output);
    }

    log::info!(
        "seed={} range={}..={} output={}",
        config.seed,
        config.start_date,
        config.end_date,
        config.output_path.display()
    );

    let records = simulator::run(&config)
        .with_context(|| format!("generating {}", config.output_path.display()))?;
    log::info!("{} rows written", records.len());
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

/// Absent flag → default. Present but unparsable → error.
fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {flag}: '{raw}' ({e})")),
        None => Ok(default),
    }
}
