//! CSV persistence for campaign records.
//!
//! RULE: Only dataset.rs reads or writes the campaign table.
//! Derived ratio columns are written for readers of the file but are
//! never read back; downstream code recomputes them from base counters.

use crate::{
    error::{SimError, SimResult},
    metrics::DerivedMetrics,
    types::{CampaignRecord, Channel},
};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const COLUMNS: [&str; 12] = [
    "date", "channel", "impressions", "clicks", "spend", "conversions", "revenue",
    "ctr", "conversion_rate", "cpc", "cpa", "roi",
];

#[derive(Serialize)]
struct CsvRow {
    date:            NaiveDate,
    channel:         Channel,
    impressions:     u64,
    clicks:          u64,
    #[serde(serialize_with = "two_decimals")]
    spend:           f64,
    conversions:     u64,
    #[serde(serialize_with = "two_decimals")]
    revenue:         f64,
    ctr:             Option<f64>,
    conversion_rate: Option<f64>,
    cpc:             Option<f64>,
    cpa:             Option<f64>,
    roi:             Option<f64>,
}

impl From<&CampaignRecord> for CsvRow {
    fn from(r: &CampaignRecord) -> Self {
        let m = DerivedMetrics::for_record(r);
        Self {
            date:            r.date,
            channel:         r.channel,
            impressions:     r.impressions,
            clicks:          r.clicks,
            spend:           r.spend,
            conversions:     r.conversions,
            revenue:         r.revenue,
            ctr:             m.ctr,
            conversion_rate: m.conversion_rate,
            cpc:             m.cpc,
            cpa:             m.cpa,
            roi:             m.roi,
        }
    }
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

/// Serialize records, header first, into any writer. Returns the writer.
pub fn write_csv<W: Write>(out: W, records: &[CampaignRecord]) -> SimResult<W> {
    let mut writer = csv::Writer::from_writer(out);
    if records.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| SimError::Other(anyhow::anyhow!("flushing CSV writer: {}", e.error())))
}

/// Write the table to `path` atomically: a sibling temp file is written
/// and then renamed over the destination. On failure nothing is left at
/// `path` and the temp file is removed.
pub fn write_records(path: &Path, records: &[CampaignRecord]) -> SimResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SimError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, records);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn write_then_rename(tmp: &Path, path: &Path, records: &[CampaignRecord]) -> SimResult<()> {
    let file = File::create(tmp).map_err(|e| SimError::io(tmp, e))?;
    let file = write_csv(file, records)?;
    file.sync_all().map_err(|e| SimError::io(tmp, e))?;
    drop(file);
    fs::rename(tmp, path).map_err(|e| SimError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read the base columns of every row.
pub fn read_records(path: &Path) -> SimResult<Vec<CampaignRecord>> {
    let file = File::open(path).map_err(|e| SimError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let records = reader
        .deserialize::<CampaignRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}
