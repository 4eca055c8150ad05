//! Every summary table the dashboard needs, computed once.

use crate::{
    aggregation::{
        self, ChannelTotals, DailyTotals, EfficiencyPoint, FunnelRow, MonthlyChannelTotals,
        MonthlyPivot, MonthlyValue, ParetoRow,
    },
    error::{SimError, SimResult},
    types::CampaignRecord,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub row_count:      usize,
    pub daily:          Vec<DailyTotals>,
    pub channels:       Vec<ChannelTotals>,
    pub monthly:        Vec<MonthlyChannelTotals>,
    pub monthly_spend:  MonthlyPivot,
    pub monthly_roi:    MonthlyPivot,
    pub funnel:         Vec<FunnelRow>,
    pub pareto:         Vec<ParetoRow>,
    pub efficiency:     Vec<EfficiencyPoint>,
}

impl DashboardReport {
    pub fn build(records: &[CampaignRecord], moving_average_window: usize) -> SimResult<Self> {
        let daily = aggregation::daily_totals(records, moving_average_window)?;
        let channels = aggregation::channel_totals(records)?;
        let monthly = aggregation::monthly_channel_totals(records)?;
        let monthly_spend = aggregation::monthly_pivot(&monthly, MonthlyValue::Spend)?;
        let monthly_roi = aggregation::monthly_pivot(&monthly, MonthlyValue::Roi)?;
        let funnel = aggregation::funnel(&channels)?;
        let pareto = aggregation::pareto(&channels)?;
        let efficiency = aggregation::efficiency_points(&channels)?;

        log::info!(
            "Aggregated {} rows: {} days, {} channels, {} months",
            records.len(),
            daily.len(),
            channels.len(),
            monthly_spend.months.len()
        );

        Ok(Self {
            row_count: records.len(),
            daily,
            channels,
            monthly,
            monthly_spend,
            monthly_roi,
            funnel,
            pareto,
            efficiency,
        })
    }

    /// Write the report as pretty JSON into `dir`.
    pub fn write_summary(&self, dir: &Path) -> SimResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| SimError::io(dir, e))?;
        let path = dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|e| SimError::io(&path, e))?;
        Ok(path)
    }
}
