//! Groupings over the campaign table.
//!
//! Every function here is a pure function of its input: no hidden state,
//! safe to recompute. An empty input fails with `EmptyDataset`.
//! Ratios are recomputed from summed counters, never averaged.

use crate::{
    calendar::month_start,
    error::{SimError, SimResult},
    metrics::{self, DerivedMetrics},
    types::{CampaignRecord, Channel},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn require_rows<T>(rows: &[T], operation: &'static str) -> SimResult<()> {
    if rows.is_empty() {
        return Err(SimError::EmptyDataset { operation });
    }
    Ok(())
}

// ── Daily totals ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date:               NaiveDate,
    pub spend:              f64,
    pub revenue:            f64,
    /// Trailing mean over at most `window` days ending today.
    pub spend_moving_avg:   f64,
    pub revenue_moving_avg: f64,
    pub cumulative_spend:   f64,
    pub cumulative_revenue: f64,
}

/// Spend and revenue per date, ascending, with trailing moving averages
/// (minimum window 1) and running totals.
pub fn daily_totals(records: &[CampaignRecord], window: usize) -> SimResult<Vec<DailyTotals>> {
    require_rows(records, "daily totals")?;
    let window = window.max(1);

    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for r in records {
        let entry = by_date.entry(r.date).or_insert((0.0, 0.0));
        entry.0 += r.spend;
        entry.1 += r.revenue;
    }

    let sums: Vec<(NaiveDate, f64, f64)> =
        by_date.into_iter().map(|(d, (s, rev))| (d, s, rev)).collect();
    let spend: Vec<f64> = sums.iter().map(|(_, s, _)| *s).collect();
    let revenue: Vec<f64> = sums.iter().map(|(_, _, r)| *r).collect();
    let spend_ma = trailing_mean(&spend, window);
    let revenue_ma = trailing_mean(&revenue, window);

    let mut cumulative_spend = 0.0;
    let mut cumulative_revenue = 0.0;
    let rows = sums
        .iter()
        .enumerate()
        .map(|(i, (date, s, rev))| {
            cumulative_spend += s;
            cumulative_revenue += rev;
            DailyTotals {
                date: *date,
                spend: *s,
                revenue: *rev,
                spend_moving_avg: spend_ma[i],
                revenue_moving_avg: revenue_ma[i],
                cumulative_spend,
                cumulative_revenue,
            }
        })
        .collect();
    Ok(rows)
}

/// Mean of the last `window` values ending at each index. The first
/// `window - 1` entries average however many values exist so far.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

// ── Channel totals ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelTotals {
    pub channel:     Channel,
    pub impressions: u64,
    pub clicks:      u64,
    pub conversions: u64,
    pub spend:       f64,
    pub revenue:     f64,
    pub metrics:     DerivedMetrics,
}

impl ChannelTotals {
    fn empty(channel: Channel) -> Self {
        Self {
            channel,
            impressions: 0,
            clicks: 0,
            conversions: 0,
            spend: 0.0,
            revenue: 0.0,
            metrics: DerivedMetrics::default(),
        }
    }
}

/// Sums per channel, in `Channel::ALL` order, for channels present in
/// the input. Ratios are derived from the sums.
pub fn channel_totals(records: &[CampaignRecord]) -> SimResult<Vec<ChannelTotals>> {
    require_rows(records, "channel totals")?;

    let mut slots: Vec<Option<ChannelTotals>> = vec![None; Channel::ALL.len()];
    for r in records {
        let t = slots[r.channel.index()].get_or_insert_with(|| ChannelTotals::empty(r.channel));
        t.impressions += r.impressions;
        t.clicks += r.clicks;
        t.conversions += r.conversions;
        t.spend += r.spend;
        t.revenue += r.revenue;
    }

    let totals = slots
        .into_iter()
        .flatten()
        .map(|mut t| {
            t.metrics = DerivedMetrics::from_counts(
                t.impressions,
                t.clicks,
                t.conversions,
                t.spend,
                t.revenue,
            );
            log::debug!(
                "channel={} spend={:.2} revenue={:.2} roi={:?}",
                t.channel,
                t.spend,
                t.revenue,
                t.metrics.roi
            );
            t
        })
        .collect();
    Ok(totals)
}

// ── Monthly totals per channel ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyChannelTotals {
    /// First day of the month.
    pub month:   NaiveDate,
    pub channel: Channel,
    pub spend:   f64,
    pub revenue: f64,
    pub roi:     Option<f64>,
}

/// Spend and revenue per (month, channel), ordered by month then channel.
pub fn monthly_channel_totals(records: &[CampaignRecord]) -> SimResult<Vec<MonthlyChannelTotals>> {
    require_rows(records, "monthly channel totals")?;

    let mut cells: BTreeMap<(NaiveDate, Channel), (f64, f64)> = BTreeMap::new();
    for r in records {
        let cell = cells.entry((month_start(r.date), r.channel)).or_insert((0.0, 0.0));
        cell.0 += r.spend;
        cell.1 += r.revenue;
    }

    Ok(cells
        .into_iter()
        .map(|((month, channel), (spend, revenue))| MonthlyChannelTotals {
            month,
            channel,
            spend,
            revenue,
            roi: metrics::roi(revenue, spend),
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyValue {
    Spend,
    Revenue,
    Roi,
}

/// Channel × month matrix for display. Cells with no data, and null ROI,
/// are 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPivot {
    pub value:    MonthlyValue,
    pub months:   Vec<NaiveDate>,
    pub channels: Vec<Channel>,
    /// `cells[channel_row][month_column]`
    pub cells:    Vec<Vec<f64>>,
}

impl MonthlyPivot {
    pub fn get(&self, channel: Channel, month: NaiveDate) -> Option<f64> {
        let row = self.channels.iter().position(|c| *c == channel)?;
        let col = self.months.iter().position(|m| *m == month)?;
        Some(self.cells[row][col])
    }
}

pub fn monthly_pivot(
    monthly: &[MonthlyChannelTotals],
    value: MonthlyValue,
) -> SimResult<MonthlyPivot> {
    require_rows(monthly, "monthly pivot")?;

    let mut months: Vec<NaiveDate> = monthly.iter().map(|m| m.month).collect();
    months.sort();
    months.dedup();
    let mut channels: Vec<Channel> = monthly.iter().map(|m| m.channel).collect();
    channels.sort();
    channels.dedup();

    let mut cells = vec![vec![0.0; months.len()]; channels.len()];
    for m in monthly {
        let row = channels.binary_search(&m.channel).unwrap_or_default();
        let col = months.binary_search(&m.month).unwrap_or_default();
        cells[row][col] = match value {
            MonthlyValue::Spend => m.spend,
            MonthlyValue::Revenue => m.revenue,
            MonthlyValue::Roi => m.roi.unwrap_or(0.0),
        };
    }

    Ok(MonthlyPivot { value, months, channels, cells })
}

// ── Funnel ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Impressions,
    Clicks,
    Conversions,
    Revenue,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 4] = [
        FunnelStage::Impressions,
        FunnelStage::Clicks,
        FunnelStage::Conversions,
        FunnelStage::Revenue,
    ];

    /// Revenue is currency per impression, not a share of impressions,
    /// so it is not comparable with the count stages.
    pub fn is_count(&self) -> bool {
        !matches!(self, Self::Revenue)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Impressions => "Impressions",
            Self::Clicks      => "Clicks",
            Self::Conversions => "Conversions",
            Self::Revenue     => "Revenue",
        }
    }
}

/// Each stage divided by the channel's impressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelRow {
    pub channel:     Channel,
    pub impressions: Option<f64>,
    pub clicks:      Option<f64>,
    pub conversions: Option<f64>,
    pub revenue:     Option<f64>,
}

impl FunnelRow {
    pub fn stage(&self, stage: FunnelStage) -> Option<f64> {
        match stage {
            FunnelStage::Impressions => self.impressions,
            FunnelStage::Clicks      => self.clicks,
            FunnelStage::Conversions => self.conversions,
            FunnelStage::Revenue     => self.revenue,
        }
    }
}

pub fn funnel(totals: &[ChannelTotals]) -> SimResult<Vec<FunnelRow>> {
    require_rows(totals, "funnel")?;
    Ok(totals
        .iter()
        .map(|t| {
            let top = t.impressions as f64;
            FunnelRow {
                channel:     t.channel,
                impressions: metrics::ratio(top, top),
                clicks:      metrics::ratio(t.clicks as f64, top),
                conversions: metrics::ratio(t.conversions as f64, top),
                revenue:     metrics::ratio(t.revenue, top),
            }
        })
        .collect())
}

// ── Pareto ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    /// 1-based, highest revenue first.
    pub rank:               usize,
    pub channel:            Channel,
    pub revenue:            f64,
    pub cumulative_revenue: f64,
    /// Cumulative revenue as a percentage of the total. `None` when the
    /// total is zero.
    pub cumulative_pct:     Option<f64>,
}

/// Channels by revenue descending, ties kept in channel order.
pub fn pareto(totals: &[ChannelTotals]) -> SimResult<Vec<ParetoRow>> {
    require_rows(totals, "pareto ranking")?;

    let mut sorted: Vec<&ChannelTotals> = totals.iter().collect();
    sorted.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    // Summed in rank order so the last cumulative value equals the total.
    let total: f64 = sorted.iter().map(|t| t.revenue).sum();

    let mut cumulative = 0.0;
    Ok(sorted
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            cumulative += t.revenue;
            ParetoRow {
                rank: i + 1,
                channel: t.channel,
                revenue: t.revenue,
                cumulative_revenue: cumulative,
                cumulative_pct: metrics::ratio(cumulative, total).map(|r| r * 100.0),
            }
        })
        .collect())
}

// ── Efficiency scatter ───────────────────────────────────────────────────────

/// One bubble of the CTR vs conversion-rate chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyPoint {
    pub channel:         Channel,
    pub ctr:             f64,
    pub conversion_rate: f64,
    pub spend:           f64,
}

/// Channels with both ratios defined.
pub fn efficiency_points(totals: &[ChannelTotals]) -> SimResult<Vec<EfficiencyPoint>> {
    require_rows(totals, "efficiency scatter")?;
    Ok(totals
        .iter()
        .filter_map(|t| {
            Some(EfficiencyPoint {
                channel: t.channel,
                ctr: t.metrics.ctr?,
                conversion_rate: t.metrics.conversion_rate?,
                spend: t.spend,
            })
        })
        .collect())
}
