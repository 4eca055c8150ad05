//! The campaign simulator.
//!
//! DRAW ORDER (fixed, documented, never reordered):
//!   for each date in the range, ascending
//!     for each channel in `Channel::ALL`
//!       1. impressions  ~ Poisson(mean for channel)
//!       2. clicks       ~ Binomial(impressions, click probability)
//!       3. cpc          ~ Uniform(cpc range)   (skipped for fixed-CPC channels)
//!       4. conversions  ~ Binomial(clicks, conversion probability)
//!       5. aov          ~ Uniform(aov range)
//!
//! Changing this order changes every value after the change point.

use crate::{
    calendar::DateRange,
    config::{ChannelModel, SimConfig},
    dataset,
    error::SimResult,
    rng::CampaignRng,
    types::{round_cents, CampaignRecord, Channel},
};
use chrono::NaiveDate;
use std::path::Path;

pub struct CampaignSimulator {
    range: DateRange,
    model: ChannelModel,
}

impl CampaignSimulator {
    pub fn new(range: DateRange, model: ChannelModel) -> Self {
        Self { range, model }
    }

    pub fn from_config(config: &SimConfig) -> SimResult<Self> {
        Ok(Self::new(config.date_range()?, config.model.clone()))
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Generate the full table, consuming `rng` in the documented order.
    pub fn simulate(&self, rng: &mut CampaignRng) -> SimResult<Vec<CampaignRecord>> {
        let mut records = Vec::with_capacity(self.range.len() * Channel::ALL.len());
        for date in self.range.days() {
            records.extend(self.simulate_date(date, rng)?);
        }
        Ok(records)
    }

    /// One row per channel for `date`, in channel order.
    pub fn simulate_date(
        &self,
        date: NaiveDate,
        rng: &mut CampaignRng,
    ) -> SimResult<Vec<CampaignRecord>> {
        let rows = Channel::ALL
            .into_iter()
            .map(|channel| self.simulate_day(date, channel, rng))
            .collect::<SimResult<Vec<_>>>()?;
        log::debug!("date={date} simulated {} channels", rows.len());
        Ok(rows)
    }

    fn simulate_day(
        &self,
        date: NaiveDate,
        channel: Channel,
        rng: &mut CampaignRng,
    ) -> SimResult<CampaignRecord> {
        let m = &self.model;

        let impressions = rng.poisson(m.impressions_mean(channel))?;
        let clicks = rng.binomial(impressions, m.click_probability)?;
        let cpc = match m.fixed_cpc(channel) {
            Some(cpc) => cpc,
            None => rng.uniform(m.cpc_range.0, m.cpc_range.1)?,
        };
        let conversions = rng.binomial(clicks, m.conversion_probability(channel))?;
        let aov = rng.uniform(m.aov_range.0, m.aov_range.1)?;

        if impressions == 0 {
            log::warn!("date={date} channel={channel}: zero impressions, ratios will be null");
        }

        Ok(CampaignRecord {
            date,
            channel,
            impressions,
            clicks,
            spend: round_cents(clicks as f64 * cpc),
            conversions,
            revenue: round_cents(conversions as f64 * aov),
        })
    }
}

/// Simulate `config` and write the table to `config.output_path`.
pub fn run(config: &SimConfig) -> SimResult<Vec<CampaignRecord>> {
    let simulator = CampaignSimulator::from_config(config)?;
    let mut rng = CampaignRng::new(config.seed);
    let records = simulator.simulate(&mut rng)?;
    dataset::write_records(&config.output_path, &records)?;
    log::info!(
        "Simulated {} days x {} channels (seed={})",
        simulator.range().len(),
        Channel::ALL.len(),
        rng.seed()
    );
    println!("{}", completion_notice(&config.output_path));
    Ok(records)
}

pub fn completion_notice(output_path: &Path) -> String {
    format!("Synthetic data saved to {}", output_path.display())
}

/// Generate the table for `[start_date, end_date]` with the default
/// channel model and write it to `output_path`.
pub fn generate(
    start_date: NaiveDate,
    end_date: NaiveDate,
    seed: u64,
    output_path: &Path,
) -> SimResult<Vec<CampaignRecord>> {
    let config = SimConfig {
        start_date,
        end_date,
        seed,
        output_path: output_path.to_path_buf(),
        ..SimConfig::default()
    };
    run(&config)
}
