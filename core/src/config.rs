use crate::{
    calendar::DateRange,
    error::SimResult,
    types::Channel,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_OUTPUT_PATH: &str = "data/ecommerce_campaign_data.csv";
pub const DEFAULT_DASHBOARD_DIR: &str = "dashboards";
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 7;

/// Sampling parameters for the per-channel generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelModel {
    /// Poisson mean for the first channel.
    pub base_impressions: f64,
    /// Added to the Poisson mean per channel index.
    pub impressions_step: f64,
    pub click_probability: f64,
    /// Uniform cost-per-click bounds for paid channels.
    pub cpc_range: (f64, f64),
    /// Email is not auctioned: flat cost per click, no draw.
    pub email_cpc: f64,
    pub base_conversion_rate: f64,
    pub conversion_rate_step: f64,
    pub max_conversion_rate: f64,
    /// Uniform average-order-value bounds.
    pub aov_range: (f64, f64),
}

impl Default for ChannelModel {
    fn default() -> Self {
        Self {
            base_impressions:     1000.0,
            impressions_step:     50.0,
            click_probability:    0.05,
            cpc_range:            (0.5, 2.0),
            email_cpc:            0.1,
            base_conversion_rate: 0.02,
            conversion_rate_step: 0.005,
            max_conversion_rate:  0.3,
            aov_range:            (50.0, 150.0),
        }
    }
}

impl ChannelModel {
    pub fn impressions_mean(&self, channel: Channel) -> f64 {
        self.base_impressions + self.impressions_step * channel.index() as f64
    }

    pub fn conversion_probability(&self, channel: Channel) -> f64 {
        let base = self.base_conversion_rate + self.conversion_rate_step * channel.index() as f64;
        base.min(self.max_conversion_rate)
    }

    /// `None` means the channel draws its CPC from `cpc_range`.
    pub fn fixed_cpc(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Email => Some(self.email_cpc),
            _ => None,
        }
    }
}

/// Parameters of one simulator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub start_date:  NaiveDate,
    pub end_date:    NaiveDate,
    pub seed:        u64,
    pub output_path: PathBuf,
    pub model:       ChannelModel,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_date:  NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date:    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap_or_default(),
            seed:        DEFAULT_SEED,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            model:       ChannelModel::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing keys fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Two weeks in January, same model. Used by tests.
    pub fn default_test() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date:   NaiveDate::from_ymd_opt(2024, 1, 14).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn date_range(&self) -> SimResult<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.date_range().map(|_| ())
    }
}

/// Parameters of the aggregation and chart stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub input_path:            PathBuf,
    pub output_dir:            PathBuf,
    pub moving_average_window: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input_path:            PathBuf::from(DEFAULT_OUTPUT_PATH),
            output_dir:            PathBuf::from(DEFAULT_DASHBOARD_DIR),
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }
}
