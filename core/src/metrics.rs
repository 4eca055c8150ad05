//! Ratio metrics derived from base counters.
//!
//! RULE: a ratio with a zero denominator is `None`. It is never zero,
//! never NaN, and never an error.

use crate::types::CampaignRecord;
use serde::{Deserialize, Serialize};

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// clicks / impressions
    pub ctr:             Option<f64>,
    /// conversions / clicks
    pub conversion_rate: Option<f64>,
    /// spend / clicks
    pub cpc:             Option<f64>,
    /// spend / conversions
    pub cpa:             Option<f64>,
    /// (revenue - spend) / spend
    pub roi:             Option<f64>,
}

impl DerivedMetrics {
    pub fn from_counts(
        impressions: u64,
        clicks: u64,
        conversions: u64,
        spend: f64,
        revenue: f64,
    ) -> Self {
        let impressions = impressions as f64;
        let clicks = clicks as f64;
        let conversions = conversions as f64;
        Self {
            ctr:             ratio(clicks, impressions),
            conversion_rate: ratio(conversions, clicks),
            cpc:             ratio(spend, clicks),
            cpa:             ratio(spend, conversions),
            roi:             roi(revenue, spend),
        }
    }

    pub fn for_record(record: &CampaignRecord) -> Self {
        Self::from_counts(
            record.impressions,
            record.clicks,
            record.conversions,
            record.spend,
            record.revenue,
        )
    }
}

/// Return on investment, `(revenue - spend) / spend`.
pub fn roi(revenue: f64, spend: f64) -> Option<f64> {
    ratio(revenue - spend, spend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominators_are_none() {
        let m = DerivedMetrics::from_counts(0, 0, 0, 0.0, 0.0);
        assert_eq!(m, DerivedMetrics::default());
    }

    #[test]
    fn ratios_use_the_right_denominators() {
        let m = DerivedMetrics::from_counts(1000, 50, 5, 25.0, 100.0);
        assert_eq!(m.ctr, Some(0.05));
        assert_eq!(m.conversion_rate, Some(0.1));
        assert_eq!(m.cpc, Some(0.5));
        assert_eq!(m.cpa, Some(5.0));
        assert_eq!(m.roi, Some(3.0));
    }
}
