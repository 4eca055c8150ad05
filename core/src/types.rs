//! Shared primitive types used across the entire workspace.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An advertising channel.
/// Declaration order is the sampling order. NEVER reorder:
/// it changes which draws each channel receives from the seeded stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "Google Ads")]
    GoogleAds,
    #[serde(rename = "Facebook Ads")]
    FacebookAds,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "Instagram")]
    Instagram,
    #[serde(rename = "LinkedIn")]
    LinkedIn,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::GoogleAds,
        Channel::FacebookAds,
        Channel::Email,
        Channel::Instagram,
        Channel::LinkedIn,
    ];

    /// Stable zero-based position in `Channel::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Self::GoogleAds   => 0,
            Self::FacebookAds => 1,
            Self::Email       => 2,
            Self::Instagram   => 3,
            Self::LinkedIn    => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GoogleAds   => "Google Ads",
            Self::FacebookAds => "Facebook Ads",
            Self::Email       => "Email",
            Self::Instagram   => "Instagram",
            Self::LinkedIn    => "LinkedIn",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("unknown channel '{s}'"))
    }
}

/// One simulated day of activity on one channel.
///
/// Only the base counters live here. Ratios are always recomputed
/// through [`crate::metrics::DerivedMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub date:        NaiveDate,
    pub channel:     Channel,
    pub impressions: u64,
    pub clicks:      u64,
    pub spend:       f64,
    pub conversions: u64,
    pub revenue:     f64,
}

impl CampaignRecord {
    /// `clicks <= impressions` and `conversions <= clicks`.
    pub fn funnel_is_consistent(&self) -> bool {
        self.clicks <= self.impressions && self.conversions <= self.clicks
    }
}

/// Round a currency amount to two decimal places.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
