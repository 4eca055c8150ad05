//! Null-on-zero-denominator rule for derived ratios.

use campaign_core::{
    dataset,
    metrics::DerivedMetrics,
    types::{CampaignRecord, Channel},
};
use chrono::NaiveDate;

fn record(impressions: u64, clicks: u64, conversions: u64, spend: f64, revenue: f64) -> CampaignRecord {
    CampaignRecord {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        channel: Channel::Instagram,
        impressions,
        clicks,
        spend,
        conversions,
        revenue,
    }
}

#[test]
fn zero_clicks_nulls_conversion_rate_and_cpc() {
    let m = DerivedMetrics::for_record(&record(900, 0, 0, 0.0, 0.0));

    assert_eq!(m.ctr, Some(0.0), "ctr is defined: impressions > 0");
    assert_eq!(m.conversion_rate, None);
    assert_eq!(m.cpc, None);
    assert_eq!(m.cpa, None);
    assert_eq!(m.roi, None, "zero spend leaves ROI undefined");
}

/// Zero impressions follows the same rule: CTR is null, nothing panics.
#[test]
fn zero_impressions_nulls_ctr() {
    let m = DerivedMetrics::for_record(&record(0, 0, 0, 0.0, 0.0));
    assert_eq!(m, DerivedMetrics::default());
}

#[test]
fn zero_conversions_nulls_cpa_only() {
    let m = DerivedMetrics::for_record(&record(1000, 40, 0, 30.0, 0.0));

    assert_eq!(m.ctr, Some(0.04));
    assert_eq!(m.conversion_rate, Some(0.0));
    assert_eq!(m.cpc, Some(0.75));
    assert_eq!(m.cpa, None);
    assert_eq!(m.roi, Some(-1.0));
}

/// Null ratios are written as empty CSV fields, never as 0 or NaN.
#[test]
fn null_ratios_are_empty_fields_in_csv() {
    let rows = [record(0, 0, 0, 0.0, 0.0), record(1000, 50, 2, 50.0, 200.0)];
    let bytes = dataset::write_csv(Vec::new(), &rows).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "date,channel,impressions,clicks,spend,conversions,revenue,ctr,conversion_rate,cpc,cpa,roi"
    );
    assert_eq!(lines[1], "2024-01-01,Instagram,0,0,0.00,0,0.00,,,,,");
    assert_eq!(lines[2], "2024-01-01,Instagram,1000,50,50.00,2,200.00,0.05,0.04,1.0,25.0,3.0");
    assert!(!text.contains("NaN") && !text.contains("inf"));
}
