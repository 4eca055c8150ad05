//! Simulator tests: row shape, count invariants, error conditions.

use campaign_core::{
    calendar::DateRange,
    config::{ChannelModel, SimConfig},
    error::SimError,
    metrics::DerivedMetrics,
    rng::CampaignRng,
    simulator::{self, CampaignSimulator},
    types::{CampaignRecord, Channel},
};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn simulate_default(seed: u64) -> Vec<CampaignRecord> {
    let config = SimConfig::default();
    CampaignSimulator::from_config(&config)
        .unwrap()
        .simulate(&mut CampaignRng::new(seed))
        .unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// 2024-01-01 ..= 2024-06-30 is 182 days, five channels each.
#[test]
fn default_range_yields_one_row_per_day_and_channel() {
    let records = simulate_default(42);
    let range = SimConfig::default().date_range().unwrap();
    assert_eq!(records.len(), 182 * 5);

    for (i, r) in records.iter().enumerate() {
        assert_eq!(r.channel, Channel::ALL[i % 5], "channel order broken at row {i}");
        assert!(
            range.contains(r.date),
            "row {i} date {} outside range",
            r.date
        );
    }
}

#[test]
fn counts_respect_funnel_invariants() {
    for seed in [1, 42, 2024] {
        for r in simulate_default(seed) {
            assert!(
                r.funnel_is_consistent(),
                "seed={seed} {} {}: impressions={} clicks={} conversions={}",
                r.date,
                r.channel,
                r.impressions,
                r.clicks,
                r.conversions
            );
            assert!(r.spend >= 0.0 && r.revenue >= 0.0);
        }
    }
}

#[test]
fn money_columns_are_rounded_to_cents() {
    for r in simulate_default(42) {
        for v in [r.spend, r.revenue] {
            assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-6, "{v} not rounded");
        }
    }
}

/// Email pays a flat 0.1 per click.
#[test]
fn email_spend_uses_flat_cpc() {
    for r in simulate_default(42).iter().filter(|r| r.channel == Channel::Email) {
        let expected = (r.clicks as f64 * 0.1 * 100.0).round() / 100.0;
        assert_eq!(r.spend, expected, "email spend on {}", r.date);
    }
}

/// Paid channels draw CPC from [0.5, 2.0).
#[test]
fn paid_channel_cpc_within_bounds() {
    for r in simulate_default(42).iter().filter(|r| r.channel != Channel::Email && r.clicks > 0) {
        let cpc = r.spend / r.clicks as f64;
        // Cent rounding can nudge the effective CPC slightly outside.
        assert!(cpc > 0.49 && cpc < 2.01, "{} cpc {cpc} out of range", r.channel);
    }
}

#[test]
fn single_day_range_yields_five_rows() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("one_day.csv");

    let records = simulator::generate(date(2024, 1, 1), date(2024, 1, 1), 42, &out).unwrap();

    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.date == date(2024, 1, 1)));
    let channels: Vec<Channel> = records.iter().map(|r| r.channel).collect();
    assert_eq!(channels, Channel::ALL.to_vec());

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 6, "header plus five rows");
}

#[test]
fn inverted_range_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never.csv");

    let err = simulator::generate(date(2024, 2, 1), date(2024, 1, 1), 42, &out).unwrap_err();

    assert!(matches!(err, SimError::InvalidRange { .. }), "got {err:?}");
    assert!(!out.exists(), "no file may be written on failure");
}

#[test]
fn unwritable_output_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();
    let out = blocker.join("data.csv");

    let err = simulator::generate(date(2024, 1, 1), date(2024, 1, 3), 42, &out).unwrap_err();

    assert!(matches!(err, SimError::Io { .. }), "got {err:?}");
}

/// Impressions centre on 1000 + 50 × channel index.
#[test]
fn impression_means_follow_channel_index() {
    let records = simulate_default(42);
    for channel in Channel::ALL {
        let rows: Vec<_> = records.iter().filter(|r| r.channel == channel).collect();
        let mean = rows.iter().map(|r| r.impressions as f64).sum::<f64>() / rows.len() as f64;
        let expected = 1000.0 + 50.0 * channel.index() as f64;
        assert!(
            (mean - expected).abs() < 15.0,
            "{channel}: mean impressions {mean:.1}, expected ~{expected}"
        );
    }
}

#[test]
fn conversion_probability_is_capped() {
    let model = ChannelModel {
        conversion_rate_step: 0.2,
        ..ChannelModel::default()
    };
    assert_eq!(model.conversion_probability(Channel::GoogleAds), 0.02);
    assert_eq!(model.conversion_probability(Channel::LinkedIn), 0.3);
}

#[test]
fn date_range_counts_both_ends() {
    let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 2)).unwrap();
    let days: Vec<NaiveDate> = range.days().collect();
    assert_eq!(range.len(), 5, "2024 is a leap year");
    assert_eq!(days.first(), Some(&date(2024, 2, 27)));
    assert_eq!(days.last(), Some(&date(2024, 3, 2)));
}

/// A near-zero Poisson mean yields empty days. They carry zero counts
/// and money, and CTR resolves to null instead of failing.
#[test]
fn zero_impression_days_resolve_without_division_errors() {
    let model = ChannelModel {
        base_impressions: 0.001,
        impressions_step: 0.0,
        ..ChannelModel::default()
    };
    let sim = CampaignSimulator::new(SimConfig::default_test().date_range().unwrap(), model);

    let records = sim.simulate(&mut CampaignRng::new(42)).unwrap();
    let empty: Vec<_> = records.iter().filter(|r| r.impressions == 0).collect();

    assert!(!empty.is_empty(), "expected zero-impression rows");
    for r in empty {
        assert_eq!((r.clicks, r.conversions), (0, 0));
        assert_eq!((r.spend, r.revenue), (0.0, 0.0));
        let m = DerivedMetrics::for_record(r);
        assert_eq!(m.ctr, None, "{} {}", r.date, r.channel);
        assert_eq!(m.conversion_rate, None);
        assert_eq!(m.cpc, None);
    }
}

#[test]
fn completion_notice_names_the_output() {
    let notice = simulator::completion_notice(std::path::Path::new("data/out.csv"));
    assert_eq!(notice, "Synthetic data saved to data/out.csv");
}
