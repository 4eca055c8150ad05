//! Two runs, same seed, same date range.
//! They must produce byte-identical CSV files.
//! Any divergence is a blocker: do not merge until fixed.

use campaign_core::{
    config::{ChannelModel, SimConfig},
    rng::CampaignRng,
    simulator::{self, CampaignSimulator},
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn same_seed_produces_identical_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");

    simulator::generate(date(2024, 1, 1), date(2024, 6, 30), 42, &a).expect("run a");
    simulator::generate(date(2024, 1, 1), date(2024, 6, 30), 42, &b).expect("run b");

    let bytes_a = std::fs::read(&a).expect("read a");
    let bytes_b = std::fs::read(&b).expect("read b");
    assert!(!bytes_a.is_empty(), "output file is empty");
    assert_eq!(bytes_a, bytes_b, "Same seed produced different files");
}

#[test]
fn different_seeds_produce_different_tables() {
    let config = SimConfig::default_test();
    let sim = CampaignSimulator::from_config(&config).unwrap();

    let a = sim.simulate(&mut CampaignRng::new(42)).unwrap();
    let b = sim.simulate(&mut CampaignRng::new(99)).unwrap();

    assert_eq!(a.len(), b.len());
    assert_ne!(a, b, "Different seeds produced identical tables: seed is not being used");
}

/// Two simulators advanced day by day in alternation, each on its own
/// stream, must match the same simulators run alone.
#[test]
fn interleaved_runs_do_not_interfere() {
    let config = SimConfig::default_test();
    let sim_a = CampaignSimulator::from_config(&config).unwrap();
    let sim_b = CampaignSimulator::new(
        sim_a.range(),
        ChannelModel {
            base_impressions: 400.0,
            ..ChannelModel::default()
        },
    );

    let alone_a = sim_a.simulate(&mut CampaignRng::new(7)).unwrap();
    let alone_b = sim_b.simulate(&mut CampaignRng::new(8)).unwrap();

    let mut rng_a = CampaignRng::new(7);
    let mut rng_b = CampaignRng::new(8);
    let mut mixed_a = Vec::new();
    let mut mixed_b = Vec::new();
    for day in sim_a.range().days() {
        mixed_a.extend(sim_a.simulate_date(day, &mut rng_a).unwrap());
        mixed_b.extend(sim_b.simulate_date(day, &mut rng_b).unwrap());
    }

    assert_eq!(mixed_a, alone_a, "stream A disturbed by interleaving");
    assert_eq!(mixed_b, alone_b, "stream B disturbed by interleaving");
    assert_ne!(mixed_a, mixed_b);
}
