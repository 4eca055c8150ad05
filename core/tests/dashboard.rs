//! End to end: simulate, write, read back, aggregate, render.

use campaign_core::{
    charts,
    config::{SimConfig, DEFAULT_MOVING_AVERAGE_WINDOW},
    dataset,
    error::SimError,
    report::{DashboardReport, SUMMARY_FILE},
    simulator,
};

#[test]
fn full_pipeline_writes_every_chart() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let config = SimConfig {
        output_path: dir.path().join("data").join("campaign.csv"),
        ..SimConfig::default()
    };

    simulator::run(&config).unwrap();
    let records = dataset::read_records(&config.output_path).unwrap();
    let report = DashboardReport::build(&records, DEFAULT_MOVING_AVERAGE_WINDOW).unwrap();

    let out = dir.path().join("dashboards");
    let written = charts::render_dashboard(&report, &out).unwrap();

    assert_eq!(written.len(), charts::CHART_FILES.len());
    for name in charts::CHART_FILES {
        let path = out.join(name);
        let meta = std::fs::metadata(&path).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(meta.len() > 0, "{name} is empty");
    }
}

#[test]
fn report_covers_six_months() {
    let dir = tempfile::tempdir().unwrap();
    let config = SimConfig {
        output_path: dir.path().join("campaign.csv"),
        ..SimConfig::default()
    };
    let records = simulator::run(&config).unwrap();

    let report = DashboardReport::build(&records, 7).unwrap();

    assert_eq!(report.row_count, 910);
    assert_eq!(report.daily.len(), 182);
    assert_eq!(report.channels.len(), 5);
    assert_eq!(report.monthly.len(), 30);
    assert_eq!(report.monthly_spend.months.len(), 6);
    assert_eq!(report.funnel.len(), 5);
    assert_eq!(report.pareto.len(), 5);
    assert_eq!(report.efficiency.len(), 5);
}

#[test]
fn summary_json_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = SimConfig {
        output_path: dir.path().join("campaign.csv"),
        ..SimConfig::default_test()
    };
    let records = simulator::run(&config).unwrap();
    let report = DashboardReport::build(&records, 7).unwrap();

    let path = report.write_summary(dir.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), SUMMARY_FILE);
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["row_count"], 70);
    assert_eq!(json["channels"].as_array().unwrap().len(), 5);
}

#[test]
fn empty_table_cannot_build_a_report() {
    let err = DashboardReport::build(&[], 7).unwrap_err();
    assert!(matches!(err, SimError::EmptyDataset { .. }), "got {err:?}");
}
