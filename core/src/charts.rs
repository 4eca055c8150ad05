//! SVG dashboard charts.
//!
//! Presentation only: every number drawn here comes from a
//! `DashboardReport`. One file per chart, fixed names.

use crate::{
    aggregation::{FunnelStage, MonthlyPivot},
    error::{SimError, SimResult},
    report::DashboardReport,
    types::Channel,
};
use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

type ChartResult = Result<(), Box<dyn std::error::Error>>;
type DrawFn = fn(&DashboardReport, &Path) -> ChartResult;

pub const DAILY_SPEND_VS_REVENUE: &str = "daily_spend_vs_revenue.svg";
pub const ROI_BY_CHANNEL: &str = "roi_by_channel.svg";
pub const CTR_BY_CHANNEL: &str = "ctr_by_channel.svg";
pub const CONVERSION_RATE_BY_CHANNEL: &str = "conversion_rate_by_channel.svg";
pub const CPA_BY_CHANNEL: &str = "cpa_by_channel.svg";
pub const MONTHLY_REVENUE_BY_CHANNEL: &str = "monthly_revenue_by_channel.svg";
pub const MONTHLY_SPEND_STACKED_AREA: &str = "monthly_spend_stacked_area.svg";
pub const FUNNEL_NORMALIZED_BY_CHANNEL: &str = "funnel_normalized_by_channel.svg";
pub const MONTHLY_ROI_HEATMAP: &str = "monthly_roi_heatmap.svg";
pub const CUMULATIVE_SPEND_REVENUE: &str = "cumulative_spend_revenue.svg";
pub const CTR_VS_CONVERSION_SCATTER: &str = "ctr_vs_conversion_scatter.svg";
pub const PARETO_REVENUE_BY_CHANNEL: &str = "pareto_revenue_by_channel.svg";

/// Render order. Append only.
pub const CHART_FILES: [&str; 12] = [
    DAILY_SPEND_VS_REVENUE,
    ROI_BY_CHANNEL,
    CTR_BY_CHANNEL,
    CONVERSION_RATE_BY_CHANNEL,
    CPA_BY_CHANNEL,
    MONTHLY_REVENUE_BY_CHANNEL,
    MONTHLY_SPEND_STACKED_AREA,
    FUNNEL_NORMALIZED_BY_CHANNEL,
    MONTHLY_ROI_HEATMAP,
    CUMULATIVE_SPEND_REVENUE,
    CTR_VS_CONVERSION_SCATTER,
    PARETO_REVENUE_BY_CHANNEL,
];

const PALETTE: [RGBColor; 5] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
];

const WIDE: (u32, u32) = (1000, 500);
const TALL: (u32, u32) = (1000, 600);

fn channel_color(channel: Channel) -> RGBColor {
    PALETTE[channel.index() % PALETTE.len()]
}

/// Render every chart into `dir`, creating it if needed.
pub fn render_dashboard(report: &DashboardReport, dir: &Path) -> SimResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| SimError::io(dir, e))?;

    let charts: [(&'static str, DrawFn); 12] = [
        (DAILY_SPEND_VS_REVENUE, draw_daily_spend_vs_revenue),
        (ROI_BY_CHANNEL, draw_roi_by_channel),
        (CTR_BY_CHANNEL, draw_ctr_by_channel),
        (CONVERSION_RATE_BY_CHANNEL, draw_conversion_rate_by_channel),
        (CPA_BY_CHANNEL, draw_cpa_by_channel),
        (MONTHLY_REVENUE_BY_CHANNEL, draw_monthly_revenue),
        (MONTHLY_SPEND_STACKED_AREA, draw_monthly_spend_stacked),
        (FUNNEL_NORMALIZED_BY_CHANNEL, draw_funnel),
        (MONTHLY_ROI_HEATMAP, draw_roi_heatmap),
        (CUMULATIVE_SPEND_REVENUE, draw_cumulative),
        (CTR_VS_CONVERSION_SCATTER, draw_efficiency_scatter),
        (PARETO_REVENUE_BY_CHANNEL, draw_pareto),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (name, draw) in charts {
        let path = dir.join(name);
        draw(report, &path).map_err(|e| SimError::Chart {
            chart: name,
            message: e.to_string(),
        })?;
        log::info!("Chart written: {}", path.display());
        written.push(path);
    }
    Ok(written)
}

// ── Axis helpers ─────────────────────────────────────────────────────────────

/// Category axis: one unit per item, centred on integers.
fn category_axis(n: usize) -> std::ops::Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

fn category_label<T: AsRef<str>>(names: &[T], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 0.01 || idx < 0.0 {
        return String::new();
    }
    names
        .get(idx as usize)
        .map(|n| n.as_ref().to_string())
        .unwrap_or_default()
}

fn date_labels(dates: &[NaiveDate], format: &str) -> Vec<String> {
    dates.iter().map(|d| d.format(format).to_string()).collect()
}

/// Value range including zero, padded by 10%.
fn value_span(values: impl IntoIterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = (hi - lo) * 0.1;
    if pad == 0.0 {
        return lo..lo + 1.0;
    }
    (if lo < 0.0 { lo - pad } else { lo })..hi + pad
}

// ── Time series ──────────────────────────────────────────────────────────────

fn draw_daily_spend_vs_revenue(report: &DashboardReport, path: &Path) -> ChartResult {
    let d = &report.daily;
    draw_daily_lines(
        path,
        "Daily Spend vs Revenue with 7-day Rolling Average",
        "Amount",
        &d.iter().map(|r| r.date).collect::<Vec<_>>(),
        vec![
            ("Daily Spend", PALETTE[0], 2, d.iter().map(|r| r.spend).collect()),
            ("Daily Revenue", PALETTE[1], 2, d.iter().map(|r| r.revenue).collect()),
            ("7-day Avg Spend", PALETTE[2], 1, d.iter().map(|r| r.spend_moving_avg).collect()),
            ("7-day Avg Revenue", PALETTE[3], 1, d.iter().map(|r| r.revenue_moving_avg).collect()),
        ],
    )
}

fn draw_cumulative(report: &DashboardReport, path: &Path) -> ChartResult {
    let d = &report.daily;
    draw_daily_lines(
        path,
        "Cumulative Spend vs Revenue",
        "Cumulative Amount",
        &d.iter().map(|r| r.date).collect::<Vec<_>>(),
        vec![
            ("Cumulative Spend", PALETTE[0], 2, d.iter().map(|r| r.cumulative_spend).collect()),
            ("Cumulative Revenue", PALETTE[1], 2, d.iter().map(|r| r.cumulative_revenue).collect()),
        ],
    )
}

fn draw_daily_lines(
    path: &Path,
    title: &str,
    y_desc: &str,
    dates: &[NaiveDate],
    series: Vec<(&str, RGBColor, u32, Vec<f64>)>,
) -> ChartResult {
    let root = SVGBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_range = value_span(series.iter().flat_map(|(_, _, _, v)| v.iter().copied()));
    let labels = date_labels(dates, "%Y-%m-%d");
    let x_fmt = |x: &f64| category_label(&labels, *x);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(category_axis(dates.len()), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_desc)
        .x_labels(8)
        .x_label_formatter(&x_fmt)
        .draw()?;

    for (label, color, width, values) in series {
        chart
            .draw_series(LineSeries::new(
                values.into_iter().enumerate().map(|(i, v)| (i as f64, v)),
                color.stroke_width(width),
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

// ── Channel bars ─────────────────────────────────────────────────────────────

fn draw_roi_by_channel(report: &DashboardReport, path: &Path) -> ChartResult {
    let bars = report.channels.iter().map(|c| (c.channel, c.metrics.roi)).collect::<Vec<_>>();
    draw_channel_bars(path, "Overall ROI by Channel", "ROI", &bars)
}

fn draw_ctr_by_channel(report: &DashboardReport, path: &Path) -> ChartResult {
    let bars = report.channels.iter().map(|c| (c.channel, c.metrics.ctr)).collect::<Vec<_>>();
    draw_channel_bars(path, "Overall CTR by Channel", "CTR", &bars)
}

fn draw_conversion_rate_by_channel(report: &DashboardReport, path: &Path) -> ChartResult {
    let bars = report
        .channels
        .iter()
        .map(|c| (c.channel, c.metrics.conversion_rate))
        .collect::<Vec<_>>();
    draw_channel_bars(path, "Overall Conversion Rate by Channel", "Conversion Rate", &bars)
}

fn draw_cpa_by_channel(report: &DashboardReport, path: &Path) -> ChartResult {
    let bars = report.channels.iter().map(|c| (c.channel, c.metrics.cpa)).collect::<Vec<_>>();
    draw_channel_bars(path, "Overall CPA by Channel", "CPA", &bars)
}

/// Null values leave a gap where the bar would be.
fn draw_channel_bars(
    path: &Path,
    title: &str,
    y_desc: &str,
    bars: &[(Channel, Option<f64>)],
) -> ChartResult {
    let root = SVGBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = bars.iter().map(|(c, _)| c.label()).collect();
    let x_fmt = |x: &f64| category_label(&names, *x);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            category_axis(bars.len()),
            value_span(bars.iter().filter_map(|(_, v)| *v)),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Channel")
        .y_desc(y_desc)
        .x_labels(bars.len())
        .x_label_formatter(&x_fmt)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().filter_map(|(i, (channel, value))| {
        let x = i as f64;
        value.map(|v| Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v)], channel_color(*channel).filled()))
    }))?;

    root.present()?;
    Ok(())
}

// ── Monthly ──────────────────────────────────────────────────────────────────

fn draw_monthly_revenue(report: &DashboardReport, path: &Path) -> ChartResult {
    let root = SVGBackend::new(path, TALL).into_drawing_area();
    root.fill(&WHITE)?;

    let months = &report.monthly_spend.months;
    let labels = date_labels(months, "%Y-%m");
    let x_fmt = |x: &f64| category_label(&labels, *x);

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Revenue by Channel", ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            category_axis(months.len()),
            value_span(report.monthly.iter().map(|m| m.revenue)),
        )?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Revenue")
        .x_labels(months.len())
        .x_label_formatter(&x_fmt)
        .draw()?;

    for channel in Channel::ALL {
        let points: Vec<(f64, f64)> = report
            .monthly
            .iter()
            .filter(|m| m.channel == channel)
            .filter_map(|m| {
                let col = months.iter().position(|month| *month == m.month)?;
                Some((col as f64, m.revenue))
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = channel_color(channel);
        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(channel.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_monthly_spend_stacked(report: &DashboardReport, path: &Path) -> ChartResult {
    let pivot = &report.monthly_spend;
    let root = SVGBackend::new(path, TALL).into_drawing_area();
    root.fill(&WHITE)?;

    // Running top edge of each layer, bottom layer first.
    let mut layers: Vec<Vec<f64>> = Vec::with_capacity(pivot.channels.len());
    for row in &pivot.cells {
        let below = layers.last().cloned().unwrap_or_else(|| vec![0.0; row.len()]);
        layers.push(below.iter().zip(row).map(|(b, v)| b + v).collect());
    }
    let top = layers.last().map(|l| l.iter().copied().fold(0.0, f64::max)).unwrap_or(0.0);

    let months = &pivot.months;
    let labels = date_labels(months, "%Y-%m");
    let x_fmt = |x: &f64| category_label(&labels, *x);

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Spend by Channel (Stacked Area)", ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(months.len()), value_span([top]))?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Spend")
        .x_labels(months.len())
        .x_label_formatter(&x_fmt)
        .draw()?;

    // Tallest layer first so each lower layer paints over it.
    for (channel, layer) in pivot.channels.iter().zip(&layers).rev() {
        let color = channel_color(*channel);
        chart
            .draw_series(AreaSeries::new(
                layer.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                0.0,
                color.mix(0.85).filled(),
            ))?
            .label(channel.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_roi_heatmap(report: &DashboardReport, path: &Path) -> ChartResult {
    let pivot: &MonthlyPivot = &report.monthly_roi;
    let root = SVGBackend::new(path, TALL).into_drawing_area();
    root.fill(&WHITE)?;

    let months = &pivot.months;
    let names: Vec<&str> = pivot.channels.iter().map(|c| c.label()).collect();
    let labels = date_labels(months, "%Y-%m");
    let x_fmt = |x: &f64| category_label(&labels, *x);
    let y_fmt = |y: &f64| category_label(&names, *y);

    let (lo, hi) = pivot
        .cells
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Monthly ROI Heatmap by Channel (ROI {lo:.2} to {hi:.2})"),
            ("sans-serif", 22).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(100)
        .build_cartesian_2d(category_axis(months.len()), category_axis(names.len()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Month")
        .x_labels(months.len())
        .y_labels(names.len())
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()?;

    let cells: Vec<(usize, usize, f64)> = pivot
        .cells
        .iter()
        .enumerate()
        .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, v)| (r, c, *v)))
        .collect();

    chart.draw_series(cells.iter().map(|(r, c, v)| {
        let (x, y) = (*c as f64, *r as f64);
        Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], heat_color(*v, lo, hi).filled())
    }))?;
    chart.draw_series(cells.iter().map(|(r, c, v)| {
        Text::new(
            format!("{v:.2}"),
            (*c as f64 - 0.15, *r as f64),
            ("sans-serif", 13).into_font().color(&WHITE),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Linear blend from deep purple (low) to yellow (high).
fn heat_color(value: f64, lo: f64, hi: f64) -> RGBColor {
    let t = if hi > lo { ((value - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.5 };
    let blend = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(blend(68, 253), blend(1, 231), blend(84, 37))
}

// ── Funnel ───────────────────────────────────────────────────────────────────

fn draw_funnel(report: &DashboardReport, path: &Path) -> ChartResult {
    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let rows = &report.funnel;
    let names: Vec<&str> = rows.iter().map(|r| r.channel.label()).collect();
    let y_fmt = |y: &f64| category_label(&names, *y);
    let bar = 0.18;

    let mut chart = ChartBuilder::on(&root)
        .caption("Funnel Drop-Off by Channel (Normalized)", ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(100)
        .build_cartesian_2d(
            value_span(rows.iter().flat_map(|r| FunnelStage::ALL.map(|s| r.stage(s))).flatten()),
            category_axis(rows.len()),
        )?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Normalized Proportion (Impressions=1; Revenue is currency per impression)")
        .y_labels(rows.len())
        .y_label_formatter(&y_fmt)
        .draw()?;

    for (s, stage) in FunnelStage::ALL.iter().enumerate() {
        let color = PALETTE[s % PALETTE.len()];
        let offset = -0.4 + s as f64 * bar;
        chart
            .draw_series(rows.iter().enumerate().filter_map(|(i, row)| {
                let y0 = i as f64 + offset;
                row.stage(*stage)
                    .map(|v| Rectangle::new([(0.0, y0), (v, y0 + bar)], color.filled()))
            }))?
            .label(stage.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

// ── Scatter and Pareto ───────────────────────────────────────────────────────

fn draw_efficiency_scatter(report: &DashboardReport, path: &Path) -> ChartResult {
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let points = &report.efficiency;
    let mut chart = ChartBuilder::on(&root)
        .caption("CTR vs Conversion Rate by Channel (bubble size ~ spend)", ("sans-serif", 20).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            value_span(points.iter().map(|p| p.ctr)),
            value_span(points.iter().map(|p| p.conversion_rate)),
        )?;

    chart.configure_mesh().x_desc("CTR").y_desc("Conversion Rate").draw()?;

    chart.draw_series(points.iter().map(|p| {
        // Marker area follows spend / 10, so the radius follows its root.
        let radius = (p.spend / 10.0).sqrt().clamp(3.0, 60.0) as i32;
        Circle::new((p.ctr, p.conversion_rate), radius, channel_color(p.channel).mix(0.6).filled())
    }))?;
    chart.draw_series(points.iter().map(|p| {
        Text::new(p.channel.label(), (p.ctr, p.conversion_rate), ("sans-serif", 12).into_font())
    }))?;

    root.present()?;
    Ok(())
}

fn draw_pareto(report: &DashboardReport, path: &Path) -> ChartResult {
    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let rows = &report.pareto;
    let names: Vec<&str> = rows.iter().map(|r| r.channel.label()).collect();
    let x_fmt = |x: &f64| category_label(&names, *x);

    let mut chart = ChartBuilder::on(&root)
        .caption("Pareto Chart: Revenue by Channel", ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .right_y_label_area_size(60)
        .build_cartesian_2d(category_axis(rows.len()), value_span(rows.iter().map(|r| r.revenue)))?
        .set_secondary_coord(category_axis(rows.len()), 0.0..110.0);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Channel")
        .y_desc("Revenue")
        .x_labels(rows.len())
        .x_label_formatter(&x_fmt)
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("Cumulative % of Revenue")
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(i, r)| {
        let x = i as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, r.revenue)], channel_color(r.channel).filled())
    }))?;

    let cumulative: Vec<(f64, f64)> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.cumulative_pct.map(|p| (i as f64, p)))
        .collect();
    chart.draw_secondary_series(LineSeries::new(cumulative.clone(), BLACK.stroke_width(2)))?;
    chart.draw_secondary_series(cumulative.into_iter().map(|p| Circle::new(p, 4, BLACK.filled())))?;

    root.present()?;
    Ok(())
}
